// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod value;

pub use value::{Type, Value};
