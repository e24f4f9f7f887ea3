// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use crate::id::RoutineId;

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
	#[error("routine {routine}: declared arity {arity} exceeds the catalog limit of {max} arguments")]
	ArityOutOfRange {
		routine: RoutineId,
		arity: u8,
		max: u8,
	},
}
