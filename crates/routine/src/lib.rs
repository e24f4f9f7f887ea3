// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

//! Routine manager.
//!
//! The single choke point through which every engine-visible routine call
//! passes. Turns a catalog-described [`RoutineId`] into an actual
//! invocation of executable code, wherever that code lives:
//!
//! - compiled into the engine (the builtin table)
//! - loaded at runtime from a native module
//! - an RQL query body run by the query engine
//! - a pluggable procedural language, reached through its call handler
//!
//! Resolution requires catalog lookups; the resulting [`ResolvedRoutine`]
//! is immutable and cheap to clone, so callers that invoke the same
//! routine repeatedly should resolve once and reuse the descriptor.
//!
//! [`RoutineId`]: ferrodb_catalog::RoutineId

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub mod builtin;
mod descriptor;
mod error;
mod interface;
mod invoke;
mod resolve;

pub use builtin::{BuiltinDef, BuiltinRegistry};
pub use descriptor::{CallContext, HandlerCall, HandlerFn, Invocable, ResolvedRoutine, RoutineFn, RoutineOrigin};
pub use error::{InvokeError, LoadError, ResolveError, RoutineError};
pub use interface::{LoadedRoutine, QueryRunner, RoutineLoader};
pub use invoke::Invoked;
pub use resolve::Routines;

pub type Result<T> = std::result::Result<T, RoutineError>;

/// Hard upper bound on the number of argument slots the dispatcher
/// supports.
///
/// One more than [`MAX_DECLARED_ARGS`]: the extra slot serves calls
/// constructed inside the engine, which bypass catalog validation. The
/// two limits exist for different reasons and must not be collapsed.
///
/// [`MAX_DECLARED_ARGS`]: ferrodb_catalog::MAX_DECLARED_ARGS
pub const MAX_CALL_ARGS: usize = 9;

/// How many levels of call-handler indirection resolution will follow.
///
/// Handler languages are not themselves handler-delegated, so one level
/// suffices; anything deeper indicates a corrupt or cyclic catalog.
pub const MAX_HANDLER_DEPTH: usize = 1;
