// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

//! Collaborator seams the routine manager calls out through.

use ferrodb_catalog::RoutineId;
use ferrodb_type::Value;

use crate::{
	Invoked,
	descriptor::{Invocable, ResolvedRoutine},
	error::{InvokeError, LoadError},
};

/// Result of dynamically loading a native routine: the code address and
/// the true argument count. The loader's count wins over whatever the
/// catalog declared.
#[derive(Debug, Clone, Copy)]
pub struct LoadedRoutine {
	pub target: Invocable,
	pub arity: u8,
}

/// Resolves a native routine's code from an externally loaded module.
pub trait RoutineLoader: Send + Sync {
	fn load(&self, id: RoutineId) -> std::result::Result<LoadedRoutine, LoadError>;
}

/// Executes routines whose body is a query. The routine manager only
/// routes such calls; it never runs the body itself.
pub trait QueryRunner: Send + Sync {
	fn run(&self, routine: &ResolvedRoutine, args: &[Value]) -> std::result::Result<Invoked, InvokeError>;
}

/// Placeholder loader for engines built without native-module support.
pub(crate) struct UnconfiguredLoader;

impl RoutineLoader for UnconfiguredLoader {
	fn load(&self, id: RoutineId) -> std::result::Result<LoadedRoutine, LoadError> {
		Err(LoadError::new(format!("no native routine loader configured (routine {})", id)))
	}
}

/// Placeholder runner for engines built without a query engine attached.
pub(crate) struct UnconfiguredRunner;

impl QueryRunner for UnconfiguredRunner {
	fn run(&self, routine: &ResolvedRoutine, _args: &[Value]) -> std::result::Result<Invoked, InvokeError> {
		Err(InvokeError::Execution {
			name: routine.id.to_string(),
			reason: "no query runner configured".to_string(),
		})
	}
}
