// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use ferrodb_catalog::{LanguageId, RoutineId};

/// Failure to resolve a routine id to a usable descriptor.
///
/// Every variant is terminal for the call in progress: each one means the
/// catalog, the builtin table, or a loaded module is inconsistent, and
/// nothing at this layer can repair that.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
	#[error("routine {routine}: catalog lookup failed")]
	CatalogLookupFailed {
		routine: RoutineId,
	},

	#[error("routine {routine}: internal routine {name} not in builtin table")]
	InternalNotFound {
		routine: RoutineId,
		name: String,
	},

	#[error("routine {routine}: unknown language {language}")]
	UnknownLanguage {
		routine: RoutineId,
		language: LanguageId,
	},

	#[error("routine {routine}: language {language} handler chain exceeds depth {max}")]
	HandlerTooDeep {
		routine: RoutineId,
		language: LanguageId,
		max: usize,
	},

	#[error("routine {routine}: loading native code failed")]
	LoadFailed {
		routine: RoutineId,
		#[source]
		cause: LoadError,
	},
}

/// Failure to invoke an already resolved routine.
#[derive(Debug, thiserror::Error)]
pub enum InvokeError {
	#[error("routine {routine} is untrusted and may not be called")]
	Untrusted {
		routine: RoutineId,
	},

	#[error("routine {routine}: too many arguments ({arity} > {max})")]
	TooManyArguments {
		routine: RoutineId,
		arity: u8,
		max: usize,
	},

	#[error("routine {routine} expects {expected} arguments, got {actual}")]
	ArityMismatch {
		routine: RoutineId,
		expected: u8,
		actual: usize,
	},

	#[error("routine {routine} has no directly invocable target")]
	TargetMismatch {
		routine: RoutineId,
	},

	#[error("routine {name} failed: {reason}")]
	Execution {
		name: String,
		reason: String,
	},
}

/// Error reported by the dynamic loader collaborator.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{reason}")]
pub struct LoadError {
	pub reason: String,
}

impl LoadError {
	pub fn new(reason: impl Into<String>) -> Self {
		Self {
			reason: reason.into(),
		}
	}
}

/// Combined error for the resolve-then-invoke entry points.
#[derive(Debug, thiserror::Error)]
pub enum RoutineError {
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error(transparent)]
	Invoke(#[from] InvokeError),
}
