// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use ferrodb_catalog::RoutineId;
use ferrodb_type::Value;
use tracing::instrument;

use crate::{
	MAX_CALL_ARGS,
	descriptor::{CallContext, HandlerCall, Invocable, ResolvedRoutine, RoutineOrigin},
	error::InvokeError,
	resolve::Routines,
};

/// Outcome of a routine call. An undefined result is a first-class
/// outcome, not an error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invoked {
	pub value: Value,
	pub undefined: bool,
}

impl Invoked {
	pub fn value(value: Value) -> Self {
		Self {
			value,
			undefined: false,
		}
	}

	pub fn undefined() -> Self {
		Self {
			value: Value::Undefined,
			undefined: true,
		}
	}
}

impl Routines {
	/// Invoke a resolved routine with no trigger context.
	pub fn invoke(&self, routine: &ResolvedRoutine, args: &[Value]) -> Result<Invoked, InvokeError> {
		self.invoke_with_context(routine, args, &CallContext::default())
	}

	/// Invoke a resolved routine. The descriptor's origin decides how
	/// the call is dispatched; the descriptor itself is never mutated.
	pub fn invoke_with_context(
		&self,
		routine: &ResolvedRoutine,
		args: &[Value],
		context: &CallContext<'_>,
	) -> Result<Invoked, InvokeError> {
		match routine.origin {
			RoutineOrigin::Untrusted => Err(InvokeError::Untrusted {
				routine: routine.id,
			}),
			RoutineOrigin::Handler => self.delegate(routine, args, context),
			RoutineOrigin::Rql => self.inner().runner.run(routine, args),
			RoutineOrigin::Builtin | RoutineOrigin::Internal | RoutineOrigin::Native => {
				dispatch(routine, args)
			}
		}
	}

	/// Route a call through its procedural-language handler. The outer
	/// descriptor has no address of its own; the handler learns which
	/// routine to run from the [`HandlerCall`].
	fn delegate(
		&self,
		routine: &ResolvedRoutine,
		args: &[Value],
		context: &CallContext<'_>,
	) -> Result<Invoked, InvokeError> {
		check_arity(routine.id, routine.arity)?;
		let handler = routine.handler.as_deref().ok_or(InvokeError::TargetMismatch {
			routine: routine.id,
		})?;
		match handler.origin {
			RoutineOrigin::Untrusted => Err(InvokeError::Untrusted {
				routine: handler.id,
			}),
			_ => match handler.target {
				Some(Invocable::Handler(target)) => {
					let mut undefined = false;
					let call = HandlerCall {
						routine,
						args,
						context,
					};
					let value = target(call, &mut undefined)?;
					Ok(Invoked {
						value,
						undefined,
					})
				}
				_ => Err(InvokeError::TargetMismatch {
					routine: handler.id,
				}),
			},
		}
	}

	/// Resolve and invoke in one step, for callers that do not hold a
	/// descriptor. Nothing is cached here: repeat callers should
	/// [`resolve`](Routines::resolve) once and reuse the descriptor.
	#[instrument(name = "routine::call", level = "trace", skip(self, args))]
	pub fn call(&self, id: RoutineId, args: &[Value]) -> crate::Result<Invoked> {
		let routine = self.resolve(id)?;
		Ok(self.invoke(&routine, args)?)
	}

	/// Like [`call`](Routines::call), but the caller supplies the arity
	/// itself instead of trusting the resolved value. Used by callers,
	/// such as index-support code, that know the true count
	/// independently of the catalog. Overrides a local copy only.
	#[instrument(name = "routine::call_with_arity", level = "trace", skip(self, args))]
	pub fn call_with_arity(&self, id: RoutineId, args: &[Value], arity: u8) -> crate::Result<Invoked> {
		let mut routine = self.resolve(id)?;
		routine.arity = arity;
		// Extra supplied slots beyond the declared count are ignored.
		let args = &args[..args.len().min(arity as usize)];
		Ok(self.invoke(&routine, args)?)
	}
}

fn check_arity(routine: RoutineId, arity: u8) -> Result<(), InvokeError> {
	if arity as usize > MAX_CALL_ARGS {
		return Err(InvokeError::TooManyArguments {
			routine,
			arity,
			max: MAX_CALL_ARGS,
		});
	}
	Ok(())
}

/// Call a routine that carries a direct code address. The argument list
/// must match the descriptor's arity exactly.
fn dispatch(routine: &ResolvedRoutine, args: &[Value]) -> Result<Invoked, InvokeError> {
	check_arity(routine.id, routine.arity)?;
	if args.len() != routine.arity as usize {
		return Err(InvokeError::ArityMismatch {
			routine: routine.id,
			expected: routine.arity,
			actual: args.len(),
		});
	}
	let target = match routine.target {
		Some(Invocable::Routine(target)) => target,
		_ => {
			return Err(InvokeError::TargetMismatch {
				routine: routine.id,
			});
		}
	};
	let mut undefined = false;
	let value = target(args, &mut undefined)?;
	Ok(Invoked {
		value,
		undefined,
	})
}
