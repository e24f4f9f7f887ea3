// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use std::any::Any;

use ferrodb_catalog::RoutineId;
use ferrodb_type::Value;

use crate::error::InvokeError;

/// Uniform signature every directly callable routine conforms to: a
/// bounded slice of opaque values plus an undefined-flag in/out slot.
///
/// The flag follows the first-argument convention: a target may inspect
/// it to learn that its first argument is absent and set it to report an
/// undefined result. Targets with arity 0 ignore it.
pub type RoutineFn = fn(args: &[Value], undefined: &mut bool) -> std::result::Result<Value, InvokeError>;

/// Signature of a procedural-language call handler. A handler never sees
/// plain argument slots; it receives the whole delegated call.
pub type HandlerFn = fn(call: HandlerCall<'_>, undefined: &mut bool) -> std::result::Result<Value, InvokeError>;

/// A callable code address, shaped by what it expects to be handed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Invocable {
	Routine(RoutineFn),
	Handler(HandlerFn),
}

/// Where a routine's executable behavior lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoutineOrigin {
	/// Found in the builtin table by id; never consults the catalog.
	Builtin,
	/// Catalog row says internal; implementation found in the builtin
	/// table by symbolic name.
	Internal,
	/// Natively compiled, resolved at runtime by the dynamic loader.
	Native,
	/// Body is an RQL query; no code address, the query engine runs it.
	Rql,
	/// Pluggable procedural language; calls go through the language's
	/// handler routine.
	Handler,
	/// Catalog marks the routine unsafe to execute. Resolves, never
	/// calls.
	Untrusted,
}

/// A routine resolved to the point where it can be invoked.
///
/// Constructed once by [`Routines::resolve`], immutable thereafter, and
/// reusable across any number of calls while the underlying catalog row
/// is unchanged. `arity` is always populated, even for origins without a
/// target, so diagnostics and query-body calls know the declared count.
///
/// `handler` is set exactly when `origin` is [`RoutineOrigin::Handler`].
///
/// [`Routines::resolve`]: crate::Routines::resolve
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedRoutine {
	pub id: RoutineId,
	pub origin: RoutineOrigin,
	pub arity: u8,
	pub target: Option<Invocable>,
	pub handler: Option<Box<ResolvedRoutine>>,
}

/// Per-call context threaded through to procedural-language handlers.
///
/// Replaces ambient state: the trigger payload, when present, is passed
/// here explicitly instead of through a process global. The routine layer
/// never interprets it.
#[derive(Clone, Copy, Default)]
pub struct CallContext<'a> {
	pub trigger: Option<&'a (dyn Any + Send + Sync)>,
}

/// Everything a call handler needs to perform a delegated call: the
/// descriptor of the routine actually being called, the original
/// arguments, and the call context.
#[derive(Clone, Copy)]
pub struct HandlerCall<'a> {
	pub routine: &'a ResolvedRoutine,
	pub args: &'a [Value],
	pub context: &'a CallContext<'a>,
}
