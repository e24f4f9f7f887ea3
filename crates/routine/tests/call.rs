// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use std::sync::{Arc, Mutex};

use ferrodb_catalog::{LanguageDef, LanguageId, MAX_DECLARED_ARGS, MaterializedCatalog, RoutineDef, RoutineId, id};
use ferrodb_routine::{
	BuiltinRegistry, CallContext, HandlerCall, Invocable, InvokeError, Invoked, MAX_CALL_ARGS, QueryRunner,
	ResolvedRoutine, RoutineError, RoutineOrigin, Routines,
	builtin::ids,
};
use ferrodb_type::Value;

fn routine(id: u64, name: &str, language: LanguageId, trusted: bool, arity: u8) -> RoutineDef {
	RoutineDef {
		id: RoutineId(id),
		name: name.to_string(),
		language,
		trusted,
		arity,
	}
}

/// Toy procedural-language handler: "runs" the delegated routine by
/// summing its id with its integer arguments. Deterministic so tests can
/// compute the expected outcome independently.
fn toy_handler(call: HandlerCall<'_>, _undefined: &mut bool) -> Result<Value, InvokeError> {
	let mut sum = *call.routine.id as i64;
	for value in call.args.iter().take(call.routine.arity as usize) {
		if let Value::Int8(v) = value {
			sum += v;
		}
	}
	Ok(Value::Int8(sum))
}

fn trigger_echo_handler(call: HandlerCall<'_>, undefined: &mut bool) -> Result<Value, InvokeError> {
	match call.context.trigger.and_then(|trigger| trigger.downcast_ref::<String>()) {
		Some(event) => Ok(Value::Utf8(event.clone())),
		None => {
			*undefined = true;
			Ok(Value::Undefined)
		}
	}
}

/// Catalog with one routine (id 300, arity 2) in procedural language 77
/// whose handler is builtin 301.
fn handler_fixture() -> Routines {
	let registry = BuiltinRegistry::builder()
		.with_handler(RoutineId(301), "toy_call_handler", toy_handler)
		.with_handler(RoutineId(310), "trigger_echo_handler", trigger_echo_handler)
		.build();
	let catalog = MaterializedCatalog::builder()
		.with_routine(routine(300, "greet", LanguageId(77), true, 2))
		.unwrap()
		.with_routine(routine(320, "on_event", LanguageId(78), true, 0))
		.unwrap()
		.with_language(LanguageDef {
			id: LanguageId(77),
			name: "pl_toy".to_string(),
			procedural: true,
			handler: RoutineId(301),
		})
		.with_language(LanguageDef {
			id: LanguageId(78),
			name: "pl_trigger".to_string(),
			procedural: true,
			handler: RoutineId(310),
		})
		.build();
	Routines::builder().registry(registry).catalog(catalog).build()
}

#[derive(Clone, Default)]
struct RecordingRunner {
	calls: Arc<Mutex<Vec<(RoutineId, u8, Vec<Value>)>>>,
}

impl QueryRunner for RecordingRunner {
	fn run(&self, routine: &ResolvedRoutine, args: &[Value]) -> Result<Invoked, InvokeError> {
		self.calls.lock().unwrap().push((routine.id, routine.arity, args.to_vec()));
		Ok(Invoked::value(Value::Boolean(true)))
	}
}

#[test]
fn test_call_builtin_add() {
	let routines = Routines::builder().build();

	let result = routines.call(ids::INT8_ADD, &[Value::Int8(3), Value::Int8(4)]).unwrap();
	assert_eq!(
		result,
		Invoked {
			value: Value::Int8(7),
			undefined: false,
		}
	);
}

#[test]
fn test_call_zero_arity_builtin() {
	let routines = Routines::builder().build();

	let result = routines.call(ids::VERSION, &[]).unwrap();
	assert!(!result.undefined);
	assert!(matches!(result.value, Value::Utf8(_)));
}

#[test]
fn test_untrusted_call_always_fails() {
	let catalog = MaterializedCatalog::builder()
		.with_routine(routine(200, "shady", id::NATIVE, false, 0))
		.unwrap()
		.build();
	let routines = Routines::builder().catalog(catalog).build();

	let err = routines.call(RoutineId(200), &[]).unwrap_err();
	assert!(matches!(
		err,
		RoutineError::Invoke(InvokeError::Untrusted { routine }) if routine == 200
	));

	// Invoking the resolved descriptor directly fails the same way and
	// never reaches any code: the descriptor has no target to reach.
	let resolved = routines.resolve(RoutineId(200)).unwrap();
	assert!(resolved.target.is_none());
	let err = routines.invoke(&resolved, &[]).unwrap_err();
	assert!(matches!(err, InvokeError::Untrusted { routine } if routine == 200));
}

#[test]
fn test_handler_delegation_matches_direct_handler_call() {
	let routines = handler_fixture();
	let args = [Value::Int8(5), Value::Int8(6)];

	let outer = routines.resolve(RoutineId(300)).unwrap();
	assert_eq!(outer.origin, RoutineOrigin::Handler);
	let handler = outer.handler.as_deref().unwrap();
	assert_eq!(handler.id, RoutineId(301));
	assert_eq!(handler.origin, RoutineOrigin::Builtin);

	// Invoking the outer routine must be observably the handler target
	// applied to the constructed delegated call.
	let context = CallContext::default();
	let mut undefined = false;
	let expected = toy_handler(
		HandlerCall {
			routine: &outer,
			args: &args,
			context: &context,
		},
		&mut undefined,
	)
	.unwrap();

	let result = routines.call(RoutineId(300), &args).unwrap();
	assert_eq!(result.value, expected);
	assert_eq!(result.value, Value::Int8(300 + 5 + 6));
	assert!(!result.undefined);
}

#[test]
fn test_handler_receives_trigger_context() {
	let routines = handler_fixture();
	let resolved = routines.resolve(RoutineId(320)).unwrap();

	// Without a trigger the handler reports an undefined result.
	let result = routines.invoke(&resolved, &[]).unwrap();
	assert!(result.undefined);

	let trigger = "row_inserted".to_string();
	let context = CallContext {
		trigger: Some(&trigger),
	};
	let result = routines.invoke_with_context(&resolved, &[], &context).unwrap();
	assert_eq!(result.value, Value::utf8("row_inserted"));
	assert!(!result.undefined);
}

#[test]
fn test_untrusted_handler_is_not_called() {
	let catalog = MaterializedCatalog::builder()
		.with_routine(routine(330, "plugged", LanguageId(79), true, 0))
		.unwrap()
		.with_routine(routine(900, "shady_handler", id::NATIVE, false, 0))
		.unwrap()
		.with_language(LanguageDef {
			id: LanguageId(79),
			name: "pl_shady".to_string(),
			procedural: true,
			handler: RoutineId(900),
		})
		.build();
	let routines = Routines::builder().catalog(catalog).build();

	let resolved = routines.resolve(RoutineId(330)).unwrap();
	let err = routines.invoke(&resolved, &[]).unwrap_err();
	assert!(matches!(err, InvokeError::Untrusted { routine } if routine == 900));
}

#[test]
fn test_rql_call_routed_to_runner() {
	let runner = RecordingRunner::default();
	let catalog = MaterializedCatalog::builder()
		.with_routine(routine(800, "report", id::RQL, true, 2))
		.unwrap()
		.build();
	let routines = Routines::builder().catalog(catalog).runner(runner.clone()).build();

	let args = [Value::Int8(1), Value::utf8("x")];
	let result = routines.call(RoutineId(800), &args).unwrap();
	assert_eq!(result.value, Value::Boolean(true));

	let calls = runner.calls.lock().unwrap();
	assert_eq!(calls.len(), 1);
	let (id, arity, seen) = &calls[0];
	assert_eq!(*id, RoutineId(800));
	assert_eq!(*arity, 2);
	assert_eq!(seen.as_slice(), args.as_slice());
}

#[test]
fn test_too_many_arguments() {
	let routines = Routines::builder().build();
	let args: Vec<Value> = (0..10).map(Value::int8).collect();

	// The catalog cannot declare an arity this large; the override
	// entry point can, and the dispatcher must refuse it.
	let err = routines.call_with_arity(ids::INT8_ADD, &args, 10).unwrap_err();
	assert!(matches!(
		err,
		RoutineError::Invoke(InvokeError::TooManyArguments { arity: 10, max, .. }) if max == MAX_CALL_ARGS
	));

	// Same refusal when a descriptor is doctored by hand.
	let mut resolved = routines.resolve(ids::INT8_ADD).unwrap();
	resolved.arity = 10;
	let err = routines.invoke(&resolved, &args).unwrap_err();
	assert!(matches!(err, InvokeError::TooManyArguments { .. }));
}

#[test]
fn test_arity_mismatch_on_short_argument_list() {
	let routines = Routines::builder().build();

	let err = routines.call(ids::INT8_ADD, &[Value::Int8(3)]).unwrap_err();
	assert!(matches!(
		err,
		RoutineError::Invoke(InvokeError::ArityMismatch { expected: 2, actual: 1, .. })
	));
}

#[test]
fn test_call_with_arity_override() {
	let routines = Routines::builder().build();

	// Caller knows the true arity; extra supplied slots are ignored.
	let args = [Value::Int8(3), Value::Int8(4), Value::Int8(99)];
	let result = routines.call_with_arity(ids::INT8_ADD, &args, 2).unwrap();
	assert_eq!(result.value, Value::Int8(7));

	// The override only touches the local copy: resolving again still
	// yields the registry arity.
	assert_eq!(routines.resolve(ids::INT8_ADD).unwrap().arity, 2);
}

#[test]
fn test_call_with_arity_below_target_arity() {
	let routines = Routines::builder().build();

	// The override is self-consistent (one argument, arity one) but
	// leaves the target short a slot. That surfaces as a typed error,
	// never an out-of-bounds read.
	let err = routines.call_with_arity(ids::INT8_ADD, &[Value::Int8(3)], 1).unwrap_err();
	assert!(matches!(
		err,
		RoutineError::Invoke(InvokeError::Execution { name, .. }) if name == "int8_add"
	));

	// Zero slots, same refusal.
	let err = routines.call_with_arity(ids::INT8_ADD, &[], 0).unwrap_err();
	assert!(matches!(err, RoutineError::Invoke(InvokeError::Execution { .. })));
}

#[test]
fn test_arity_mismatch_on_long_argument_list() {
	let routines = Routines::builder().build();

	// The plain entry point trusts the resolved arity; a longer list
	// is a caller mistake, not slots to ignore.
	let args = [Value::Int8(3), Value::Int8(4), Value::Int8(99)];
	let err = routines.call(ids::INT8_ADD, &args).unwrap_err();
	assert!(matches!(
		err,
		RoutineError::Invoke(InvokeError::ArityMismatch { expected: 2, actual: 3, .. })
	));
}

#[test]
fn test_undefined_result_is_not_an_error() {
	let routines = Routines::builder().build();

	let result = routines.call(ids::INT8_ADD, &[Value::Undefined, Value::Int8(4)]).unwrap();
	assert!(result.undefined);
	assert_eq!(result.value, Value::Undefined);

	let result = routines.call(ids::IS_UNDEFINED, &[Value::Undefined]).unwrap();
	assert!(!result.undefined);
	assert_eq!(result.value, Value::Boolean(true));
}

#[test]
fn test_descriptor_reuse_across_calls() {
	let routines = Routines::builder().build();
	let resolved = routines.resolve(ids::INT8_ADD).unwrap();

	for i in 0..5i64 {
		let result = routines.invoke(&resolved, &[Value::Int8(i), Value::Int8(i)]).unwrap();
		assert_eq!(result.value, Value::Int8(i * 2));
	}
}

#[test]
fn test_dispatch_and_catalog_limits_stay_distinct() {
	// The dispatcher keeps one slot beyond what the catalog can
	// declare, for calls constructed inside the engine.
	assert_eq!(MAX_DECLARED_ARGS as usize + 1, MAX_CALL_ARGS);
}

#[test]
fn test_handler_without_handler_shape_is_rejected() {
	// Language 80 names an ordinary builtin as its handler. The
	// delegated call cannot be handed to a plain routine target.
	let catalog = MaterializedCatalog::builder()
		.with_routine(routine(340, "broken", LanguageId(80), true, 0))
		.unwrap()
		.with_language(LanguageDef {
			id: LanguageId(80),
			name: "pl_broken".to_string(),
			procedural: true,
			handler: ids::INT8_ADD,
		})
		.build();
	let routines = Routines::builder().catalog(catalog).build();

	let resolved = routines.resolve(RoutineId(340)).unwrap();
	assert!(matches!(resolved.handler.as_deref().unwrap().target, Some(Invocable::Routine(_))));
	let err = routines.invoke(&resolved, &[]).unwrap_err();
	assert!(matches!(err, InvokeError::TargetMismatch { routine } if routine == *ids::INT8_ADD));
}
