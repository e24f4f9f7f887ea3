// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

//! The routines shipped with the engine.

use ferrodb_type::Value;
use once_cell::sync::Lazy;

use super::BuiltinRegistry;
use crate::error::InvokeError;

/// Well-known ids of the shipped routines. Stable; the catalog must not
/// reuse them.
pub mod ids {
	use ferrodb_catalog::RoutineId;

	pub const BOOL_NOT: RoutineId = RoutineId(10);
	pub const INT8_ADD: RoutineId = RoutineId(100);
	pub const INT8_MUL: RoutineId = RoutineId(101);
	pub const INT8_NEG: RoutineId = RoutineId(102);
	pub const TEXT_CONCAT: RoutineId = RoutineId(120);
	pub const TEXT_LENGTH: RoutineId = RoutineId(121);
	pub const IS_UNDEFINED: RoutineId = RoutineId(130);
	pub const VERSION: RoutineId = RoutineId(140);
}

static STANDARD: Lazy<BuiltinRegistry> = Lazy::new(|| {
	BuiltinRegistry::builder()
		.with_routine(ids::BOOL_NOT, "bool_not", 1, bool_not)
		.with_routine(ids::INT8_ADD, "int8_add", 2, int8_add)
		.with_routine(ids::INT8_MUL, "int8_mul", 2, int8_mul)
		.with_routine(ids::INT8_NEG, "int8_neg", 1, int8_neg)
		.with_routine(ids::TEXT_CONCAT, "text_concat", 2, text_concat)
		.with_routine(ids::TEXT_LENGTH, "text_length", 1, text_length)
		.with_routine(ids::IS_UNDEFINED, "is_undefined", 1, is_undefined)
		.with_routine(ids::VERSION, "version", 0, version)
		.build()
});

pub(super) fn table() -> &'static BuiltinRegistry {
	&STANDARD
}

fn type_mismatch(routine: &str, value: &Value) -> InvokeError {
	InvokeError::Execution {
		name: routine.to_string(),
		reason: format!("argument of type {} not supported", value.get_type()),
	}
}

/// Fetch an argument slot. A caller-supplied arity override can hand a
/// target fewer slots than it was registered with; a missing slot is an
/// error, never an out-of-bounds read.
fn arg<'a>(routine: &str, args: &'a [Value], index: usize) -> Result<&'a Value, InvokeError> {
	args.get(index).ok_or_else(|| InvokeError::Execution {
		name: routine.to_string(),
		reason: format!("argument {} missing", index),
	})
}

fn as_int8(value: &Value) -> Option<i64> {
	match value {
		Value::Int4(v) => Some(*v as i64),
		Value::Int8(v) => Some(*v),
		_ => None,
	}
}

fn bool_not(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	match arg("bool_not", args, 0)? {
		Value::Boolean(v) => Ok(Value::Boolean(!v)),
		Value::Undefined => {
			*undefined = true;
			Ok(Value::Undefined)
		}
		other => Err(type_mismatch("bool_not", other)),
	}
}

fn int8_pair(routine: &str, args: &[Value], undefined: &mut bool) -> Result<Option<(i64, i64)>, InvokeError> {
	let first = arg(routine, args, 0)?;
	let second = arg(routine, args, 1)?;
	if first.is_undefined() || second.is_undefined() {
		*undefined = true;
		return Ok(None);
	}
	let a = as_int8(first).ok_or_else(|| type_mismatch(routine, first))?;
	let b = as_int8(second).ok_or_else(|| type_mismatch(routine, second))?;
	Ok(Some((a, b)))
}

fn int8_add(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	match int8_pair("int8_add", args, undefined)? {
		Some((a, b)) => Ok(Value::Int8(a.wrapping_add(b))),
		None => Ok(Value::Undefined),
	}
}

fn int8_mul(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	match int8_pair("int8_mul", args, undefined)? {
		Some((a, b)) => Ok(Value::Int8(a.wrapping_mul(b))),
		None => Ok(Value::Undefined),
	}
}

fn int8_neg(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	let value = arg("int8_neg", args, 0)?;
	if value.is_undefined() {
		*undefined = true;
		return Ok(Value::Undefined);
	}
	let v = as_int8(value).ok_or_else(|| type_mismatch("int8_neg", value))?;
	Ok(Value::Int8(v.wrapping_neg()))
}

fn text_concat(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	match (arg("text_concat", args, 0)?, arg("text_concat", args, 1)?) {
		(Value::Utf8(a), Value::Utf8(b)) => Ok(Value::Utf8(format!("{}{}", a, b))),
		(Value::Undefined, _) | (_, Value::Undefined) => {
			*undefined = true;
			Ok(Value::Undefined)
		}
		(other, Value::Utf8(_)) => Err(type_mismatch("text_concat", other)),
		(_, other) => Err(type_mismatch("text_concat", other)),
	}
}

fn text_length(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	match arg("text_length", args, 0)? {
		Value::Utf8(v) => Ok(Value::Int8(v.chars().count() as i64)),
		Value::Undefined => {
			*undefined = true;
			Ok(Value::Undefined)
		}
		other => Err(type_mismatch("text_length", other)),
	}
}

/// Reports whether the first argument is absent. The only shipped routine
/// that reads the incoming undefined flag: callers that already know the
/// slot is absent set the flag instead of materializing a value.
fn is_undefined(args: &[Value], undefined: &mut bool) -> Result<Value, InvokeError> {
	let absent = *undefined || arg("is_undefined", args, 0)?.is_undefined();
	*undefined = false;
	Ok(Value::Boolean(absent))
}

fn version(_args: &[Value], _undefined: &mut bool) -> Result<Value, InvokeError> {
	Ok(Value::Utf8(concat!("ferrodb ", env!("CARGO_PKG_VERSION")).to_string()))
}
