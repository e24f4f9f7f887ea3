// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

//! The builtin table: routines compiled into the engine.
//!
//! Read-only after build. An id present here always wins over any catalog
//! row sharing that id, which lets the engine ship hand-optimized
//! implementations of well-known routines without touching the catalog.
//! Name lookup exists solely for internal-language catalog rows, which
//! address their implementation symbolically.

mod standard;

use std::{collections::HashMap, ops::Deref, sync::Arc};

use ferrodb_catalog::RoutineId;

use crate::descriptor::Invocable;

pub use standard::ids;

/// One entry of the builtin table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinDef {
	pub id: RoutineId,
	pub name: &'static str,
	pub arity: u8,
	pub target: Invocable,
}

#[derive(Debug, Clone)]
pub struct BuiltinRegistry(Arc<BuiltinRegistryInner>);

#[derive(Debug, Default)]
pub struct BuiltinRegistryInner {
	by_id: HashMap<RoutineId, BuiltinDef>,
	by_name: HashMap<&'static str, RoutineId>,
}

impl BuiltinRegistry {
	/// The table of routines shipped with the engine, built once per
	/// process.
	pub fn standard() -> BuiltinRegistry {
		standard::table().clone()
	}

	pub fn builder() -> BuiltinRegistryBuilder {
		BuiltinRegistryBuilder {
			inner: BuiltinRegistryInner::default(),
		}
	}
}

impl BuiltinRegistryInner {
	pub fn find(&self, id: RoutineId) -> Option<&BuiltinDef> {
		self.by_id.get(&id)
	}

	pub fn find_by_name(&self, name: &str) -> Option<&BuiltinDef> {
		self.by_name.get(name).and_then(|id| self.by_id.get(id))
	}

	pub fn len(&self) -> usize {
		self.by_id.len()
	}

	pub fn is_empty(&self) -> bool {
		self.by_id.is_empty()
	}
}

impl Deref for BuiltinRegistry {
	type Target = BuiltinRegistryInner;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

pub struct BuiltinRegistryBuilder {
	inner: BuiltinRegistryInner,
}

impl BuiltinRegistryBuilder {
	pub fn with(mut self, def: BuiltinDef) -> Self {
		self.inner.by_name.insert(def.name, def.id);
		self.inner.by_id.insert(def.id, def);
		self
	}

	pub fn with_routine(self, id: RoutineId, name: &'static str, arity: u8, target: crate::RoutineFn) -> Self {
		self.with(BuiltinDef {
			id,
			name,
			arity,
			target: Invocable::Routine(target),
		})
	}

	pub fn with_handler(self, id: RoutineId, name: &'static str, target: crate::HandlerFn) -> Self {
		self.with(BuiltinDef {
			id,
			name,
			// A handler receives the delegated call, not argument
			// slots of its own.
			arity: 0,
			target: Invocable::Handler(target),
		})
	}

	pub fn build(self) -> BuiltinRegistry {
		BuiltinRegistry(Arc::new(self.inner))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_find_by_id_and_name() {
		let registry = BuiltinRegistry::standard();

		let def = registry.find(ids::INT8_ADD).unwrap();
		assert_eq!(def.name, "int8_add");
		assert_eq!(def.arity, 2);

		let by_name = registry.find_by_name("int8_add").unwrap();
		assert_eq!(by_name.id, ids::INT8_ADD);
	}

	#[test]
	fn test_missing_entries() {
		let registry = BuiltinRegistry::standard();

		assert!(registry.find(RoutineId(u64::MAX)).is_none());
		assert!(registry.find_by_name("no_such_routine").is_none());
	}

	#[test]
	fn test_standard_table_is_not_empty() {
		let registry = BuiltinRegistry::standard();
		assert!(!registry.is_empty());
		assert_eq!(registry.len(), BuiltinRegistry::standard().len());
	}
}
