// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

//! In-memory routine catalog.
//!
//! Holds fully materialized routine and language rows behind an `Arc`,
//! making lookups lock-free and the catalog cheap to share across
//! execution contexts. Built once through [`MaterializedCatalogBuilder`]
//! and immutable thereafter; cache invalidation means building a new
//! catalog, never mutating this one.

use std::{collections::HashMap, sync::Arc};

use tracing::trace;

use crate::{
	CatalogError, MAX_DECLARED_ARGS, RoutineCatalog,
	def::{LanguageDef, RoutineDef},
	id::{LanguageId, RoutineId},
};

#[derive(Debug, Clone)]
pub struct MaterializedCatalog(Arc<MaterializedCatalogInner>);

#[derive(Debug, Default)]
struct MaterializedCatalogInner {
	routines: HashMap<RoutineId, RoutineDef>,
	languages: HashMap<LanguageId, LanguageDef>,
}

impl MaterializedCatalog {
	pub fn empty() -> Self {
		Self::builder().build()
	}

	pub fn builder() -> MaterializedCatalogBuilder {
		MaterializedCatalogBuilder {
			inner: MaterializedCatalogInner::default(),
		}
	}

	pub fn routine_count(&self) -> usize {
		self.0.routines.len()
	}
}

impl RoutineCatalog for MaterializedCatalog {
	fn find_routine(&self, id: RoutineId) -> Option<RoutineDef> {
		self.0.routines.get(&id).cloned()
	}

	fn find_language(&self, id: LanguageId) -> Option<LanguageDef> {
		self.0.languages.get(&id).cloned()
	}
}

pub struct MaterializedCatalogBuilder {
	inner: MaterializedCatalogInner,
}

impl MaterializedCatalogBuilder {
	/// Add a routine row. Re-adding an id replaces the previous row.
	///
	/// Rejects rows declaring more than [`MAX_DECLARED_ARGS`] arguments;
	/// the catalog format cannot represent them.
	pub fn with_routine(mut self, def: RoutineDef) -> crate::Result<Self> {
		if def.arity > MAX_DECLARED_ARGS {
			return Err(CatalogError::ArityOutOfRange {
				routine: def.id,
				arity: def.arity,
				max: MAX_DECLARED_ARGS,
			});
		}
		trace!(routine = %def.id, name = %def.name, "materialized routine row");
		self.inner.routines.insert(def.id, def);
		Ok(self)
	}

	/// Add a language row. Re-adding an id replaces the previous row.
	pub fn with_language(mut self, def: LanguageDef) -> Self {
		self.inner.languages.insert(def.id, def);
		self
	}

	pub fn build(self) -> MaterializedCatalog {
		MaterializedCatalog(Arc::new(self.inner))
	}
}
