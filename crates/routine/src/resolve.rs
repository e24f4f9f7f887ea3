// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use std::sync::Arc;

use ferrodb_catalog::{RoutineCatalog, RoutineId, id};
use tracing::{instrument, trace};

use crate::{
	MAX_HANDLER_DEPTH,
	builtin::BuiltinRegistry,
	descriptor::{ResolvedRoutine, RoutineOrigin},
	error::ResolveError,
	interface::{QueryRunner, RoutineLoader, UnconfiguredLoader, UnconfiguredRunner},
};

/// The routine manager: the builtin table plus the collaborators needed
/// to resolve and invoke catalog routines.
///
/// Cheap to clone and safe to share across execution contexts; all inner
/// state is immutable or owned by the collaborators.
#[derive(Clone)]
pub struct Routines(Arc<RoutinesInner>);

pub(crate) struct RoutinesInner {
	pub(crate) registry: BuiltinRegistry,
	pub(crate) catalog: Arc<dyn RoutineCatalog>,
	pub(crate) loader: Arc<dyn RoutineLoader>,
	pub(crate) runner: Arc<dyn QueryRunner>,
}

impl Routines {
	pub fn builder() -> RoutinesBuilder {
		RoutinesBuilder {
			registry: None,
			catalog: None,
			loader: None,
			runner: None,
		}
	}

	pub(crate) fn inner(&self) -> &RoutinesInner {
		&self.0
	}

	/// Resolve a routine id to an invocable descriptor.
	///
	/// Performs the catalog and loader lookups every time; callers that
	/// invoke the same routine repeatedly should keep the returned
	/// descriptor instead of resolving again. Resolving twice against an
	/// unchanged catalog yields value-equal descriptors.
	#[instrument(name = "routine::resolve", level = "trace", skip(self))]
	pub fn resolve(&self, id: RoutineId) -> Result<ResolvedRoutine, ResolveError> {
		self.resolve_at(id, 0)
	}

	fn resolve_at(&self, id: RoutineId, depth: usize) -> Result<ResolvedRoutine, ResolveError> {
		// The builtin table wins over any catalog row with the same id.
		if let Some(def) = self.0.registry.find(id) {
			trace!(routine = %id, "resolved from builtin table");
			return Ok(ResolvedRoutine {
				id,
				origin: RoutineOrigin::Builtin,
				arity: def.arity,
				target: Some(def.target),
				handler: None,
			});
		}

		let def = self.0.catalog.find_routine(id).ok_or(ResolveError::CatalogLookupFailed {
			routine: id,
		})?;

		// Untrusted routines resolve fine; it is calling them that fails.
		if !def.trusted {
			return Ok(ResolvedRoutine {
				id,
				origin: RoutineOrigin::Untrusted,
				arity: def.arity,
				target: None,
				handler: None,
			});
		}

		match def.language {
			id::INTERNAL => {
				let entry =
					self.0.registry.find_by_name(&def.name).ok_or_else(|| ResolveError::InternalNotFound {
						routine: id,
						name: def.name.clone(),
					})?;
				Ok(ResolvedRoutine {
					id,
					origin: RoutineOrigin::Internal,
					arity: def.arity,
					target: Some(entry.target),
					handler: None,
				})
			}
			id::NATIVE => {
				// The loader reports the true argument count; the
				// catalog's declared count is not authoritative here.
				let loaded = self.0.loader.load(id).map_err(|cause| ResolveError::LoadFailed {
					routine: id,
					cause,
				})?;
				Ok(ResolvedRoutine {
					id,
					origin: RoutineOrigin::Native,
					arity: loaded.arity,
					target: Some(loaded.target),
					handler: None,
				})
			}
			id::RQL => Ok(ResolvedRoutine {
				id,
				origin: RoutineOrigin::Rql,
				arity: def.arity,
				target: None,
				handler: None,
			}),
			language => {
				let lang = self
					.0
					.catalog
					.find_language(language)
					.filter(|lang| lang.procedural)
					.ok_or(ResolveError::UnknownLanguage {
						routine: id,
						language,
					})?;
				if depth >= MAX_HANDLER_DEPTH {
					return Err(ResolveError::HandlerTooDeep {
						routine: id,
						language,
						max: MAX_HANDLER_DEPTH,
					});
				}
				let handler = self.resolve_at(lang.handler, depth + 1)?;
				trace!(routine = %id, language = %language, handler = %lang.handler, "resolved through language handler");
				Ok(ResolvedRoutine {
					id,
					origin: RoutineOrigin::Handler,
					arity: def.arity,
					target: None,
					handler: Some(Box::new(handler)),
				})
			}
		}
	}
}

pub struct RoutinesBuilder {
	registry: Option<BuiltinRegistry>,
	catalog: Option<Arc<dyn RoutineCatalog>>,
	loader: Option<Arc<dyn RoutineLoader>>,
	runner: Option<Arc<dyn QueryRunner>>,
}

impl RoutinesBuilder {
	pub fn registry(mut self, registry: BuiltinRegistry) -> Self {
		self.registry = Some(registry);
		self
	}

	pub fn catalog(mut self, catalog: impl RoutineCatalog + 'static) -> Self {
		self.catalog = Some(Arc::new(catalog));
		self
	}

	pub fn loader(mut self, loader: impl RoutineLoader + 'static) -> Self {
		self.loader = Some(Arc::new(loader));
		self
	}

	pub fn runner(mut self, runner: impl QueryRunner + 'static) -> Self {
		self.runner = Some(Arc::new(runner));
		self
	}

	pub fn build(self) -> Routines {
		Routines(Arc::new(RoutinesInner {
			registry: self.registry.unwrap_or_else(BuiltinRegistry::standard),
			catalog: self.catalog.unwrap_or_else(|| Arc::new(ferrodb_catalog::MaterializedCatalog::empty())),
			loader: self.loader.unwrap_or_else(|| Arc::new(UnconfiguredLoader)),
			runner: self.runner.unwrap_or_else(|| Arc::new(UnconfiguredRunner)),
		}))
	}
}
