// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

#![cfg_attr(not(debug_assertions), deny(warnings))]

pub use error::CatalogError;
pub mod def;
mod error;
pub mod id;
pub mod materialized;

pub use def::{LanguageDef, RoutineDef};
pub use id::{LanguageId, RoutineId};
pub use materialized::MaterializedCatalog;

pub type Result<T> = std::result::Result<T, CatalogError>;

/// Upper bound on the number of arguments a user-declarable routine may
/// carry in its catalog row.
///
/// This is a property of the catalog format, not of the call dispatcher:
/// the dispatcher itself supports one more slot for routines constructed
/// inside the engine, which never pass catalog validation. Keep the two
/// limits distinct.
pub const MAX_DECLARED_ARGS: u8 = 8;

/// Read access to routine and language metadata.
///
/// Absence is reported as `None`; it is the caller's job to decide whether
/// a missing row is an error. Implementations are expected to be
/// inherently thread-safe or synchronized behind their own boundary.
pub trait RoutineCatalog: Send + Sync {
	fn find_routine(&self, id: RoutineId) -> Option<RoutineDef>;
	fn find_language(&self, id: LanguageId) -> Option<LanguageDef>;
}
