// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use serde::{Deserialize, Serialize};

use crate::id::{LanguageId, RoutineId};

/// Catalog row describing a callable routine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineDef {
	pub id: RoutineId,
	/// Symbolic name. For internal-language routines this is the key
	/// into the builtin table.
	pub name: String,
	pub language: LanguageId,
	/// Routines marked untrusted resolve but may never be called.
	pub trusted: bool,
	/// Declared argument count. Not authoritative for native routines,
	/// where the loader reports the true count.
	pub arity: u8,
}

/// Catalog row describing a routine implementation language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageDef {
	pub id: LanguageId,
	pub name: String,
	/// Whether this is a pluggable procedural language whose routines
	/// are run through a call handler.
	pub procedural: bool,
	/// The language's designated call-handler routine. Only meaningful
	/// when `procedural` is set.
	pub handler: RoutineId,
}
