// SPDX-License-Identifier: Apache-2.0
// Copyright (c) 2025 FerroDB

use std::{
	fmt::{self, Display, Formatter},
	ops::Deref,
};

use serde::{Deserialize, Serialize};

/// Stable identifier of a callable routine.
///
/// Immutable once assigned; keys both the catalog and the builtin table.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct RoutineId(pub u64);

impl Deref for RoutineId {
	type Target = u64;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl PartialEq<u64> for RoutineId {
	fn eq(&self, other: &u64) -> bool {
		self.0.eq(other)
	}
}

impl From<RoutineId> for u64 {
	fn from(value: RoutineId) -> Self {
		value.0
	}
}

impl Display for RoutineId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Stable identifier of a routine implementation language.
#[repr(transparent)]
#[derive(Debug, Copy, Clone, PartialOrd, PartialEq, Ord, Eq, Hash, Serialize, Deserialize)]
pub struct LanguageId(pub u64);

impl Deref for LanguageId {
	type Target = u64;

	fn deref(&self) -> &Self::Target {
		&self.0
	}
}

impl PartialEq<u64> for LanguageId {
	fn eq(&self, other: &u64) -> bool {
		self.0.eq(other)
	}
}

impl From<LanguageId> for u64 {
	fn from(value: LanguageId) -> Self {
		value.0
	}
}

impl Display for LanguageId {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		write!(f, "{}", self.0)
	}
}

/// Language of routines implemented inside the engine and addressed by
/// symbolic name in the builtin table.
pub const INTERNAL: LanguageId = LanguageId(12);

/// Language of natively compiled routines resolved at runtime through the
/// dynamic loader.
pub const NATIVE: LanguageId = LanguageId(13);

/// Language of routines whose body is an RQL query, executed by the query
/// engine rather than through a code address.
pub const RQL: LanguageId = LanguageId(14);
