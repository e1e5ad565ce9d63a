//! Function registry: kernel function name ↔ dense integer identifier.
//!
//! Identifiers are assigned over the sorted, deduplicated set of names, so the
//! same library build always yields the same table. The builtin registry is
//! produced offline by `ferrum-gen` (see [`crate::functions`]).

use std::collections::HashMap;
use std::sync::Arc;

use lazy_static::lazy_static;

use crate::functions::FUNCTION_NAMES;

/// Dense, zero-based kernel identifier. [`FunctionId::UNKNOWN`] marks a name
/// the registry does not know.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FunctionId(i32);

impl FunctionId {
    pub const UNKNOWN: FunctionId = FunctionId(-1);

    pub const fn new(raw: i32) -> Self {
        FunctionId(raw)
    }

    pub const fn raw(self) -> i32 {
        self.0
    }

    pub fn is_unknown(self) -> bool {
        self.0 < 0
    }

    /// Slot index in a pipeline table, `None` for the sentinel.
    pub fn index(self) -> Option<usize> {
        usize::try_from(self.0).ok()
    }
}

impl std::fmt::Display for FunctionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Name → identifier table.
#[derive(Debug, Clone, Default)]
pub struct FunctionRegistry {
    names: Vec<String>,
    ids: HashMap<String, FunctionId>,
}

lazy_static! {
    static ref BUILTIN: Arc<FunctionRegistry> =
        Arc::new(FunctionRegistry::from_names(FUNCTION_NAMES.iter().copied()));
}

impl FunctionRegistry {
    /// Build a registry from an arbitrary list of names.
    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut names: Vec<String> = names.into_iter().map(Into::into).collect();
        names.sort();
        names.dedup();

        let ids = names
            .iter()
            .enumerate()
            .map(|(i, name)| (name.clone(), FunctionId(i as i32)))
            .collect();

        FunctionRegistry { names, ids }
    }

    /// The registry generated from the shipped kernel library.
    pub fn builtin() -> Arc<FunctionRegistry> {
        BUILTIN.clone()
    }

    pub fn lookup(&self, name: &str) -> FunctionId {
        self.ids.get(name).copied().unwrap_or(FunctionId::UNKNOWN)
    }

    pub fn name(&self, id: FunctionId) -> Option<&str> {
        id.index()
            .and_then(|i| self.names.get(i))
            .map(String::as_str)
    }

    /// Names in identifier order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}
