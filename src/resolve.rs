//! Resolution of logical column keys to SQL field references.
//!
//! A key resolves to a caller-declared alias expression first, then to a
//! physical `table.column` reference, and otherwise to nothing. "Nothing" is
//! not an error: a grid client may still reference columns the server
//! removed or renamed, and one stale column must not fail the whole page.

use crate::catalog::{ColumnCatalog, DeclaredType};
use std::collections::{BTreeMap, BTreeSet};

/// A resolved field: either a raw alias expression or a qualified physical
/// column reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldRef {
    /// SQL text of the field, used verbatim in predicates and ordering.
    pub expr: String,
    /// True when the field came from the caller's alias map.
    pub aliased: bool,
}

/// Per-call resolver over the catalog, alias map and strict-search set.
/// All inputs are borrowed and read-only for the duration of one call.
pub struct ColumnResolver<'a> {
    table: &'a str,
    catalog: &'a ColumnCatalog,
    aliases: &'a BTreeMap<String, String>,
    strict: &'a BTreeSet<String>,
}

impl<'a> ColumnResolver<'a> {
    #[must_use]
    pub fn new(
        table: &'a str,
        catalog: &'a ColumnCatalog,
        aliases: &'a BTreeMap<String, String>,
        strict: &'a BTreeSet<String>,
    ) -> Self {
        Self {
            table,
            catalog,
            aliases,
            strict,
        }
    }

    /// Alias expression first, physical column second, absent otherwise.
    #[must_use]
    pub fn resolve(&self, key: &str) -> Option<FieldRef> {
        if let Some(expression) = self.aliases.get(key) {
            return Some(FieldRef {
                expr: expression.clone(),
                aliased: true,
            });
        }
        if self.catalog.contains(key) {
            return Some(FieldRef {
                expr: format!("{}.{}", self.table, key),
                aliased: false,
            });
        }
        None
    }

    /// Declared type of the physical column behind `key`, if any. Aliased
    /// keys have no catalog entry and default to text search.
    #[must_use]
    pub fn declared_type(&self, key: &str) -> Option<DeclaredType> {
        self.catalog.declared_type(key)
    }

    #[must_use]
    pub fn is_strict(&self, key: &str) -> bool {
        self.strict.contains(key)
    }

    #[must_use]
    pub fn table(&self) -> &str {
        self.table
    }

    /// Catalog columns that belong in the select list, hidden ones removed.
    #[must_use]
    pub fn select_columns(&self, hidden: &BTreeSet<String>) -> Vec<&str> {
        self.catalog
            .names()
            .filter(|name| !hidden.contains(*name))
            .collect()
    }

    /// Alias entries in stable order, for `expression AS alias` selects.
    pub fn alias_entries(&self) -> impl Iterator<Item = (&String, &String)> {
        self.aliases.iter()
    }
}
