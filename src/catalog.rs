//! Column catalog: which columns a table has and how their declared types
//! affect search behaviour.
//!
//! The catalog is built once per translation call and read-only afterwards.
//! Declared types collapse to a three-way classification; only the integer
//! family and booleans change predicate selection, everything else is
//! searched as text.

use sea_orm::sea_query::ColumnType;
use sea_orm::{ColumnTrait, EntityTrait, IdenStatic, Iterable};
use std::collections::BTreeMap;

/// Three-way type classification driving predicate selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredType {
    Integer,
    Boolean,
    Other,
}

impl DeclaredType {
    /// Classify a `sea_query` column type. The whole integer family, signed
    /// and unsigned, counts as `Integer`.
    #[must_use]
    pub fn of(column_type: &ColumnType) -> Self {
        match column_type {
            ColumnType::TinyInteger
            | ColumnType::SmallInteger
            | ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::TinyUnsigned
            | ColumnType::SmallUnsigned
            | ColumnType::Unsigned
            | ColumnType::BigUnsigned => Self::Integer,
            ColumnType::Boolean => Self::Boolean,
            _ => Self::Other,
        }
    }
}

/// Ordered map of physical column name to declared type for one table.
#[derive(Debug, Clone, Default)]
pub struct ColumnCatalog {
    columns: BTreeMap<String, DeclaredType>,
}

impl ColumnCatalog {
    /// Build the catalog from a Sea-ORM entity's column metadata.
    #[must_use]
    pub fn from_entity<E: EntityTrait>() -> Self {
        Self::from_columns(E::Column::iter().map(|column| {
            let declared = DeclaredType::of(column.def().get_column_type());
            (column.as_str().to_owned(), declared)
        }))
    }

    /// Build the catalog from explicit entries, for callers without an
    /// entity. Names are normalized by stripping quoting artifacts.
    pub fn from_columns<I, N>(entries: I) -> Self
    where
        I: IntoIterator<Item = (N, DeclaredType)>,
        N: Into<String>,
    {
        let columns = entries
            .into_iter()
            .map(|(name, declared)| (strip_quotes(&name.into()), declared))
            .collect();
        Self { columns }
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }

    #[must_use]
    pub fn declared_type(&self, name: &str) -> Option<DeclaredType> {
        self.columns.get(name).copied()
    }

    /// Column names in catalog order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.columns.keys().map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.columns.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }
}

/// Some schema drivers report identifiers with their quoting still attached.
fn strip_quotes(name: &str) -> String {
    name.chars().filter(|c| *c != '`' && *c != '"').collect()
}
