//! # gridtables
//!
//! Server-side processing for DataTables-style grid components on top of
//! Axum and Sea-ORM.
//!
//! A grid client posts a request carrying pagination offsets, per-column
//! search terms and a sort specification. [`GridProvider`] translates that
//! request into a filtered, ordered, paginated `sea_query` statement against
//! a caller-supplied base query, computes consistent row counts, and returns
//! the fixed envelope grid UIs expect: the echoed `draw` id, `recordsTotal`,
//! `recordsFiltered` and one page of rows.
//!
//! ```rust,no_run
//! use gridtables::{ColumnCatalog, GridProvider, GridRequest, GridSource};
//! use sea_orm::DatabaseConnection;
//!
//! async fn people_grid(
//!     db: &DatabaseConnection,
//!     request: GridRequest,
//! ) -> Result<gridtables::GridResponse, gridtables::GridError> {
//!     let catalog = ColumnCatalog::from_entity::<people::Entity>();
//!     GridProvider::new(request)
//!         .provide(db, GridSource::new("people"), &catalog)
//!         .await
//! }
//! # mod people {
//! #     use sea_orm::entity::prelude::*;
//! #     #[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
//! #     #[sea_orm(table_name = "people")]
//! #     pub struct Model {
//! #         #[sea_orm(primary_key)]
//! #         pub id: i32,
//! #         pub name: String,
//! #     }
//! #     #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
//! #     pub enum Relation {}
//! #     impl ActiveModelBehavior for ActiveModel {}
//! # }
//! ```
//!
//! The engine is deliberately forgiving towards stale clients: a search or
//! order referencing a column the server no longer has is skipped silently,
//! and a query that outruns its time budget degrades to an empty page with an
//! error message instead of a hard failure.

pub mod budget;
pub mod catalog;
pub mod compose;
pub mod count;
pub mod errors;
pub mod fulltext;
pub mod models;
pub mod predicate;
pub mod provider;
pub mod resolve;

pub use budget::TimeBudget;
pub use catalog::{ColumnCatalog, DeclaredType};
pub use compose::{ComposedGrid, GridSource};
pub use count::SIMPLE_PAGINATION_RECORDS;
pub use errors::GridError;
pub use fulltext::{FulltextBackend, FulltextPage};
pub use models::{GridColumn, GridOrder, GridRequest, GridResponse, GridSearch};
pub use provider::{GridConfig, GridProvider};
pub use resolve::{ColumnResolver, FieldRef};
