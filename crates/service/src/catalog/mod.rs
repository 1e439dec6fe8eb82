//! The service catalog: write-side store with version tracking, the
//! read-side query engine, and the template store.

pub mod query;
pub mod store;
pub mod templates;

pub use query::{CatalogStats, Page, ServiceFilter, ServiceQueryEngine, SortField, SortOrder};
pub use store::ServiceCatalog;
pub use templates::TemplateStore;
