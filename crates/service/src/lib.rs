//! Service layer for the catalog backend.
//! - Validation gate and the versioned service catalog store.
//! - Read-side query engine, admin workflow and template store.
//! - Account registration, login and token handling.

pub mod auth;
pub mod catalog;
pub mod errors;
pub mod pagination;
pub mod runtime;
pub mod storage;
pub mod validation;
pub mod workflow;

pub use catalog::{ServiceCatalog, ServiceQueryEngine, TemplateStore};
pub use errors::{FieldErrors, ServiceError};
pub use workflow::AdminWorkflow;
