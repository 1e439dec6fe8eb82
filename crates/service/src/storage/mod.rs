//! Storage abstractions for the service layer.
//!
//! One reusable file-backed JSON store shared by the catalog, template,
//! and user collections; each collection is its own file under the data
//! directory.

pub mod document_store;

pub use document_store::DocumentStore;
