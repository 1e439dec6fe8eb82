//! Domain types for the consulting-services catalog: the Service
//! record and its embedded sub-records, lifecycle state machine, slug
//! derivation, payload shapes, templates, and the auth-boundary user.

pub mod category;
pub mod errors;
pub mod lifecycle;
pub mod payload;
pub mod record;
pub mod slug;
pub mod template;
pub mod user;

pub use category::{Category, SocialPlatform};
pub use lifecycle::LifecycleState;
pub use payload::ServicePayload;
pub use record::{ServiceRecord, VersionSnapshot};
pub use template::TemplateRecord;
