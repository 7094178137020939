//! Typed access to blog posts in the headless CMS.

mod bulk;
mod error;
mod service;

pub use bulk::{BulkFailure, BulkOutcome};
pub use error::CmsError;
pub use service::CmsService;
