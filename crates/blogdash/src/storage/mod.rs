//! Storage backends.
//!
//! - [`SanityClient`] and [`InMemoryDocumentStore`] implement `DocumentStore`
//! - [`FileStorage`] and [`MemoryStorage`] implement `KeyValueStorage`

mod inmemory;
mod local;
mod sanity;

pub use inmemory::InMemoryDocumentStore;
pub use local::{FileStorage, MemoryStorage};
pub use sanity::SanityClient;
