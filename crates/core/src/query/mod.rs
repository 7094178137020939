//! Typed model of the document queries the dashboard issues.
//!
//! The access layer builds a [`Query`]; remote stores render it to GROQ with
//! [`render_groq`] while the in-memory store evaluates it directly with
//! [`evaluate`].

mod eval;
mod model;
mod render;

pub use eval::{compare_values, evaluate, lookup_path};
pub use model::{Direction, Field, Filter, FilterValue, Order, Query, Selection};
pub use render::render_groq;
