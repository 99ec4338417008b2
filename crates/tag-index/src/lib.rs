//! Per-chat tag index.
//!
//! Maps normalized tag titles to their canonical form so free text typed in
//! a chat can be resolved to a gallery tag. Everything is kept in memory and
//! recomputed from the gallery on demand.

mod error;
mod source;
mod store;
mod types;

pub use error::TagIndexError;
pub use source::TagSource;
pub use store::{InitReport, TagIndexStore};
pub use types::*;
