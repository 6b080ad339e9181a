//! Search module.
//!
//! Case-insensitive product name filtering.

mod index;
mod results;

pub use index::SearchIndex;
pub use results::FilterResults;
