//! Web search integration

pub mod traits;
pub mod providers;

pub use traits::{SearchDepth, SearchHit, SearchProvider, SearchResult};
pub use providers::TavilyProvider;
