pub mod engine;
pub mod errors;
pub mod frontier;
pub mod state;
pub mod types;

pub use engine::CrawlEngine;
pub use errors::CrawlError;
pub use frontier::Frontier;
pub use state::{CrawlRunState, CrawlStatus};
pub use types::{CrawlRequest, CrawlRequestBuilder, DebugEvent, DebugRow, PageRecord};
