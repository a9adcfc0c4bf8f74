pub mod config;
pub mod crawl;
pub mod extractor;
pub mod fetcher;
pub mod matcher;
pub mod orchestrator;
pub mod preferences;
pub mod seeds;
pub mod sentiment;
pub mod session;
