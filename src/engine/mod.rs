//! The bounded stages of the quote pipeline.

pub mod fetcher;
pub mod store;

pub use fetcher::QuoteFetcher;
pub use store::QuoteStore;
