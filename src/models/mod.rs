//! Domain models shared across the quote server.

pub mod quote;

pub use quote::{Envelope, Quote, QuoteResponse};
