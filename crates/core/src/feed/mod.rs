//! Lead feed: the owned snapshot of the latest fetch for the current
//! selection

pub mod ports;
pub mod service;

pub use service::{FeedSnapshot, LeadFeed};
