//! Lead webhook integration

pub mod client;

pub use client::WebhookLeadClient;
