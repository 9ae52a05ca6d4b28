//! Selection model: projects, campaigns and the persisted active pair

pub mod ports;
pub mod service;

pub use service::SelectionService;
