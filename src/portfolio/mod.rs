// src/portfolio/mod.rs
pub mod aggregate;
mod banks;
mod models;
mod service;

pub use banks::bank_summary;
pub use models::*;
pub use service::*;
