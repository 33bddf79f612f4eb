pub mod categorize;
pub mod clock;
pub mod config;
pub mod duration;
pub mod error;
pub mod format;
pub mod market_data;
pub mod models;
pub mod portfolio;
pub mod storage;
pub mod valuation;

pub use error::PortfolioError;
