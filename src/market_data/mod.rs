//! Price Source: current market prices for a ticker.

mod provider;
#[cfg(feature = "remote")]
pub mod providers;
mod sources;

pub use provider::ZeroPriceSource;
pub use sources::{FallbackPriceSource, PriceLookup, PriceSource};
