pub mod yahoo;

pub use yahoo::{yahoo_price_source, YahooClient, YahooIntraday, YahooQuoteInfo, YahooSnapshot};
