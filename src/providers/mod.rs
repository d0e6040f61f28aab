pub mod caching;
pub mod coingecko;
pub mod util;

pub use caching::CachingMarketProvider;
pub use coingecko::CoinGeckoProvider;
