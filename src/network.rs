//! Network URL constants for the supported market-data providers.

/// Default REST API base URL (CoinGecko public API).
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Binance public REST API base URL.
pub const BINANCE_API_URL: &str = "https://api.binance.com/api/v3";

/// Quote currency used when none is configured.
pub const DEFAULT_VS_CURRENCY: &str = "usd";
