/// User agent string for HTTP requests
pub const USER_AGENT: &str = "mcp-thai-weather/0.1.0";

/// OpenWeatherMap API base URL
pub const OPEN_WEATHER_API_BASE: &str = "https://api.openweathermap.org/data/2.5";

/// Country qualifier appended to every provider query
pub const COUNTRY_CODE: &str = "TH";

/// Location used when the caller does not name one
pub const DEFAULT_LOCATION: &str = "Bangkok";

/// Number of daily entries in every forecast
pub const FORECAST_DAYS: usize = 5;

/// Default cache lifetime (15 minutes)
pub const DEFAULT_CACHE_DURATION_MS: u64 = 900_000;

/// Default ceiling for a single provider request
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Asia/Bangkok, UTC+7
pub const DEFAULT_UTC_OFFSET_MINUTES: i32 = 420;

/// Simulated network cost of the synthetic generator
pub const DEFAULT_SYNTHETIC_LATENCY_MS: u64 = 500;

/// Shown for failures that carry no error kind
pub const GENERIC_ERROR_MESSAGE: &str = "Unknown error occurred";
