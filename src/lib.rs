//! Weather reports for Bangkok and its neighbouring provinces
//!
//! Free-text locations are resolved against a fixed district table, weather
//! is fetched from OpenWeatherMap when a key is configured, and synthetic
//! data fills in whenever the provider is unavailable.

pub mod cache;
pub mod clock;
pub mod constants;
pub mod error;
pub mod formatters;
pub mod locations;
pub mod models;
pub mod remote;
pub mod search;
pub mod service;
pub mod settings;
pub mod synthetic;
pub mod weather;

use std::sync::Arc;

use anyhow::Result;
use clock::entropy_source;

pub use cache::WeatherCache;
pub use clock::{Clock, FixedClock, RandomSource, ScriptedRandom, SystemClock};
pub use error::{ErrorKind, WeatherError};
pub use locations::{LocationIndex, LocationKey, Region, BANGKOK_METRO};
pub use models::{CurrentWeather, ForecastDay, WeatherCondition, WeatherData, WindDirection};
pub use remote::{HttpTransport, RemoteWeatherAdapter, ReqwestTransport};
pub use search::SearchEngine;
pub use service::WeatherServer;
pub use settings::Settings;
pub use synthetic::SyntheticWeatherGenerator;
pub use weather::{Origin, RemoteAttempt, WeatherService, WeatherSource, WeatherSourceChain};

/// Wire the production service from settings
pub fn build_service(settings: &Settings) -> Result<WeatherService> {
    let clock: Arc<dyn Clock> = Arc::new(SystemClock::new(settings.utc_offset()?));

    let remote: Option<Arc<dyn WeatherSource>> = match &settings.api_key {
        Some(api_key) => {
            let transport =
                ReqwestTransport::new(&settings.api_base_url, api_key, settings.timeout())?;
            let adapter: Arc<dyn WeatherSource> =
                Arc::new(RemoteWeatherAdapter::new(Arc::new(transport), clock.clone()));
            Some(adapter)
        }
        None => None,
    };

    let synthetic = SyntheticWeatherGenerator::new(
        &BANGKOK_METRO,
        clock.clone(),
        entropy_source(),
        settings.synthetic_latency(),
    );
    let chain = WeatherSourceChain::new(&BANGKOK_METRO, remote, synthetic);
    let cache = WeatherCache::new(settings.cache_duration(), clock);

    Ok(WeatherService::new(
        &BANGKOK_METRO,
        chain,
        cache,
        settings.default_location.clone(),
    ))
}
