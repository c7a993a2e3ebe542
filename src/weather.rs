//! Source selection and the caller-facing weather service

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::cache::WeatherCache;
use crate::error::WeatherError;
use crate::locations::LocationIndex;
use crate::models::WeatherData;
use crate::search::SearchEngine;
use crate::synthetic::SyntheticWeatherGenerator;

/// Anything that can produce [`WeatherData`] for a location label
#[async_trait]
pub trait WeatherSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, location: &str) -> Result<WeatherData, WeatherError>;
}

/// Outcome of the remote step, kept as a value so the fallback branch is explicit
#[derive(Debug)]
pub enum RemoteAttempt {
    /// No remote source configured
    Skipped,
    Succeeded(WeatherData),
    Failed(WeatherError),
}

/// Which source answered a request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Remote,
    /// Synthetic because no remote source is configured
    Synthetic,
    /// Synthetic standing in for a failed remote call
    Fallback,
}

/// Remote provider first, synthetic generator as the fallback
pub struct WeatherSourceChain {
    index: &'static LocationIndex,
    remote: Option<Arc<dyn WeatherSource>>,
    synthetic: SyntheticWeatherGenerator,
}

impl WeatherSourceChain {
    pub fn new(
        index: &'static LocationIndex,
        remote: Option<Arc<dyn WeatherSource>>,
        synthetic: SyntheticWeatherGenerator,
    ) -> Self {
        Self {
            index,
            remote,
            synthetic,
        }
    }

    pub fn has_remote(&self) -> bool {
        self.remote.is_some()
    }

    pub async fn attempt_remote(&self, location: &str) -> RemoteAttempt {
        let Some(remote) = &self.remote else {
            return RemoteAttempt::Skipped;
        };
        match remote.fetch(location).await {
            Ok(data) => RemoteAttempt::Succeeded(data),
            Err(err) => RemoteAttempt::Failed(err),
        }
    }

    /// Only an unresolvable location escapes as an error; remote failures
    /// are logged and replaced by synthetic data.
    pub async fn get_weather(
        &self,
        location: &str,
    ) -> Result<(WeatherData, Origin), WeatherError> {
        let label = self.index.resolve(location)?.label();

        let origin = match self.attempt_remote(&label).await {
            RemoteAttempt::Succeeded(data) => {
                info!("Serving {} from remote provider", label);
                return Ok((data, Origin::Remote));
            }
            RemoteAttempt::Failed(err) => {
                warn!(
                    "Remote provider failed for {}, falling back to synthetic data: {}",
                    label, err
                );
                Origin::Fallback
            }
            RemoteAttempt::Skipped => {
                debug!("No remote provider configured");
                Origin::Synthetic
            }
        };

        info!("Serving {} from {}", label, self.synthetic.name());
        let data = self.synthetic.generate(&label).await?;
        Ok((data, origin))
    }
}

/// Caller-facing entry point: defaults, caching, error re-typing and search
pub struct WeatherService {
    index: &'static LocationIndex,
    chain: WeatherSourceChain,
    cache: WeatherCache,
    search: SearchEngine,
    default_location: String,
}

impl WeatherService {
    pub fn new(
        index: &'static LocationIndex,
        chain: WeatherSourceChain,
        cache: WeatherCache,
        default_location: impl Into<String>,
    ) -> Self {
        Self {
            index,
            chain,
            cache,
            search: SearchEngine::new(index),
            default_location: default_location.into(),
        }
    }

    /// Weather for `location`, or for the default location when absent or blank.
    /// Errors carry the fixed user-facing message for their kind. Fallback
    /// data is never cached so a recovered provider is used on the next call.
    pub async fn get_weather(&self, location: Option<&str>) -> Result<WeatherData, WeatherError> {
        let location = location
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .unwrap_or(self.default_location.as_str());

        let key = self
            .index
            .resolve(location)
            .map_err(|err| err.retyped())?
            .label();

        if let Some(data) = self.cache.get(&key).await {
            debug!("Cache hit for {}", key);
            return Ok(data);
        }

        let (data, origin) = self
            .chain
            .get_weather(&key)
            .await
            .map_err(|err| err.retyped())?;
        if origin == Origin::Fallback {
            debug!("Not caching fallback data for {}", key);
        } else {
            self.cache.put(&key, data.clone()).await;
        }
        Ok(data)
    }

    pub fn search_locations(&self, term: &str) -> Vec<String> {
        self.search.search(term)
    }

    pub fn all_locations(&self) -> Vec<String> {
        self.search.all_locations()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{seeded_source, FixedClock};
    use crate::error::ErrorKind;
    use crate::locations::BANGKOK_METRO;
    use chrono::DateTime;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingFailure {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherSource for CountingFailure {
        fn name(&self) -> &'static str {
            "failing"
        }

        async fn fetch(&self, _location: &str) -> Result<WeatherData, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Err(WeatherError::network("connection refused"))
        }
    }

    /// Remote that can be switched between down and up; labels its data `REMOTE`
    struct FlakyRemote {
        up: AtomicBool,
        calls: AtomicUsize,
        inner: SyntheticWeatherGenerator,
    }

    impl FlakyRemote {
        fn new(up: bool) -> Arc<Self> {
            Arc::new(Self {
                up: AtomicBool::new(up),
                calls: AtomicUsize::new(0),
                inner: SyntheticWeatherGenerator::new(
                    &BANGKOK_METRO,
                    clock(),
                    seeded_source(7),
                    Duration::ZERO,
                ),
            })
        }
    }

    #[async_trait]
    impl WeatherSource for FlakyRemote {
        fn name(&self) -> &'static str {
            "flaky"
        }

        async fn fetch(&self, location: &str) -> Result<WeatherData, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if !self.up.load(Ordering::SeqCst) {
                return Err(WeatherError::network("service unavailable"));
            }
            let mut data = self.inner.generate(location).await?;
            data.current.city = "REMOTE".to_string();
            Ok(data)
        }
    }

    fn clock() -> Arc<FixedClock> {
        Arc::new(FixedClock(
            DateTime::parse_from_rfc3339("2026-10-14T08:00:00+07:00").unwrap(),
        ))
    }

    fn chain(remote: Option<Arc<dyn WeatherSource>>) -> WeatherSourceChain {
        let synthetic = SyntheticWeatherGenerator::new(
            &BANGKOK_METRO,
            clock(),
            seeded_source(11),
            Duration::ZERO,
        );
        WeatherSourceChain::new(&BANGKOK_METRO, remote, synthetic)
    }

    #[tokio::test]
    async fn test_skipped_without_remote() {
        let chain = chain(None);
        assert!(!chain.has_remote());
        assert!(matches!(
            chain.attempt_remote("Bangkok").await,
            RemoteAttempt::Skipped
        ));
        let (data, origin) = chain.get_weather("Bangkok").await.unwrap();
        assert_eq!(data.current.city, "Bangkok");
        assert_eq!(origin, Origin::Synthetic);
    }

    #[tokio::test]
    async fn test_remote_failure_is_masked() {
        let failing = Arc::new(CountingFailure {
            calls: AtomicUsize::new(0),
        });
        let chain = chain(Some(failing.clone() as Arc<dyn WeatherSource>));

        assert!(matches!(
            chain.attempt_remote("Bangkok").await,
            RemoteAttempt::Failed(WeatherError::Network { .. })
        ));
        let (data, origin) = chain.get_weather("Lat Krabang").await.unwrap();
        assert_eq!(data.current.city, "Lat Krabang, Bangkok");
        assert_eq!(origin, Origin::Fallback);
        assert_eq!(data.forecast.len(), 5);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_unresolvable_location_skips_remote() {
        let failing = Arc::new(CountingFailure {
            calls: AtomicUsize::new(0),
        });
        let chain = chain(Some(failing.clone() as Arc<dyn WeatherSource>));
        let err = chain.get_weather("NotARealPlace").await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LocationNotFound);
        assert_eq!(failing.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_service_defaults_and_retypes() {
        let cache = WeatherCache::new(Duration::ZERO, clock());
        let service = WeatherService::new(&BANGKOK_METRO, chain(None), cache, "Nonthaburi");

        let data = service.get_weather(None).await.unwrap();
        assert_eq!(data.current.city, "Nonthaburi");
        let data = service.get_weather(Some("   ")).await.unwrap();
        assert_eq!(data.current.city, "Nonthaburi");

        let err = service.get_weather(Some("Atlantis")).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::LocationNotFound);
        assert_eq!(err.message(), "The location you entered could not be found");
    }

    #[tokio::test]
    async fn test_service_caches_by_canonical_label() {
        let remote = FlakyRemote::new(true);
        let cache = WeatherCache::new(Duration::from_secs(900), clock());
        let service = WeatherService::new(
            &BANGKOK_METRO,
            chain(Some(remote.clone() as Arc<dyn WeatherSource>)),
            cache,
            "Bangkok",
        );

        let first = service.get_weather(Some("Sai Noi")).await.unwrap();
        let second = service
            .get_weather(Some("Sai Noi, Nonthaburi"))
            .await
            .unwrap();
        assert_eq!(first, second);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_fallback_is_not_cached_once_remote_recovers() {
        let remote = FlakyRemote::new(false);
        let cache = WeatherCache::new(Duration::from_secs(900), clock());
        let service = WeatherService::new(
            &BANGKOK_METRO,
            chain(Some(remote.clone() as Arc<dyn WeatherSource>)),
            cache,
            "Bangkok",
        );

        let first = service.get_weather(None).await.unwrap();
        assert_eq!(first.current.city, "Bangkok");

        remote.up.store(true, Ordering::SeqCst);
        let second = service.get_weather(None).await.unwrap();
        assert_eq!(second.current.city, "REMOTE");

        // remote data is cached as usual
        let third = service.get_weather(None).await.unwrap();
        assert_eq!(third, second);
        assert_eq!(remote.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_synthetic_only_service_still_caches() {
        let cache = WeatherCache::new(Duration::from_secs(900), clock());
        let service = WeatherService::new(&BANGKOK_METRO, chain(None), cache, "Bangkok");

        let first = service.get_weather(Some("Pak Kret")).await.unwrap();
        let second = service.get_weather(Some("Pak Kret")).await.unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_service_search_passthrough() {
        let cache = WeatherCache::new(Duration::ZERO, clock());
        let service = WeatherService::new(&BANGKOK_METRO, chain(None), cache, "Bangkok");
        assert_eq!(service.search_locations(""), service.all_locations());
        assert_eq!(service.search_locations("pak kret"), vec!["Pak Kret, Nonthaburi"]);
    }
}
