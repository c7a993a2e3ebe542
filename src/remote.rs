//! OpenWeatherMap adapter: request building, vocabulary mapping and
//! aggregation of the 3-hour forecast feed into daily summaries.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::clock::{forecast_anchor, Clock};
use crate::constants::{COUNTRY_CODE, FORECAST_DAYS, USER_AGENT};
use crate::error::WeatherError;
use crate::models::{
    day_name, CurrentResponse, CurrentWeather, ForecastDay, ForecastResponse, ForecastSample,
    ProviderWeather, WeatherCondition, WeatherData, WindDirection,
};
use crate::weather::WeatherSource;

/// HTTP GET with query parameters, returning the decoded JSON body
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, WeatherError>;
}

/// reqwest-backed transport adding the credential and metric units to every call
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Arc<Client>,
    base_url: String,
    api_key: String,
}

impl ReqwestTransport {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, WeatherError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client: Arc::new(client),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, WeatherError> {
        let url = format!("{}{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str()), ("units", "metric")])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(WeatherError::network(format!(
                "Request failed with status: {}",
                response.status()
            )));
        }

        let data = response.json::<serde_json::Value>().await?;
        Ok(data)
    }
}

/// Remote provider adapter
pub struct RemoteWeatherAdapter {
    transport: Arc<dyn HttpTransport>,
    clock: Arc<dyn Clock>,
}

impl RemoteWeatherAdapter {
    pub fn new(transport: Arc<dyn HttpTransport>, clock: Arc<dyn Clock>) -> Self {
        Self { transport, clock }
    }

    async fn request<T: DeserializeOwned>(
        &self,
        path: &str,
        location: &str,
    ) -> Result<T, WeatherError> {
        let query = vec![("q", provider_query(location))];
        let body = self.transport.get_json(path, &query).await?;
        Ok(serde_json::from_value(body)?)
    }

    pub async fn fetch_current(&self, location: &str) -> Result<CurrentWeather, WeatherError> {
        let data: CurrentResponse = self.request("/weather", location).await?;
        let now = self.clock.now();
        let weather = first_weather(&data.weather)?;

        let now_secs = now.timestamp();
        let is_night = data.sys.sunset < now_secs || data.sys.sunrise > now_secs;
        let condition =
            WeatherCondition::from_provider(&weather.main, &weather.description, is_night);

        Ok(CurrentWeather {
            temperature: data.main.temp.round() as i32,
            feels_like: data.main.feels_like.round() as i32,
            humidity: percent(data.main.humidity),
            wind_speed: (data.wind.speed * 3.6).round().max(0.0) as u32,
            wind_direction: WindDirection::from_degrees(data.wind.deg),
            condition,
            description: weather.description.clone(),
            city: data.name,
            country_code: data.sys.country.unwrap_or_else(|| COUNTRY_CODE.to_string()),
            icon: weather.icon.clone(),
            timestamp: now.timestamp_millis(),
        })
    }

    pub async fn fetch_forecast(&self, location: &str) -> Result<Vec<ForecastDay>, WeatherError> {
        let data: ForecastResponse = self.request("/forecast", location).await?;
        let today = forecast_anchor(self.clock.now());
        aggregate_forecast(&data.list, today)
    }
}

#[async_trait]
impl WeatherSource for RemoteWeatherAdapter {
    fn name(&self) -> &'static str {
        "openweathermap"
    }

    /// Current conditions and forecast are requested concurrently; the first
    /// failure fails the whole fetch.
    async fn fetch(&self, location: &str) -> Result<WeatherData, WeatherError> {
        let (current, forecast) =
            tokio::try_join!(self.fetch_current(location), self.fetch_forecast(location))?;
        Ok(WeatherData { current, forecast })
    }
}

/// `"<segment before comma>,TH"`
fn provider_query(location: &str) -> String {
    let city = location.split(',').next().unwrap_or(location).trim();
    format!("{city},{COUNTRY_CODE}")
}

fn first_weather(weather: &[ProviderWeather]) -> Result<&ProviderWeather, WeatherError> {
    weather
        .first()
        .ok_or_else(|| WeatherError::network("provider response has no weather entry"))
}

fn percent(value: f64) -> u8 {
    value.round().clamp(0.0, 100.0) as u8
}

fn sample_date(sample: &ForecastSample) -> Result<NaiveDate, WeatherError> {
    let date = sample.dt_txt.split(' ').next().unwrap_or_default();
    NaiveDate::parse_from_str(date, "%Y-%m-%d").map_err(|e| {
        WeatherError::network(format!("invalid forecast timestamp '{}': {e}", sample.dt_txt))
    })
}

/// Collapse 3-hour samples into the first five dates after `today`.
pub fn aggregate_forecast(
    samples: &[ForecastSample],
    today: NaiveDate,
) -> Result<Vec<ForecastDay>, WeatherError> {
    let mut by_date: BTreeMap<NaiveDate, Vec<&ForecastSample>> = BTreeMap::new();
    for sample in samples {
        let date = sample_date(sample)?;
        if date > today {
            by_date.entry(date).or_default().push(sample);
        }
    }

    if by_date.len() < FORECAST_DAYS {
        return Err(WeatherError::network(format!(
            "forecast feed covers {} days after {today}, expected {FORECAST_DAYS}",
            by_date.len()
        )));
    }

    let days = by_date
        .into_iter()
        .take(FORECAST_DAYS)
        .map(|(date, items)| summarize_day(date, &items))
        .collect::<Result<Vec<_>, _>>()?;

    debug!("Aggregated {} forecast samples into {} days", samples.len(), days.len());
    Ok(days)
}

fn summarize_day(date: NaiveDate, items: &[&ForecastSample]) -> Result<ForecastDay, WeatherError> {
    let temp_max = items
        .iter()
        .map(|item| item.main.temp)
        .fold(f64::NEG_INFINITY, f64::max);
    let temp_min = items
        .iter()
        .map(|item| item.main.temp)
        .fold(f64::INFINITY, f64::min);

    let midday = items
        .iter()
        .find(|item| item.dt_txt.contains("12:00"))
        .unwrap_or(&items[0]);
    let weather = first_weather(&midday.weather)?;
    let condition = WeatherCondition::from_provider(&weather.main, &weather.description, false);

    let count = items.len() as f64;
    let pop_mean = items.iter().map(|item| item.pop.unwrap_or(0.0)).sum::<f64>() / count;
    let humidity_mean = items.iter().map(|item| item.main.humidity).sum::<f64>() / count;

    Ok(ForecastDay {
        date,
        day_of_week: day_name(date),
        temp_max: temp_max.round() as i32,
        temp_min: temp_min.round() as i32,
        condition,
        description: weather.description.clone(),
        icon: weather.icon.clone(),
        precipitation: percent(pop_mean * 100.0),
        humidity: percent(humidity_mean),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{DateTime, Days};
    use serde_json::json;
    use tokio::sync::Mutex;

    fn sample(dt_txt: &str, temp: f64, pop: f64, humidity: f64, main: &str) -> ForecastSample {
        serde_json::from_value(json!({
            "dt_txt": dt_txt,
            "main": { "temp": temp, "humidity": humidity },
            "pop": pop,
            "weather": [{ "main": main, "description": "some weather", "icon": "04d" }]
        }))
        .unwrap()
    }

    fn feed_for(start: NaiveDate, days: u64) -> Vec<ForecastSample> {
        let mut list = Vec::new();
        for offset in 0..days {
            let date = start.checked_add_days(Days::new(offset)).unwrap();
            for hour in ["00:00:00", "12:00:00", "21:00:00"] {
                list.push(sample(&format!("{date} {hour}"), 30.0, 0.2, 70.0, "Clouds"));
            }
        }
        list
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_aggregation_of_one_day() {
        let mut list = feed_for(date("2026-10-16"), 4);
        list.insert(0, sample("2026-10-15 09:00:00", 30.0, 0.1, 70.0, "Rain"));
        list.insert(1, sample("2026-10-15 12:00:00", 32.0, 0.5, 75.0, "Clear"));
        list.insert(2, sample("2026-10-15 15:00:00", 29.0, 0.2, 66.0, "Rain"));

        let days = aggregate_forecast(&list, date("2026-10-14")).unwrap();
        let first = &days[0];
        assert_eq!(first.date, date("2026-10-15"));
        assert_eq!(first.day_of_week, "Thursday");
        assert_eq!(first.temp_max, 32);
        assert_eq!(first.temp_min, 29);
        assert_eq!(first.precipitation, 27);
        assert_eq!(first.humidity, 70);
        assert_eq!(first.condition, WeatherCondition::ClearDay);
    }

    #[test]
    fn test_first_sample_used_without_noon() {
        let mut list = feed_for(date("2026-10-16"), 4);
        list.insert(0, sample("2026-10-15 18:00:00", 28.0, 0.0, 80.0, "Thunderstorm"));
        list.insert(1, sample("2026-10-15 21:00:00", 27.0, 0.0, 80.0, "Clear"));

        let days = aggregate_forecast(&list, date("2026-10-14")).unwrap();
        assert_eq!(days[0].condition, WeatherCondition::Thunderstorm);
    }

    #[test]
    fn test_today_is_skipped_and_five_days_kept() {
        let list = feed_for(date("2026-10-14"), 7);
        let days = aggregate_forecast(&list, date("2026-10-14")).unwrap();
        assert_eq!(days.len(), 5);
        assert_eq!(days[0].date, date("2026-10-15"));
        assert_eq!(days[4].date, date("2026-10-19"));
        for pair in days.windows(2) {
            assert_eq!(pair[0].date.succ_opt().unwrap(), pair[1].date);
        }
    }

    #[test]
    fn test_short_feed_is_an_error() {
        let list = feed_for(date("2026-10-14"), 5);
        let err = aggregate_forecast(&list, date("2026-10-14")).unwrap_err();
        assert!(matches!(err, WeatherError::Network { .. }));
    }

    #[test]
    fn test_bad_timestamp_is_an_error() {
        let list = vec![sample("tomorrow noon", 30.0, 0.0, 50.0, "Clear")];
        assert!(aggregate_forecast(&list, date("2026-10-14")).is_err());
    }

    #[test]
    fn test_provider_query_uses_segment_before_comma() {
        assert_eq!(provider_query("Pak Kret, Nonthaburi"), "Pak Kret,TH");
        assert_eq!(provider_query("Bangkok"), "Bangkok,TH");
    }

    /// Serves canned bodies per path and records queries
    struct StubTransport {
        current: serde_json::Value,
        forecast: serde_json::Value,
        queries: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl HttpTransport for StubTransport {
        async fn get_json(
            &self,
            path: &str,
            query: &[(&str, String)],
        ) -> Result<serde_json::Value, WeatherError> {
            self.queries.lock().await.push(query[0].1.clone());
            match path {
                "/weather" => Ok(self.current.clone()),
                "/forecast" => Ok(self.forecast.clone()),
                _ => Err(WeatherError::network("404 Not Found")),
            }
        }
    }

    fn current_body(sunrise: i64, sunset: i64) -> serde_json::Value {
        json!({
            "weather": [{ "main": "Clouds", "description": "scattered clouds", "icon": "03n" }],
            "main": { "temp": 29.6, "feels_like": 34.4, "humidity": 79 },
            "wind": { "speed": 2.5, "deg": 200 },
            "sys": { "sunrise": sunrise, "sunset": sunset, "country": "TH" },
            "name": "Bang Rak"
        })
    }

    fn forecast_body(start: NaiveDate) -> serde_json::Value {
        let mut list = Vec::new();
        for offset in 0..6 {
            let date = start.checked_add_days(Days::new(offset)).unwrap();
            list.push(json!({
                "dt_txt": format!("{date} 12:00:00"),
                "main": { "temp": 31.0, "humidity": 70 },
                "pop": 0.4,
                "weather": [{ "main": "Rain", "description": "light rain", "icon": "10d" }]
            }));
        }
        json!({ "list": list })
    }

    #[tokio::test]
    async fn test_fetch_maps_current_and_forecast() {
        // 2026-10-14 20:00 +07:00, after sunset
        let now = DateTime::parse_from_rfc3339("2026-10-14T20:00:00+07:00").unwrap();
        let sunrise = now.timestamp() - 14 * 3600;
        let sunset = now.timestamp() - 2 * 3600;
        let transport = Arc::new(StubTransport {
            current: current_body(sunrise, sunset),
            forecast: forecast_body(date("2026-10-14")),
            queries: Mutex::new(Vec::new()),
        });
        let adapter = RemoteWeatherAdapter::new(transport.clone(), Arc::new(FixedClock(now)));

        let data = adapter.fetch("Bang Rak, Bangkok").await.unwrap();
        assert_eq!(data.current.temperature, 30);
        assert_eq!(data.current.feels_like, 34);
        assert_eq!(data.current.humidity, 79);
        assert_eq!(data.current.wind_speed, 9);
        assert_eq!(data.current.wind_direction, WindDirection::S);
        assert_eq!(data.current.condition, WeatherCondition::PartlyCloudyNight);
        assert_eq!(data.current.city, "Bang Rak");
        assert_eq!(data.current.timestamp, now.timestamp_millis());

        assert_eq!(data.forecast.len(), 5);
        assert_eq!(data.forecast[0].date, date("2026-10-15"));
        assert_eq!(data.forecast[0].precipitation, 40);
        assert_eq!(data.forecast[0].condition, WeatherCondition::Rain);

        let queries = transport.queries.lock().await;
        assert_eq!(queries.len(), 2);
        assert!(queries.iter().all(|q| q == "Bang Rak,TH"));
    }

    #[tokio::test]
    async fn test_fetch_fails_when_forecast_is_malformed() {
        let now = DateTime::parse_from_rfc3339("2026-10-14T10:00:00+07:00").unwrap();
        let transport = Arc::new(StubTransport {
            current: current_body(now.timestamp() - 3600, now.timestamp() + 3600),
            forecast: json!({ "cod": "404" }),
            queries: Mutex::new(Vec::new()),
        });
        let adapter = RemoteWeatherAdapter::new(transport, Arc::new(FixedClock(now)));

        let err = adapter.fetch("Sathon").await.unwrap_err();
        assert!(matches!(err, WeatherError::Network { .. }));
    }
}
