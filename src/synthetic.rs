//! Synthetic weather for when no remote provider is usable

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{Days, Timelike};
use tokio::sync::Mutex;
use tracing::debug;

use crate::clock::{forecast_anchor, Clock, RandomSource};
use crate::constants::{COUNTRY_CODE, FORECAST_DAYS};
use crate::error::WeatherError;
use crate::locations::LocationIndex;
use crate::models::{
    day_name, CurrentWeather, ForecastDay, WeatherCondition, WeatherData, WindDirection,
};
use crate::weather::WeatherSource;

const BASE_TEMP: f64 = 28.0;
const FEELS_LIKE_OFFSET: i32 = 2;
const BASE_HUMIDITY: f64 = 60.0;
const BASE_WIND_SPEED: f64 = 5.0;

const FORECAST_CONDITIONS: [WeatherCondition; 4] = [
    WeatherCondition::ClearDay,
    WeatherCondition::PartlyCloudyDay,
    WeatherCondition::Cloudy,
    WeatherCondition::Rain,
];

/// Plausible tropical weather drawn from an injected random source
pub struct SyntheticWeatherGenerator {
    index: &'static LocationIndex,
    clock: Arc<dyn Clock>,
    rng: Mutex<Box<dyn RandomSource>>,
    latency: Duration,
}

impl SyntheticWeatherGenerator {
    pub fn new(
        index: &'static LocationIndex,
        clock: Arc<dyn Clock>,
        rng: Box<dyn RandomSource>,
        latency: Duration,
    ) -> Self {
        Self {
            index,
            clock,
            rng: Mutex::new(rng),
            latency,
        }
    }

    /// Fails only when `location` does not resolve.
    pub async fn generate(&self, location: &str) -> Result<WeatherData, WeatherError> {
        let city = self.index.resolve(location)?.label();

        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let now = self.clock.now();
        let hour = now.hour();
        let is_night = hour >= 18 || hour < 6;

        let mut rng = self.rng.lock().await;
        let rng = rng.as_mut();

        let condition = if rng.next_f64() > 0.7 {
            WeatherCondition::Rain
        } else {
            WeatherCondition::clear(is_night)
        };
        let temperature = (BASE_TEMP + spread(rng, 4.0)).round() as i32;
        let feels_like = if rng.next_f64() > 0.5 {
            temperature + FEELS_LIKE_OFFSET
        } else {
            temperature - FEELS_LIKE_OFFSET
        };
        let humidity = (BASE_HUMIDITY + spread(rng, 15.0)).round().clamp(0.0, 100.0) as u8;
        let wind_speed = (BASE_WIND_SPEED + rng.next_f64() * 10.0).round() as u32;
        let wind_direction = WindDirection::from_degrees(rng.next_f64() * 360.0);

        let current = CurrentWeather {
            temperature,
            feels_like,
            humidity,
            wind_speed,
            wind_direction,
            condition,
            description: condition.description().to_string(),
            city,
            country_code: COUNTRY_CODE.to_string(),
            icon: condition.icon().to_string(),
            timestamp: now.timestamp_millis(),
        };

        let today = forecast_anchor(now);
        let mut forecast = Vec::with_capacity(FORECAST_DAYS);
        for offset in 1..=FORECAST_DAYS as u64 {
            let date = today.checked_add_days(Days::new(offset)).ok_or_else(|| {
                WeatherError::generation(format!("date overflow after {today}"))
            })?;

            let pick = (rng.next_f64() * FORECAST_CONDITIONS.len() as f64) as usize;
            let condition = FORECAST_CONDITIONS[pick.min(FORECAST_CONDITIONS.len() - 1)];
            // ranges 27..=33 and 22..=26 never cross, so max >= min
            let temp_max = (30.0 + spread(rng, 3.0)).round() as i32;
            let temp_min = (24.0 + spread(rng, 2.0)).round() as i32;
            let precipitation = if condition == WeatherCondition::Rain {
                70.0 + rng.next_f64() * 25.0
            } else {
                rng.next_f64() * 30.0
            };
            let humidity = (BASE_HUMIDITY + spread(rng, 10.0)).round() as u8;

            forecast.push(ForecastDay {
                date,
                day_of_week: day_name(date),
                temp_max,
                temp_min,
                condition,
                description: condition.description().to_string(),
                icon: condition.icon().to_string(),
                precipitation: precipitation.round() as u8,
                humidity,
            });
        }

        debug!("Generated synthetic weather for {}", current.city);
        Ok(WeatherData { current, forecast })
    }
}

/// Uniform draw in `[-half_width, +half_width)`
fn spread(rng: &mut dyn RandomSource, half_width: f64) -> f64 {
    rng.next_f64() * half_width * 2.0 - half_width
}

#[async_trait]
impl WeatherSource for SyntheticWeatherGenerator {
    fn name(&self) -> &'static str {
        "synthetic"
    }

    async fn fetch(&self, location: &str) -> Result<WeatherData, WeatherError> {
        self.generate(location).await
    }
}
