use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ============================================================================
// Weather Domain Models
// ============================================================================

/// Canonical condition vocabulary; every provider code maps into it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum WeatherCondition {
    ClearDay,
    ClearNight,
    PartlyCloudyDay,
    PartlyCloudyNight,
    Cloudy,
    Rain,
    Thunderstorm,
    Snow,
    Mist,
}

impl WeatherCondition {
    pub fn clear(is_night: bool) -> Self {
        if is_night {
            Self::ClearNight
        } else {
            Self::ClearDay
        }
    }

    pub fn partly_cloudy(is_night: bool) -> Self {
        if is_night {
            Self::PartlyCloudyNight
        } else {
            Self::PartlyCloudyDay
        }
    }

    /// Map an OpenWeatherMap `weather[0].main` category
    pub fn from_provider(main: &str, description: &str, is_night: bool) -> Self {
        match main.to_lowercase().as_str() {
            "clear" => Self::clear(is_night),
            "clouds" => {
                if description.contains("few") || description.contains("scattered") {
                    Self::partly_cloudy(is_night)
                } else {
                    Self::Cloudy
                }
            }
            "rain" | "drizzle" => Self::Rain,
            "thunderstorm" => Self::Thunderstorm,
            "snow" => Self::Snow,
            "mist" | "smoke" | "haze" | "dust" | "fog" => Self::Mist,
            _ => Self::clear(is_night),
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::ClearDay => "Sunny",
            Self::ClearNight => "Clear Night",
            Self::PartlyCloudyDay | Self::PartlyCloudyNight => "Partly Cloudy",
            Self::Cloudy => "Cloudy",
            Self::Rain => "Rainy",
            Self::Thunderstorm => "Thunderstorm",
            Self::Snow => "Snow",
            Self::Mist => "Mist",
        }
    }

    /// OpenWeatherMap icon code
    pub fn icon(&self) -> &'static str {
        match self {
            Self::ClearDay => "01d",
            Self::ClearNight => "01n",
            Self::PartlyCloudyDay => "02d",
            Self::PartlyCloudyNight => "02n",
            Self::Cloudy => "03d",
            Self::Rain => "10d",
            Self::Thunderstorm => "11d",
            Self::Snow => "13d",
            Self::Mist => "50d",
        }
    }
}

/// Eight-point compass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl WindDirection {
    const POINTS: [WindDirection; 8] = [
        Self::N,
        Self::NE,
        Self::E,
        Self::SE,
        Self::S,
        Self::SW,
        Self::W,
        Self::NW,
    ];

    /// `round(degrees / 45) mod 8`
    pub fn from_degrees(degrees: f64) -> Self {
        let index = (degrees / 45.0).round().rem_euclid(8.0) as usize;
        Self::POINTS[index % 8]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "N",
            Self::NE => "NE",
            Self::E => "E",
            Self::SE => "SE",
            Self::S => "S",
            Self::SW => "SW",
            Self::W => "W",
            Self::NW => "NW",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentWeather {
    /// Degrees Celsius, rounded
    pub temperature: i32,
    pub feels_like: i32,
    /// Percent
    pub humidity: u8,
    /// km/h
    pub wind_speed: u32,
    pub wind_direction: WindDirection,
    pub condition: WeatherCondition,
    pub description: String,
    pub city: String,
    pub country_code: String,
    pub icon: String,
    /// Epoch milliseconds of acquisition
    pub timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastDay {
    pub date: NaiveDate,
    pub day_of_week: String,
    pub temp_max: i32,
    pub temp_min: i32,
    pub condition: WeatherCondition,
    pub description: String,
    pub icon: String,
    /// Probability of precipitation, percent
    pub precipitation: u8,
    pub humidity: u8,
}

/// Current conditions plus one entry per upcoming day
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherData {
    pub current: CurrentWeather,
    pub forecast: Vec<ForecastDay>,
}

/// English weekday name, e.g. `Monday`
pub fn day_name(date: NaiveDate) -> String {
    date.format("%A").to_string()
}

// ============================================================================
// OpenWeatherMap API Models
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ProviderWeather {
    pub main: String,
    pub description: String,
    pub icon: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentMain {
    pub temp: f64,
    pub feels_like: f64,
    pub humidity: f64,
}

#[derive(Debug, Deserialize)]
pub struct Wind {
    pub speed: f64,
    #[serde(default)]
    pub deg: f64,
}

#[derive(Debug, Deserialize)]
pub struct Sys {
    pub sunrise: i64,
    pub sunset: i64,
    #[serde(default)]
    pub country: Option<String>,
}

/// `GET /weather`
#[derive(Debug, Deserialize)]
pub struct CurrentResponse {
    pub weather: Vec<ProviderWeather>,
    pub main: CurrentMain,
    pub wind: Wind,
    pub sys: Sys,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct SampleMain {
    pub temp: f64,
    pub humidity: f64,
}

/// One 3-hour sample of the forecast feed
#[derive(Debug, Deserialize)]
pub struct ForecastSample {
    pub dt_txt: String,
    pub main: SampleMain,
    #[serde(default)]
    pub pop: Option<f64>,
    pub weather: Vec<ProviderWeather>,
}

/// `GET /forecast`
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub list: Vec<ForecastSample>,
}

// ============================================================================
// MCP Tool Request Models
// ============================================================================

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct GetWeatherRequest {
    /// District or province, e.g. "Bang Rak" or "Pak Kret, Nonthaburi"
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, JsonSchema)]
pub struct SearchLocationsRequest {
    /// Partial name; omit or leave empty to list every location
    #[serde(default)]
    pub query: Option<String>,
}
