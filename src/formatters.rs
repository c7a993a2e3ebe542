use crate::models::WeatherData;

/// Formats a weather report into a human-readable string
pub fn format_weather(data: &WeatherData) -> String {
    let current = &data.current;
    let mut output = format!(
        "Current Weather for {} ({}):\n  Conditions: {}\n  Temperature: {}\u{00b0}C (feels like {}\u{00b0}C)\n  Humidity: {}%\n  Wind: {} km/h {}\n\n",
        current.city,
        current.country_code,
        current.description,
        current.temperature,
        current.feels_like,
        current.humidity,
        current.wind_speed,
        current.wind_direction.as_str(),
    );

    output.push_str(&format!("{}-Day Forecast:\n\n", data.forecast.len()));
    for day in &data.forecast {
        output.push_str(&format!(
            "{} ({}):\n  Temperature: {}\u{00b0}C - {}\u{00b0}C\n  Conditions: {}\n  Chance of rain: {}%\n  Humidity: {}%\n\n",
            day.day_of_week,
            day.date,
            day.temp_min,
            day.temp_max,
            day.description,
            day.precipitation,
            day.humidity,
        ));
    }
    output
}

/// Formats location suggestions, one per line
pub fn format_locations(locations: &[String]) -> String {
    if locations.is_empty() {
        return "No matching locations.".to_string();
    }

    let mut output = format!("{} matching locations:\n", locations.len());
    for location in locations {
        output.push_str(&format!("  {}\n", location));
    }
    output
}
