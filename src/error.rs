//! Error taxonomy shared by every weather component

use serde::Serialize;
use thiserror::Error;

/// Stable error codes exposed to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    LocationNotFound,
    NetworkError,
    #[serde(rename = "DEMO_ERROR")]
    GenerationError,
}

impl ErrorKind {
    /// Wire code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            Self::LocationNotFound => "LOCATION_NOT_FOUND",
            Self::NetworkError => "NETWORK_ERROR",
            Self::GenerationError => "DEMO_ERROR",
        }
    }

    /// Fixed user-facing message for this kind
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::LocationNotFound => "The location you entered could not be found",
            Self::NetworkError => "Unable to connect to weather service",
            Self::GenerationError => "Weather simulation error occurred",
        }
    }
}

/// Main error type for weather acquisition
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WeatherError {
    /// The text does not name a known region or district
    #[error("Location not found: {message}")]
    LocationNotFound { message: String },

    /// Transport failure or unusable provider response
    #[error("Network error: {message}")]
    Network { message: String },

    /// Failure inside the synthetic generator
    #[error("Generation error: {message}")]
    Generation { message: String },
}

impl WeatherError {
    pub fn location_not_found<S: Into<String>>(message: S) -> Self {
        Self::LocationNotFound {
            message: message.into(),
        }
    }

    pub fn network<S: Into<String>>(message: S) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    pub fn generation<S: Into<String>>(message: S) -> Self {
        Self::Generation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::LocationNotFound { .. } => ErrorKind::LocationNotFound,
            Self::Network { .. } => ErrorKind::NetworkError,
            Self::Generation { .. } => ErrorKind::GenerationError,
        }
    }

    /// Detail message recorded at the point of failure
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::LocationNotFound { message }
            | Self::Network { message }
            | Self::Generation { message } => message,
        }
    }

    #[must_use]
    pub fn user_message(&self) -> &'static str {
        self.kind().user_message()
    }

    /// Same kind, message replaced by the fixed user-facing text
    #[must_use]
    pub fn retyped(&self) -> Self {
        let message = self.user_message();
        match self.kind() {
            ErrorKind::LocationNotFound => Self::location_not_found(message),
            ErrorKind::NetworkError => Self::network(message),
            ErrorKind::GenerationError => Self::generation(message),
        }
    }
}

impl From<reqwest::Error> for WeatherError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::network(format!("request timed out: {err}"))
        } else {
            Self::network(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WeatherError {
    fn from(err: serde_json::Error) -> Self {
        Self::network(format!("malformed provider response: {err}"))
    }
}
