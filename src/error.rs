//! Error types and handling for the drone weather checker

use thiserror::Error;

/// Main error type for the drone weather checker
#[derive(Error, Debug)]
pub enum DroneWeatherError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// A feed could not be reached or answered with an error status
    #[error("{feed} feed error: {message}")]
    Fetch { feed: String, message: String },

    /// A feed did not answer within its time budget
    #[error("{feed} feed timed out after {seconds}s")]
    Timeout { feed: String, seconds: u64 },

    /// A feed answered with a payload we could not decode
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// Report delivery errors
    #[error("Notification error: {message}")]
    Notification { message: String },
}

impl DroneWeatherError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new fetch error for the named feed
    pub fn fetch<F: Into<String>, S: Into<String>>(feed: F, message: S) -> Self {
        Self::Fetch {
            feed: feed.into(),
            message: message.into(),
        }
    }

    /// Create a new timeout error for the named feed
    pub fn timeout<F: Into<String>>(feed: F, seconds: u64) -> Self {
        Self::Timeout {
            feed: feed.into(),
            seconds,
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Create a new notification error
    pub fn notification<S: Into<String>>(message: S) -> Self {
        Self::Notification {
            message: message.into(),
        }
    }

    /// Transient failures are the ones a later run may not hit again.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Fetch { .. } | Self::Timeout { .. })
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            DroneWeatherError::Config { message } => {
                format!("Configuration error: {message}. Please check your config file.")
            }
            DroneWeatherError::Fetch { feed, .. } | DroneWeatherError::Timeout { feed, .. } => {
                format!(
                    "Unable to reach the {feed} service. Please check your internet connection."
                )
            }
            DroneWeatherError::Parse { .. } => {
                "An upstream service returned data in an unexpected format.".to_string()
            }
            DroneWeatherError::Notification { .. } => {
                "The report could not be delivered. Please check your email settings.".to_string()
            }
        }
    }
}
