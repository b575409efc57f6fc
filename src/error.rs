use thiserror::Error;

#[derive(Error, Debug)]
pub enum BotError {
    // Configuration errors
    #[error("{name} environment variable is required")]
    MissingEnv { name: &'static str },

    #[error("Invalid value for {name}: {message}")]
    InvalidEnv { name: &'static str, message: String },

    // Discord errors
    #[error("Discord API error: {message}")]
    Discord { message: String },
}

impl From<serenity::Error> for BotError {
    fn from(err: serenity::Error) -> Self {
        BotError::Discord {
            message: err.to_string(),
        }
    }
}

/// Failure of a single Yume API call.
#[derive(Error, Debug)]
pub enum ApiError {
    /// The API answered with a non-success status. `message` is the API's own
    /// `error` field when it sent one, the status text otherwise.
    #[error("{message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("Request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

impl ApiError {
    /// The message the API itself reported, if the request got that far.
    pub fn api_message(&self) -> Option<&str> {
        match self {
            ApiError::Status { message, .. } => Some(message),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, BotError>;
