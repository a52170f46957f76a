use greenmate_core::ErrorKind;

/// Care engine errors
#[derive(Debug, thiserror::Error)]
pub enum CareError {
    #[error("Location required: provide lat and lon, or a city")]
    LocationRequired,

    #[error("Failed to fetch weather data: {0}")]
    WeatherFetchFailed(String),
}

impl CareError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CareError::LocationRequired => ErrorKind::LocationRequired,
            CareError::WeatherFetchFailed(_) => ErrorKind::WeatherFetchFailed,
        }
    }
}

/// The request URL carries the API key, so it is stripped before the error
/// reaches logs or responses.
impl From<reqwest::Error> for CareError {
    fn from(err: reqwest::Error) -> Self {
        CareError::WeatherFetchFailed(err.without_url().to_string())
    }
}
