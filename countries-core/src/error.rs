use reqwest::StatusCode;
use thiserror::Error;

/// Message shown when the countries API has no match for the query.
pub const NO_RESULTS_MESSAGE: &str = "No results";

/// Message shown for every other search failure.
pub const GENERIC_ERROR_MESSAGE: &str = "There was an error, please try again later!";

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("no countries matched the query")]
    NoResults,

    #[error("invalid countries URL: {0}")]
    InvalidUrl(String),

    #[error("countries request failed with status {0}")]
    Status(StatusCode),

    #[error("failed to reach the countries API")]
    Transport(#[from] reqwest::Error),

    #[error("failed to parse countries JSON")]
    Decode(#[from] serde_json::Error),
}

impl SearchError {
    /// Text for the result message line.
    pub fn user_message(&self) -> &'static str {
        match self {
            SearchError::NoResults => NO_RESULTS_MESSAGE,
            _ => GENERIC_ERROR_MESSAGE,
        }
    }

    pub fn is_no_results(&self) -> bool {
        matches!(self, SearchError::NoResults)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_results_message() {
        assert_eq!(SearchError::NoResults.user_message(), "No results");
        assert!(SearchError::NoResults.is_no_results());
    }

    #[test]
    fn other_failures_share_generic_message() {
        let status = SearchError::Status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(status.user_message(), GENERIC_ERROR_MESSAGE);
        assert!(!status.is_no_results());

        let decode = SearchError::from(serde_json::from_str::<u8>("nope").unwrap_err());
        assert_eq!(decode.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
