//! Remote CSV sources for the demo dataset.

use crate::data::DataError;
use std::time::Duration;
use tracing::debug;

/// Seaborn's canonical restaurant-tipping dataset.
pub const DEFAULT_TIPS_URL: &str =
    "https://raw.githubusercontent.com/mwaskom/seaborn-data/master/tips.csv";

/// A fixed remote resource serving CSV bytes.
pub trait CsvSource: Send + Sync {
    /// Where the bytes come from, for messages.
    fn location(&self) -> &str;

    /// Fetch the raw CSV bytes.
    fn fetch(&self) -> Result<Vec<u8>, DataError>;
}

/// CSV over HTTPS via a blocking reqwest client.
pub struct HttpCsvSource {
    client: reqwest::blocking::Client,
    url: String,
}

impl HttpCsvSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DataError::ClientBuild(e.to_string()))?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }
}

impl CsvSource for HttpCsvSource {
    fn location(&self) -> &str {
        &self.url
    }

    fn fetch(&self) -> Result<Vec<u8>, DataError> {
        debug!(url = %self.url, "fetching remote CSV");

        let resp = self
            .client
            .get(&self.url)
            .send()
            .map_err(|e| DataError::from_transport(&e))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(DataError::HttpStatus {
                status: status.as_u16(),
                url: self.url.clone(),
            });
        }

        let body = resp.bytes().map_err(|e| DataError::from_transport(&e))?;
        Ok(body.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_source_reports_its_url() {
        let source = HttpCsvSource::new(DEFAULT_TIPS_URL, Duration::from_secs(5)).unwrap();
        assert_eq!(source.location(), DEFAULT_TIPS_URL);
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Port 9 on localhost is the discard service and is closed on test hosts.
        let source = HttpCsvSource::new("http://127.0.0.1:9/tips.csv", Duration::from_secs(2))
            .unwrap();
        let err = source.fetch().unwrap_err();
        assert!(matches!(
            err,
            DataError::NetworkUnreachable(_) | DataError::Timeout(_) | DataError::Other(_)
        ));
    }
}
