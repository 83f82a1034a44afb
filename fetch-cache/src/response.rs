use std::sync::Arc;

use serde::de::DeserializeOwned;
use surf::StatusCode;

use crate::error::FetchError;

/// Fully-buffered response shared by every caller attached to one outcome.
///
/// The transport reads the whole body before the outcome settles, so any
/// number of cache readers can consume the same response independently.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    status: StatusCode,
    headers: Vec<(String, String)>,
    body: Arc<Vec<u8>>,
}

impl FetchResponse {
    pub fn new(status: StatusCode, headers: Vec<(String, String)>, body: Vec<u8>) -> Self {
        Self {
            status,
            headers,
            body: Arc::new(body),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// True for 2xx statuses. Entries that settle with `ok() == false` are
    /// dropped from the cache immediately.
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Response headers in the order the transport reported them.
    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    /// First value of a header, matched case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(header, _)| header.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn body_bytes(&self) -> &[u8] {
        &self.body
    }

    /// Decodes the body as JSON.
    pub fn body_json<T: DeserializeOwned>(&self) -> Result<T, FetchError> {
        serde_json::from_slice(&self.body).map_err(FetchError::invalid_body)
    }

    /// Body as UTF-8 text.
    pub fn body_text(&self) -> Result<String, FetchError> {
        std::str::from_utf8(&self.body)
            .map(str::to_owned)
            .map_err(FetchError::invalid_body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn header_lookup_is_case_insensitive() {
        let response = FetchResponse::new(
            StatusCode::Ok,
            vec![("Content-Type".to_string(), "application/json".to_string())],
            Vec::new(),
        );
        assert_eq!(response.header("content-type"), Some("application/json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn body_json_decodes_buffered_bytes() {
        let response = FetchResponse::new(
            StatusCode::Ok,
            Vec::new(),
            serde_json::to_vec(&json!({"answer": 42})).unwrap(),
        );
        let value: serde_json::Value = response.body_json().unwrap();
        assert_eq!(value["answer"], 42);
    }

    #[test]
    fn ok_follows_status_class() {
        let ok = FetchResponse::new(StatusCode::Created, Vec::new(), Vec::new());
        let not_ok = FetchResponse::new(StatusCode::BadGateway, Vec::new(), Vec::new());
        assert!(ok.ok());
        assert!(!not_ok.ok());
    }
}
