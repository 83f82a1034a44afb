mod convert;
mod error;
mod metric;
mod models;
mod rating;

pub use convert::{
    to_boolean, to_date, to_float, to_integer, to_percent, to_rating, Converted, DateValue, Fixed,
    Percent, YesNo,
};
pub use error::SonarError;
pub use metric::{domain_metric, MetricType};
pub use models::{
    AnalysisPeriod, Condition, Measure, MeasurePeriod, MeasuresResponse, MetricDefinition,
    MetricDefinitionsResponse, PullRequest, PullRequestStatus, PullRequestsResponse,
    QualityGateResponse, QualityGateStatus,
};
pub use rating::{ParseRatingError, Rating};

use fetch_cache::{FetchOptions, Method, SharedFetchClient, StatusCode};
use getset::Getters;
use lazy_static::lazy_static;
use regex::Regex;
use serde::de::DeserializeOwned;
use surf::http::auth::BasicAuth;

lazy_static! {
    // Sonar's key grammar: letters, digits, '-', '_', '.' and ':', with at
    // least one non-digit character.
    static ref PROJECT_KEY: Regex =
        Regex::new(r"^[a-zA-Z0-9:_.\-]*[a-zA-Z:_.\-][a-zA-Z0-9:_.\-]*$").unwrap();
}

/// Client for the Sonar quality endpoints.
///
/// Rides on the deduplicating fetch layer, so widgets that refresh the
/// same project at the same time collapse into one upstream call.
#[derive(Clone, Getters)]
pub struct SonarClient {
    fetch: SharedFetchClient,
    #[get = "pub"]
    base_url: String,
    #[get = "pub"]
    project_key: String,
    token: String,
}

impl SonarClient {
    const MEASURES_SEARCH: &'static str = "/api/measures/search";
    const PULL_REQUESTS_LIST: &'static str = "/api/project_pull_requests/list";
    const METRICS_SEARCH: &'static str = "/api/metrics/search";

    pub fn new(
        fetch: SharedFetchClient,
        base_url: impl Into<String>,
        project_key: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, SonarError> {
        let project_key = project_key.into();
        if !PROJECT_KEY.is_match(&project_key) {
            return Err(SonarError::InvalidProjectKey(project_key));
        }
        Ok(Self {
            fetch,
            base_url: base_url.into(),
            project_key,
            token: token.into(),
        })
    }

    /// Current values for `metric_keys` on the configured project.
    pub async fn measures(&self, metric_keys: &[&str]) -> Result<MeasuresResponse, SonarError> {
        let target = format!(
            "{}?metricKeys={}&projectKeys={}",
            self.endpoint(Self::MEASURES_SEARCH),
            metric_keys.join(","),
            self.project_key
        );
        self.get_json(&target).await
    }

    /// Open pull requests of the project with their quality-gate status.
    pub async fn pull_requests(&self) -> Result<PullRequestsResponse, SonarError> {
        let target = format!(
            "{}?project={}",
            self.endpoint(Self::PULL_REQUESTS_LIST),
            self.project_key
        );
        self.get_json(&target).await
    }

    /// Metric definitions, keyed lookups for names, domains and value
    /// types.
    pub async fn metric_definitions(&self) -> Result<MetricDefinitionsResponse, SonarError> {
        let target = self.endpoint(Self::METRICS_SEARCH);
        self.get_json(&target).await
    }

    fn endpoint(&self, path: &str) -> String {
        utils::paths::join_paths([self.base_url.as_str(), path])
    }

    async fn get_json<T: DeserializeOwned>(&self, target: &str) -> Result<T, SonarError> {
        // Sonar authenticates with the token as basic-auth username.
        let auth = BasicAuth::new(self.token.as_str(), "");
        let options = FetchOptions::new()
            .with_method(Method::Get)
            .with_header(auth.name().as_str(), auth.value().as_str());

        let response = self.fetch.fetch(target, &options).await?;
        if response.status() == StatusCode::Unauthorized {
            log::warn!("sonar rejected the access token for {}", self.project_key);
            return Err(SonarError::Unauthorized);
        }
        if !response.ok() {
            return Err(SonarError::Status(response.status().into()));
        }
        response
            .body_json()
            .map_err(|err| SonarError::Decode(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use fetch_cache::cache::{CacheConfig, RequestCache};
    use fetch_cache::{
        FetchClient, FetchError, FetchOptions, FetchResponse, StatusCode, Transport,
    };
    use serde_json::{json, Value};

    use super::*;

    struct StubSonar {
        calls: AtomicUsize,
        targets: Mutex<Vec<String>>,
        auth_headers: Mutex<Vec<Option<String>>>,
        status: StatusCode,
        body: Value,
        delay: Duration,
    }

    impl StubSonar {
        fn new(status: StatusCode, body: Value) -> Arc<Self> {
            Self::slow(status, body, Duration::ZERO)
        }

        fn slow(status: StatusCode, body: Value, delay: Duration) -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                targets: Mutex::new(Vec::new()),
                auth_headers: Mutex::new(Vec::new()),
                status,
                body,
                delay,
            })
        }
    }

    #[async_trait]
    impl Transport for StubSonar {
        async fn send(
            &self,
            target: &str,
            options: &FetchOptions,
        ) -> Result<FetchResponse, FetchError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.targets.lock().unwrap().push(target.to_string());
            let auth = options
                .headers()
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case("authorization"))
                .map(|(_, value)| value.clone());
            self.auth_headers.lock().unwrap().push(auth);
            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }
            Ok(FetchResponse::new(
                self.status,
                Vec::new(),
                serde_json::to_vec(&self.body).unwrap(),
            ))
        }
    }

    fn client_over(stub: Arc<StubSonar>) -> SonarClient {
        let fetch = Arc::new(FetchClient::from_parts(
            stub,
            RequestCache::new(CacheConfig::default()),
        ));
        SonarClient::new(fetch, "https://sonar.example.com/", "platform:frontend", "squ_token")
            .unwrap()
    }

    #[tokio::test]
    async fn measures_builds_the_expected_request() {
        let stub = StubSonar::new(
            StatusCode::Ok,
            json!({"measures": [{"metric": "coverage", "value": "72.5", "component": "k"}]}),
        );
        let client = client_over(Arc::clone(&stub));

        let measures = client.measures(&["coverage", "bugs"]).await.unwrap();
        assert_eq!(measures.metric("coverage").unwrap().effective_value(), "72.5");

        let targets = stub.targets.lock().unwrap();
        assert_eq!(
            targets[0],
            "https://sonar.example.com/api/measures/search?metricKeys=coverage,bugs&projectKeys=platform:frontend"
        );
        let auth = stub.auth_headers.lock().unwrap();
        assert!(auth[0].as_deref().unwrap().starts_with("Basic "));
    }

    #[tokio::test]
    async fn concurrent_widget_reads_share_one_upstream_call() {
        let stub = StubSonar::slow(
            StatusCode::Ok,
            json!({"measures": []}),
            Duration::from_millis(50),
        );
        let client = client_over(Arc::clone(&stub));

        let (a, b) = futures::join!(client.measures(&["bugs"]), client.measures(&["bugs"]));
        a.unwrap();
        b.unwrap();
        assert_eq!(stub.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn pull_requests_decode_gate_status() {
        let stub = StubSonar::new(
            StatusCode::Ok,
            json!({"pullRequests": [
                {"key": "7", "branch": "fix/login", "base": "main",
                 "status": {"qualityGateStatus": "ERROR"}}
            ]}),
        );
        let client = client_over(Arc::clone(&stub));

        let prs = client.pull_requests().await.unwrap();
        assert_eq!(prs.gate_status_for_branch("fix/login"), Some("ERROR"));
        assert_eq!(
            stub.targets.lock().unwrap()[0],
            "https://sonar.example.com/api/project_pull_requests/list?project=platform:frontend"
        );
    }

    #[tokio::test]
    async fn unauthorized_maps_to_its_own_error() {
        let stub = StubSonar::new(StatusCode::Unauthorized, json!({}));
        let client = client_over(stub);

        let err = client.measures(&["bugs"]).await.unwrap_err();
        assert!(matches!(err, SonarError::Unauthorized));
    }

    #[tokio::test]
    async fn other_failures_carry_the_status() {
        let stub = StubSonar::new(StatusCode::ServiceUnavailable, json!({}));
        let client = client_over(stub);

        let err = client.measures(&["bugs"]).await.unwrap_err();
        assert!(matches!(err, SonarError::Status(503)));
    }

    #[tokio::test]
    async fn undecodable_body_maps_to_decode_error() {
        let stub = StubSonar::new(StatusCode::Ok, json!({"measures": "not-a-list"}));
        let client = client_over(stub);

        let err = client.measures(&["bugs"]).await.unwrap_err();
        assert!(matches!(err, SonarError::Decode(_)));
    }

    #[test]
    fn project_keys_follow_sonar_grammar() {
        let fetch = Arc::new(FetchClient::new());
        assert!(
            SonarClient::new(Arc::clone(&fetch), "https://s", "platform:frontend", "t").is_ok()
        );
        assert!(SonarClient::new(Arc::clone(&fetch), "https://s", "my.project-1", "t").is_ok());
        assert!(matches!(
            SonarClient::new(Arc::clone(&fetch), "https://s", "12345", "t"),
            Err(SonarError::InvalidProjectKey(_))
        ));
        assert!(matches!(
            SonarClient::new(fetch, "https://s", "has space", "t"),
            Err(SonarError::InvalidProjectKey(_))
        ));
    }
}
