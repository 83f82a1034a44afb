use async_trait::async_trait;
use surf::http::Method as HttpMethod;
use surf::{Body, Client, RequestBuilder, Url};
use url::ParseError;
use utils::surf_logging::SurfLogging;

use crate::error::FetchError;
use crate::options::{FetchOptions, Method};
use crate::response::FetchResponse;

/// Issues the real request once the cache decides one is needed.
///
/// Injectable so tests can count invocations and script outcomes without a
/// network.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Sends one request and buffers the full response.
    async fn send(&self, target: &str, options: &FetchOptions)
        -> Result<FetchResponse, FetchError>;
}

/// Default transport backed by surf.
///
/// Browser-style `credentials` has no surf equivalent and is not applied
/// here; it still participates in the cache key.
pub struct SurfTransport {
    http: Client,
    base_url: Option<Url>,
}

impl SurfTransport {
    pub fn new() -> Self {
        Self {
            http: Client::new().with(SurfLogging),
            base_url: None,
        }
    }

    /// Transport that resolves relative targets against `base_url`.
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            http: Client::new().with(SurfLogging),
            base_url: Some(base_url),
        }
    }

    fn resolve(&self, target: &str) -> Result<Url, FetchError> {
        match Url::parse(target) {
            Ok(url) => Ok(url),
            Err(ParseError::RelativeUrlWithoutBase) => match &self.base_url {
                Some(base) => base.join(target).map_err(FetchError::invalid_target),
                None => Err(FetchError::invalid_target(format!(
                    "relative target {:?} needs a base URL",
                    target
                ))),
            },
            Err(err) => Err(FetchError::invalid_target(err)),
        }
    }
}

impl Default for SurfTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Transport for SurfTransport {
    async fn send(
        &self,
        target: &str,
        options: &FetchOptions,
    ) -> Result<FetchResponse, FetchError> {
        let url = self.resolve(target)?;
        let method = match options.method() {
            Some(method) => to_http_method(*method),
            None => HttpMethod::Get,
        };

        let mut request = RequestBuilder::new(method, url);
        for (name, value) in options.headers() {
            request = request.header(name.as_str(), value.as_str());
        }
        if let Some(body) = options.body() {
            request = request.body(Body::from_json(body).map_err(FetchError::transport)?);
        }

        let mut response = self
            .http
            .send(request.build())
            .await
            .map_err(FetchError::transport)?;
        let body = response
            .body_bytes()
            .await
            .map_err(FetchError::transport)?;
        let headers = response
            .iter()
            .map(|(name, values)| {
                let joined = values
                    .iter()
                    .map(|value| value.as_str())
                    .collect::<Vec<_>>()
                    .join(", ");
                (name.as_str().to_string(), joined)
            })
            .collect();

        Ok(FetchResponse::new(response.status(), headers, body))
    }
}

fn to_http_method(method: Method) -> HttpMethod {
    match method {
        Method::Get => HttpMethod::Get,
        Method::Head => HttpMethod::Head,
        Method::Post => HttpMethod::Post,
        Method::Put => HttpMethod::Put,
        Method::Delete => HttpMethod::Delete,
        Method::Patch => HttpMethod::Patch,
        Method::Options => HttpMethod::Options,
    }
}
