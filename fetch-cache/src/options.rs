use getset::Getters;
use serde_json::{json, Value};
use strum_macros::{AsRefStr, Display, EnumString};

/// HTTP method carried in [`FetchOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Patch,
    Options,
}

/// Browser-style credentials mode.
///
/// Carried and keyed verbatim; transports that have no equivalent ignore
/// it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "kebab-case", ascii_case_insensitive)]
pub enum CredentialsMode {
    Omit,
    SameOrigin,
    Include,
}

/// Request options passed through to the transport and folded into the
/// cache key.
///
/// Every option is optional; an omitted option contributes nothing to the
/// key, so `FetchOptions::new()` and an explicit GET produce different
/// keys.
#[derive(Debug, Clone, Default, Getters)]
#[get = "pub"]
pub struct FetchOptions {
    /// HTTP method; transports treat `None` as GET.
    method: Option<Method>,
    /// Header pairs in the order they were added.
    headers: Vec<(String, String)>,
    /// JSON request body.
    body: Option<Value>,
    /// Credentials mode.
    credentials: Option<CredentialsMode>,
}

impl FetchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialsMode) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Present options as `(name, value)` pairs sorted by descending name.
    ///
    /// This is the canonical order fed into the cache key. Values are
    /// serialized as given: header order is significant, while JSON object
    /// keys inside the body follow `serde_json`'s sorted maps.
    pub(crate) fn canonical_entries(&self) -> Vec<(&'static str, Value)> {
        let mut entries = Vec::new();
        if let Some(method) = self.method {
            entries.push(("method", Value::String(method.to_string())));
        }
        if !self.headers.is_empty() {
            let pairs: Vec<Value> = self
                .headers
                .iter()
                .map(|(name, value)| json!([name, value]))
                .collect();
            entries.push(("headers", Value::Array(pairs)));
        }
        if let Some(credentials) = self.credentials {
            entries.push(("credentials", Value::String(credentials.to_string())));
        }
        if let Some(body) = &self.body {
            entries.push(("body", body.clone()));
        }
        entries.sort_by(|a, b| b.0.cmp(a.0));
        entries
    }
}
