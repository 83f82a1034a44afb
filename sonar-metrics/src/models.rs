use serde::{Deserialize, Serialize};

#[cfg(feature = "graphql")]
use async_graphql::SimpleObject;

/// One measured value from `/api/measures/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct Measure {
    pub metric: String,
    #[serde(default)]
    pub value: String,
    #[serde(default)]
    pub period: Option<MeasurePeriod>,
    #[serde(default, rename = "bestValue")]
    pub best_value: bool,
    #[serde(default)]
    pub component: String,
}

/// Leak-period slice of a measure; an index of zero means no period at
/// all.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct MeasurePeriod {
    #[serde(default)]
    pub index: i32,
    #[serde(default, rename = "bestValue")]
    pub best_value: bool,
    #[serde(default)]
    pub value: String,
}

impl Measure {
    /// The value the dashboard shows: the leak-period value when a period
    /// is present, the overall value otherwise.
    pub fn effective_value(&self) -> &str {
        match &self.period {
            Some(period) if period.index != 0 => &period.value,
            _ => &self.value,
        }
    }
}

/// Envelope of `/api/measures/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct MeasuresResponse {
    #[serde(default)]
    pub measures: Vec<Measure>,
}

impl MeasuresResponse {
    /// Measure for `metric`, when the response carried one.
    pub fn metric(&self, metric: &str) -> Option<&Measure> {
        self.measures.iter().find(|measure| measure.metric == metric)
    }
}

/// One pull request from `/api/project_pull_requests/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct PullRequest {
    pub key: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub branch: String,
    #[serde(default)]
    pub base: String,
    #[serde(default)]
    pub status: PullRequestStatus,
    #[serde(default, rename = "analysisDate")]
    pub analysis_date: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub target: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct PullRequestStatus {
    #[serde(default, rename = "qualityGateStatus")]
    pub quality_gate_status: String,
}

/// Envelope of `/api/project_pull_requests/list`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct PullRequestsResponse {
    #[serde(default, rename = "pullRequests")]
    pub pull_requests: Vec<PullRequest>,
}

impl PullRequestsResponse {
    /// Quality-gate status for the pull request whose source branch is
    /// `branch`.
    pub fn gate_status_for_branch(&self, branch: &str) -> Option<&str> {
        self.pull_requests
            .iter()
            .find(|pr| pr.branch == branch)
            .map(|pr| pr.status.quality_gate_status.as_str())
    }
}

/// One quality-gate condition from a project-status payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct Condition {
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "metricKey")]
    pub metric_key: String,
    #[serde(default)]
    pub comparator: String,
    #[serde(default, rename = "errorThreshold")]
    pub error_threshold: String,
    #[serde(default, rename = "actualValue")]
    pub actual_value: String,
}

/// Analysis period attached to a project status.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct AnalysisPeriod {
    #[serde(default)]
    pub mode: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub parameter: String,
}

/// Quality-gate verdict for a whole project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct QualityGateStatus {
    #[serde(default)]
    pub status: String,
    #[serde(default, rename = "ignoredConditions")]
    pub ignored_conditions: bool,
    #[serde(default, rename = "caycStatus")]
    pub cayc_status: String,
    #[serde(default)]
    pub conditions: Vec<Condition>,
    #[serde(default)]
    pub period: AnalysisPeriod,
}

impl QualityGateStatus {
    pub fn passed(&self) -> bool {
        self.status == "OK"
    }

    /// Conditions the gate flagged as failing.
    pub fn failing_conditions(&self) -> impl Iterator<Item = &Condition> {
        self.conditions
            .iter()
            .filter(|condition| condition.status == "ERROR")
    }
}

/// Envelope of a project-status payload.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct QualityGateResponse {
    #[serde(default, rename = "projectStatus")]
    pub project_status: QualityGateStatus,
}

/// One metric definition from `/api/metrics/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct MetricDefinition {
    #[serde(default)]
    pub id: String,
    pub key: String,
    #[serde(default, rename = "type")]
    pub value_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub direction: i32,
    #[serde(default)]
    pub qualitative: bool,
    #[serde(default)]
    pub hidden: bool,
}

/// Envelope of `/api/metrics/search`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "graphql", derive(SimpleObject))]
pub struct MetricDefinitionsResponse {
    #[serde(default)]
    pub metrics: Vec<MetricDefinition>,
}
