use strum_macros::{AsRefStr, Display, EnumString};

use crate::convert::{to_boolean, to_date, to_float, to_integer, to_percent, to_rating};

/// Value type of a Sonar metric, as reported by `/api/metrics/search`.
///
/// Drives how a raw measure value is rendered for the dashboard; raw
/// values that do not convert are shown as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
pub enum MetricType {
    Int,
    Float,
    Percent,
    Rating,
    Bool,
    Level,
    Millisec,
    WorkDur,
    String,
    Data,
    Distrib,
}

impl MetricType {
    pub fn render(self, raw: &str) -> String {
        match self {
            MetricType::Int | MetricType::WorkDur => to_integer(raw).to_string(),
            MetricType::Float => to_float(raw, 2).to_string(),
            MetricType::Percent => to_percent(raw).to_string(),
            MetricType::Rating => to_rating(raw).to_string(),
            MetricType::Bool => to_boolean(raw).to_string(),
            MetricType::Millisec => to_date(raw).to_string(),
            MetricType::Level | MetricType::String | MetricType::Data | MetricType::Distrib => {
                raw.trim().to_string()
            }
        }
    }
}

/// Follow-up metric queried for a failed quality-gate domain.
pub fn domain_metric(domain: &str) -> Option<&'static str> {
    match domain {
        "Reliability" => Some("bugs"),
        "Maintainability" => Some("code_smells"),
        "Security" => Some("vulnerabilities"),
        "SecurityReview" => Some("security_hotspots"),
        "Coverage" => Some("new_lines_to_cover"),
        "Duplications" => Some("new_duplicated_lines"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_wire_type_names() {
        assert_eq!("PERCENT".parse::<MetricType>().unwrap(), MetricType::Percent);
        assert_eq!("WORK_DUR".parse::<MetricType>().unwrap(), MetricType::WorkDur);
        assert_eq!("rating".parse::<MetricType>().unwrap(), MetricType::Rating);
        assert!("UNKNOWN_TYPE".parse::<MetricType>().is_err());
    }

    #[test]
    fn renders_by_type() {
        assert_eq!(MetricType::Percent.render("72.5"), "72.5%");
        assert_eq!(MetricType::Rating.render("2"), "B");
        assert_eq!(MetricType::Int.render("14.0"), "14");
        assert_eq!(MetricType::Bool.render("true"), "Yes");
        assert_eq!(MetricType::Level.render(" OK "), "OK");
    }

    #[test]
    fn render_keeps_unconvertible_values() {
        assert_eq!(MetricType::Percent.render("n/a"), "n/a");
        assert_eq!(MetricType::Rating.render("nine"), "nine");
    }

    #[test]
    fn domain_metrics_cover_the_gate_domains() {
        assert_eq!(domain_metric("Reliability"), Some("bugs"));
        assert_eq!(domain_metric("SecurityReview"), Some("security_hotspots"));
        assert_eq!(domain_metric("Made Up"), None);
    }
}
