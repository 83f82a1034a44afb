use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

use crate::rating::Rating;

/// Outcome of a best-effort metric conversion.
///
/// A value that does not convert is not an error for the dashboard; the
/// raw input is preserved for display, together with a diagnostic saying
/// why it was left as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum Converted<T> {
    Value(T),
    Raw { raw: String, diagnostic: String },
}

impl<T> Converted<T> {
    fn raw(raw: &str, diagnostic: String) -> Self {
        Converted::Raw {
            raw: raw.to_string(),
            diagnostic,
        }
    }

    pub fn value(self) -> Option<T> {
        match self {
            Converted::Value(value) => Some(value),
            Converted::Raw { .. } => None,
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, Converted::Value(_))
    }

    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            Converted::Raw { diagnostic, .. } => Some(diagnostic),
            Converted::Value(_) => None,
        }
    }
}

impl<T: fmt::Display> fmt::Display for Converted<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Converted::Value(value) => value.fmt(f),
            Converted::Raw { raw, .. } => f.write_str(raw),
        }
    }
}

/// Percentage, displayed as `72.5%`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Percent(pub f64);

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// Float displayed with a fixed number of decimals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fixed {
    value: f64,
    places: usize,
}

impl Fixed {
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", self.places, self.value)
    }
}

/// Boolean displayed the way the dashboard labels it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YesNo(pub bool);

impl fmt::Display for YesNo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(if self.0 { "Yes" } else { "No" })
    }
}

/// Date displayed as `YYYY-MM-DD`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateValue(pub DateTime<Utc>);

impl fmt::Display for DateValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

fn normalized(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// `"72.5"` to a percentage; non-numeric input stays raw.
pub fn to_percent(raw: &str) -> Converted<Percent> {
    match normalized(raw).parse::<f64>() {
        Ok(value) if value.is_finite() => Converted::Value(Percent(value)),
        _ => Converted::raw(raw, format!("can't convert value {:?} to percent", raw)),
    }
}

/// Numeric rating (`"1"`..`"5"`) to its letter form.
pub fn to_rating(raw: &str) -> Converted<Rating> {
    match normalized(raw).parse::<Rating>() {
        Ok(rating) => Converted::Value(rating),
        Err(_) => Converted::raw(raw, format!("can't convert value {:?} to rating", raw)),
    }
}

/// Integer conversion. Sonar sometimes writes whole numbers as `"12.0"`;
/// those are accepted too.
pub fn to_integer(raw: &str) -> Converted<i64> {
    let normalized = normalized(raw);
    if let Ok(value) = normalized.parse::<i64>() {
        return Converted::Value(value);
    }
    match normalized.parse::<f64>() {
        Ok(value) if value.is_finite() && value.fract() == 0.0 => Converted::Value(value as i64),
        _ => Converted::raw(raw, format!("can't convert value {:?} to integer", raw)),
    }
}

/// Float conversion rendered with `places` decimals.
pub fn to_float(raw: &str, places: usize) -> Converted<Fixed> {
    match normalized(raw).parse::<f64>() {
        Ok(value) if value.is_finite() => Converted::Value(Fixed { value, places }),
        _ => Converted::raw(raw, format!("can't convert value {:?} to float", raw)),
    }
}

/// `"true"`/`"false"` to a Yes/No label.
pub fn to_boolean(raw: &str) -> Converted<YesNo> {
    match normalized(raw).as_str() {
        "true" => Converted::Value(YesNo(true)),
        "false" => Converted::Value(YesNo(false)),
        _ => Converted::raw(raw, format!("can't convert value {:?} to boolean", raw)),
    }
}

/// Unix milliseconds to a calendar date.
pub fn to_date(raw: &str) -> Converted<DateValue> {
    let normalized = normalized(raw);
    let millis = match normalized.parse::<i64>() {
        Ok(value) => Some(value),
        Err(_) => normalized
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .map(|value| value as i64),
    };
    match millis.and_then(|ms| Utc.timestamp_millis_opt(ms).single()) {
        Some(date) => Converted::Value(DateValue(date)),
        None => Converted::raw(raw, format!("can't convert value {:?} to date", raw)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_keeps_minimal_representation() {
        assert_eq!(to_percent("72.5").to_string(), "72.5%");
        assert_eq!(to_percent("80").to_string(), "80%");
        assert_eq!(to_percent(" 0 ").to_string(), "0%");
    }

    #[test]
    fn percent_falls_back_to_raw() {
        let converted = to_percent("n/a");
        assert!(!converted.is_converted());
        assert_eq!(converted.to_string(), "n/a");
        assert!(converted.diagnostic().unwrap().contains("percent"));
    }

    #[test]
    fn rating_maps_digits_to_letters() {
        assert_eq!(to_rating("1").value(), Some(Rating::A));
        assert_eq!(to_rating("5").value(), Some(Rating::E));
        assert_eq!(to_rating("3").to_string(), "C");
    }

    #[test]
    fn rating_keeps_unknown_values_raw() {
        let converted = to_rating("9");
        assert_eq!(converted.to_string(), "9");
        assert!(converted.diagnostic().is_some());
    }

    #[test]
    fn integer_accepts_whole_floats() {
        assert_eq!(to_integer("12").value(), Some(12));
        assert_eq!(to_integer("12.0").value(), Some(12));
        assert!(!to_integer("12.5").is_converted());
        assert!(!to_integer("twelve").is_converted());
    }

    #[test]
    fn float_renders_fixed_decimals() {
        assert_eq!(to_float("3.14159", 2).to_string(), "3.14");
        assert_eq!(to_float("2", 1).to_string(), "2.0");
        assert!(!to_float("pi", 2).is_converted());
    }

    #[test]
    fn boolean_renders_yes_no() {
        assert_eq!(to_boolean("true").to_string(), "Yes");
        assert_eq!(to_boolean(" FALSE ").to_string(), "No");
        assert!(!to_boolean("1").is_converted());
    }

    #[test]
    fn date_decodes_unix_millis() {
        assert_eq!(to_date("0").to_string(), "1970-01-01");
        assert_eq!(to_date("1714557600000").to_string(), "2024-05-01");
        assert!(!to_date("yesterday").is_converted());
    }

    #[test]
    fn raw_fallback_preserves_input_verbatim() {
        let converted = to_integer("  broken  ");
        assert!(!converted.is_converted());
        assert!(converted.diagnostic().unwrap().contains("broken"));
    }
}
