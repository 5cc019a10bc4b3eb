use crate::domain::metric::{AbsenceReason, MetricId, MetricValue, Normalizer};
use crate::domain::ports::SignalSource;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::debug;

/// One step into a JSON document.
#[derive(Debug, Clone)]
pub enum PathSegment {
    Key(&'static str),
    Index(usize),
}

/// Declarative fetch-and-normalize adapter: one GET against a fixed URL,
/// one field path into the JSON body, one unit conversion. External schemas
/// are untrusted and known to change; every failure mode maps to a typed
/// absence instead of escaping the adapter.
pub struct JsonApiSource {
    id: MetricId,
    client: Client,
    url: String,
    path: Vec<PathSegment>,
    normalizer: Normalizer,
}

/// Internal classification of a failed fetch. Collapsed to an
/// `AbsenceReason` at the port boundary.
#[derive(Debug)]
enum FetchError {
    Network(reqwest::Error),
    BadStatus(reqwest::StatusCode),
    NotJson,
    MissingField,
    NotNumeric,
}

impl FetchError {
    fn reason(&self) -> AbsenceReason {
        match self {
            Self::Network(e) if e.is_timeout() => AbsenceReason::Timeout,
            Self::Network(_) => AbsenceReason::NetworkError,
            Self::BadStatus(_) => AbsenceReason::BadStatus,
            Self::NotJson | Self::NotNumeric => AbsenceReason::ParseError,
            Self::MissingField => AbsenceReason::MissingField,
        }
    }
}

impl JsonApiSource {
    pub fn new(
        id: MetricId,
        client: Client,
        url: impl Into<String>,
        path: Vec<PathSegment>,
        normalizer: Normalizer,
    ) -> Self {
        Self {
            id,
            client,
            url: url.into(),
            path,
            normalizer,
        }
    }

    async fn try_fetch(&self) -> Result<f64, FetchError> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::BadStatus(status));
        }

        let body = response.text().await.map_err(FetchError::Network)?;
        let raw = extract_number(&body, &self.path)?;
        Ok(self.normalizer.apply(raw))
    }
}

/// Walks `path` into `body` and reads the value at the end as a number.
/// Numbers encoded as JSON strings (alternative.me does this) are accepted.
fn extract_number(body: &str, path: &[PathSegment]) -> Result<f64, FetchError> {
    let root: Value = serde_json::from_str(body).map_err(|_| FetchError::NotJson)?;

    let mut node = &root;
    for segment in path {
        node = match segment {
            PathSegment::Key(key) => node.get(*key),
            PathSegment::Index(i) => node.get(*i),
        }
        .ok_or(FetchError::MissingField)?;
    }

    match node {
        Value::Number(n) => n.as_f64().ok_or(FetchError::NotNumeric),
        Value::String(s) => s.trim().parse::<f64>().map_err(|_| FetchError::NotNumeric),
        _ => Err(FetchError::NotNumeric),
    }
}

#[async_trait]
impl SignalSource for JsonApiSource {
    fn id(&self) -> MetricId {
        self.id
    }

    async fn fetch(&self) -> MetricValue {
        match self.try_fetch().await {
            Ok(value) => {
                debug!("Fetched {} = {}", self.id, value);
                MetricValue::Present(value)
            }
            Err(err) => {
                debug!("Fetch of {} failed: {:?}", self.id, err);
                MetricValue::Absent(err.reason())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use PathSegment::{Index, Key};

    #[test]
    fn test_extracts_top_level_number() {
        let body = r#"{"tvl": 3500000000.0}"#;
        let raw = extract_number(body, &[Key("tvl")]).unwrap();
        assert_eq!(Normalizer::new(1e9, 2).apply(raw), 3.50);
    }

    #[test]
    fn test_extracts_nested_string_encoded_number() {
        // alternative.me sends values as strings inside a data array
        let body = r#"{"data": [{"value": "54", "timestamp": "1700000000"}]}"#;
        let raw = extract_number(body, &[Key("data"), Index(0), Key("value")]).unwrap();
        assert_eq!(raw, 54.0);
    }

    #[test]
    fn test_missing_field_is_typed() {
        let body = r#"{"data": []}"#;
        let err = extract_number(body, &[Key("data"), Index(0), Key("value")]).unwrap_err();
        assert_eq!(err.reason(), AbsenceReason::MissingField);

        let err = extract_number(r#"{"other": 1}"#, &[Key("tvl")]).unwrap_err();
        assert_eq!(err.reason(), AbsenceReason::MissingField);
    }

    #[test]
    fn test_non_json_body_is_a_parse_error() {
        let err = extract_number("<html>rate limited</html>", &[Key("tvl")]).unwrap_err();
        assert_eq!(err.reason(), AbsenceReason::ParseError);
    }

    #[test]
    fn test_non_numeric_leaf_is_a_parse_error() {
        let err = extract_number(r#"{"tvl": {"usd": 1}}"#, &[Key("tvl")]).unwrap_err();
        assert_eq!(err.reason(), AbsenceReason::ParseError);

        let err = extract_number(r#"{"tvl": "n/a"}"#, &[Key("tvl")]).unwrap_err();
        assert_eq!(err.reason(), AbsenceReason::ParseError);
    }
}
