use crate::domain::errors::PublishError;
use crate::domain::metric::{MetricId, MetricValue};
use crate::domain::ports::{PublishReceipt, RecordSink};
use crate::domain::record::DailyRecord;
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::info;

const API_BASE: &str = "https://api.notion.com/v1";
const NOTION_VERSION: &str = "2022-06-28";

/// Publishes one record per run as a page row in a Notion database. The
/// database schema is pre-provisioned; property names sent here must match
/// it exactly, and a mismatch is a publish-time failure.
pub struct NotionPublisher {
    client: Client,
    token: String,
    database_id: String,
}

#[derive(Debug, Deserialize)]
struct CreatePageResponse {
    id: String,
    url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct DatabaseResponse {
    properties: serde_json::Map<String, Value>,
}

impl NotionPublisher {
    pub fn new(client: Client, token: impl Into<String>, database_id: impl Into<String>) -> Self {
        Self {
            client,
            token: token.into(),
            database_id: database_id.into(),
        }
    }

    /// Retrieves the destination database and returns the property names
    /// visible to the integration. Diagnostic tooling for the `check`
    /// command; the publish path never calls this.
    pub async fn describe_database(&self) -> Result<Vec<String>, PublishError> {
        let response = self
            .client
            .get(format!("{API_BASE}/databases/{}", self.database_id))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .send()
            .await
            .map_err(|e| PublishError::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_failure(status, &body_text(response).await));
        }

        let db: DatabaseResponse =
            response.json().await.map_err(|e| PublishError::Transport {
                detail: format!("malformed database response: {e}"),
            })?;
        Ok(db.properties.keys().cloned().collect())
    }
}

async fn body_text(response: reqwest::Response) -> String {
    response.text().await.unwrap_or_default()
}

/// Maps a record to the store's native page-properties shape. `Present`
/// becomes a number; `Absent` becomes an explicit null number field —
/// omitting the field or sending 0 would be indistinguishable from a real
/// zero reading.
pub fn record_properties(record: &DailyRecord) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        "Date".to_string(),
        json!({ "date": { "start": record.date().format("%Y-%m-%d").to_string() } }),
    );
    for (id, value) in record.values() {
        let number = match value {
            MetricValue::Present(v) => json!(v),
            MetricValue::Absent(_) => Value::Null,
        };
        properties.insert(id.property_name().to_string(), json!({ "number": number }));
    }
    Value::Object(properties)
}

/// Notion's validation messages embed the offending property name; pick out
/// the one we recognize so the diagnostic can name the field.
fn offending_property(message: &str) -> String {
    MetricId::ALL
        .iter()
        .map(|id| id.property_name())
        .chain(std::iter::once("Date"))
        .find(|name| message.contains(name))
        .unwrap_or("<unknown>")
        .to_string()
}

fn classify_failure(status: StatusCode, body: &str) -> PublishError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or(ApiErrorBody {
        code: String::new(),
        message: body.to_string(),
    });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PublishError::Auth {
            detail: if parsed.message.is_empty() {
                status.to_string()
            } else {
                parsed.message
            },
        },
        StatusCode::BAD_REQUEST if parsed.code == "validation_error" => {
            PublishError::SchemaMismatch {
                property: offending_property(&parsed.message),
                detail: parsed.message,
            }
        }
        _ => PublishError::Transport {
            detail: format!("{status}: {}", parsed.message),
        },
    }
}

#[async_trait]
impl RecordSink for NotionPublisher {
    async fn publish(&self, record: &DailyRecord) -> Result<PublishReceipt, PublishError> {
        let payload = json!({
            "parent": { "database_id": self.database_id },
            "properties": record_properties(record),
        });

        info!("Publishing record for {} to Notion...", record.date());
        let response = self
            .client
            .post(format!("{API_BASE}/pages"))
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(&payload)
            .send()
            .await
            .map_err(|e| PublishError::Transport {
                detail: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify_failure(status, &body_text(response).await));
        }

        let page: CreatePageResponse =
            response.json().await.map_err(|e| PublishError::Transport {
                detail: format!("malformed create-page response: {e}"),
            })?;
        Ok(PublishReceipt {
            page_id: page.id,
            url: page.url,
        })
    }
}
