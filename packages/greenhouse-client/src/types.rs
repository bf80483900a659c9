use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Response body of `GET /{token}/jobs`.
#[derive(Debug, Clone, Deserialize)]
pub struct JobListResponse {
    #[serde(default)]
    pub jobs: Vec<BoardJobSummary>,
}

/// A job as it appears in a board's job list.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardJobSummary {
    pub id: u64,
    pub title: String,
    pub location: Option<NamedRef>,
    pub absolute_url: Option<String>,
    pub company_name: Option<String>,
    pub first_published: Option<String>,
    pub updated_at: Option<String>,
}

impl BoardJobSummary {
    /// Location name, if the board published one.
    pub fn location_name(&self) -> Option<&str> {
        self.location
            .as_ref()
            .map(|l| l.name.as_str())
            .filter(|name| !name.trim().is_empty())
    }

    /// When the job was posted: first publication, falling back to the last update.
    ///
    /// Timestamps that don't parse as RFC 3339 are ignored.
    pub fn posted_at(&self) -> Option<DateTime<Utc>> {
        self.first_published
            .as_deref()
            .and_then(parse_timestamp)
            .or_else(|| self.updated_at.as_deref().and_then(parse_timestamp))
    }
}

/// Response body of `GET /{token}/jobs/{id}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardJobDetail {
    pub id: u64,
    #[serde(default)]
    pub title: Option<String>,
    /// Entity-encoded HTML.
    #[serde(default)]
    pub content: Option<String>,
    pub absolute_url: Option<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub metadata: Vec<MetadataField>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub departments: Vec<NamedRef>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub offices: Vec<NamedRef>,
}

impl BoardJobDetail {
    /// Value of a metadata field when it is a plain string.
    pub fn metadata_value(&self, name: &str) -> Option<&str> {
        self.metadata
            .iter()
            .find(|m| m.name == name)
            .and_then(|m| m.value.as_str())
    }

    pub fn department_names(&self) -> Vec<String> {
        self.departments.iter().map(|d| d.name.clone()).collect()
    }

    pub fn office_names(&self) -> Vec<String> {
        self.offices.iter().map(|o| o.name.clone()).collect()
    }
}

/// Custom metadata attached to a job. `value` may be a string, a list or null.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetadataField {
    pub name: String,
    #[serde(default)]
    pub value: serde_json::Value,
}

/// `{ "name": ... }` objects used for locations, departments and offices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamedRef {
    pub name: String,
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|ts| ts.with_timezone(&Utc))
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}
