use chrono::{DateTime, Utc};
use greenhouse_client::{BoardJobDetail, BoardJobSummary};
use serde::Serialize;

use super::job::{source_id, GREENHOUSE_SOURCE};
use crate::common::utils::html_to_plain_text;

/// Metadata field whose value "Remote" marks a remote posting.
const WORKPLACE_TYPE_FIELD: &str = "Workplace Type";

/// A posting as fetched from a board, description already reduced to plain text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FetchedJob {
    pub source_id: String,
    pub external_id: u64,
    pub title: String,
    /// Organization display name, the board token when the board has none.
    pub company: String,
    pub url: String,
    pub location: Option<String>,
    pub locations: Vec<String>,
    pub is_remote: bool,
    pub description: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub departments: Vec<String>,
    pub offices: Vec<String>,
}

impl FetchedJob {
    pub fn from_board(token: &str, summary: BoardJobSummary, detail: BoardJobDetail) -> Self {
        let location = summary.location_name().map(str::to_string);
        let company = summary
            .company_name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| token.to_string());

        Self {
            source_id: source_id(GREENHOUSE_SOURCE, token, summary.id),
            external_id: summary.id,
            posted_at: summary.posted_at(),
            title: summary.title,
            company,
            url: detail
                .absolute_url
                .clone()
                .or(summary.absolute_url)
                .unwrap_or_default(),
            locations: location.iter().cloned().collect(),
            location,
            is_remote: detail.metadata_value(WORKPLACE_TYPE_FIELD) == Some("Remote"),
            description: html_to_plain_text(detail.content.as_deref().unwrap_or_default()),
            departments: detail.department_names(),
            offices: detail.office_names(),
        }
    }

    /// Location name, else the derived locations joined, else "Unknown".
    pub fn display_location(&self) -> String {
        match &self.location {
            Some(name) => name.clone(),
            None if !self.locations.is_empty() => self.locations.join(", "),
            None => "Unknown".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(json: serde_json::Value) -> BoardJobSummary {
        serde_json::from_value(json).unwrap()
    }

    fn detail(json: serde_json::Value) -> BoardJobDetail {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn test_from_board_maps_fields() {
        let job = FetchedJob::from_board(
            "acme",
            summary(serde_json::json!({
                "id": 7,
                "title": "Platform Engineer",
                "location": {"name": "Minneapolis, MN"},
                "company_name": "Acme Corp",
                "first_published": "2025-03-01T12:00:00Z"
            })),
            detail(serde_json::json!({
                "id": 7,
                "content": "&lt;p&gt;Run &lt;b&gt;Kubernetes&lt;/b&gt;&amp;nbsp;clusters&lt;/p&gt;",
                "absolute_url": "https://boards.greenhouse.io/acme/jobs/7",
                "metadata": [{"name": "Workplace Type", "value": "Remote"}],
                "departments": [{"name": "Infrastructure"}, {"name": "Engineering"}],
                "offices": [{"name": "US"}]
            })),
        );

        assert_eq!(job.source_id, "greenhouse-acme-7");
        assert_eq!(job.company, "Acme Corp");
        assert_eq!(job.url, "https://boards.greenhouse.io/acme/jobs/7");
        assert_eq!(job.display_location(), "Minneapolis, MN");
        assert!(job.is_remote);
        assert_eq!(job.description, "Run Kubernetes clusters");
        assert_eq!(job.departments, vec!["Infrastructure", "Engineering"]);
        assert!(job.posted_at.is_some());
    }

    #[test]
    fn test_from_board_fallbacks() {
        let job = FetchedJob::from_board(
            "acme",
            summary(serde_json::json!({"id": 8, "title": "Designer"})),
            detail(serde_json::json!({
                "id": 8,
                "metadata": [{"name": "Workplace Type", "value": "Hybrid"}],
                "departments": null
            })),
        );

        assert_eq!(job.company, "acme");
        assert_eq!(job.display_location(), "Unknown");
        assert!(!job.is_remote);
        assert_eq!(job.description, "");
        assert!(job.departments.is_empty());
        assert!(job.posted_at.is_none());
    }
}
