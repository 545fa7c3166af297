//! REST client for Jira Cloud.
//!
//! Uses reqwest with Basic auth built from `JIRA_EMAIL` and
//! `JIRA_API_TOKEN`. Two capabilities: batch query validation via the JQL
//! parse endpoint, and a paginated search that returns the complete result
//! set (callers never see continuation state).

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::model::Issue;

use super::{QueryCheck, RemoteError};

const SEARCH_PAGE_SIZE: usize = 100;
const ISSUE_FIELDS: [&str; 6] = ["summary", "status", "assignee", "reporter", "created", "updated"];

pub struct JiraClient {
    client: reqwest::Client,
    base_url: String,
    auth_header: String,
}

#[derive(Debug, Deserialize)]
struct ParseResponse {
    queries: Vec<ParsedQuery>,
}

#[derive(Debug, Deserialize)]
struct ParsedQuery {
    #[serde(default)]
    errors: Vec<String>,
    #[serde(default)]
    warnings: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    total: usize,
    issues: Vec<WireIssue>,
}

#[derive(Debug, Deserialize)]
struct WireIssue {
    id: String,
    key: String,
    fields: WireFields,
}

#[derive(Debug, Deserialize)]
struct WireFields {
    #[serde(default)]
    summary: Option<String>,
    status: WireStatus,
    #[serde(default)]
    assignee: Option<WireUser>,
    #[serde(default)]
    reporter: Option<WireUser>,
    created: String,
    updated: String,
}

#[derive(Debug, Deserialize)]
struct WireStatus {
    name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireUser {
    display_name: String,
}

impl JiraClient {
    pub fn new(domain: &str, email: &str, api_token: &str) -> Self {
        let token = BASE64.encode(format!("{}:{}", email, api_token));
        JiraClient {
            client: reqwest::Client::new(),
            base_url: format!("https://{}", domain.trim_end_matches('/')),
            auth_header: format!("Basic {}", token),
        }
    }

    /// Build a client from `JIRA_EMAIL` / `JIRA_API_TOKEN`.
    pub fn from_env(domain: &str) -> Result<Self, RemoteError> {
        let email = std::env::var("JIRA_EMAIL")
            .map_err(|_| RemoteError::Credentials("set JIRA_EMAIL to your Atlassian account email".into()))?;
        let token = std::env::var("JIRA_API_TOKEN")
            .map_err(|_| RemoteError::Credentials("set JIRA_API_TOKEN to an Atlassian API token".into()))?;
        Ok(Self::new(domain, &email, &token))
    }

    async fn post_json(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, RemoteError> {
        let resp = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .header("Authorization", &self.auth_header)
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(RemoteError::Api { status, body });
        }
        Ok(resp.json().await?)
    }

    /// Validate a batch of already-scoped queries in one round trip.
    ///
    /// The returned vector is position-aligned with the input. A transport
    /// failure is an `Err` covering the whole batch: the caller must treat
    /// it as "unvalidated", never as "all invalid".
    pub async fn validate_batch(&self, scoped: &[String]) -> Result<Vec<QueryCheck>, RemoteError> {
        let body = serde_json::json!({ "queries": scoped });
        let json = self
            .post_json("/rest/api/2/jql/parse?validation=strict", &body)
            .await?;
        let parsed: ParseResponse = serde_json::from_value(json)
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        if parsed.queries.len() != scoped.len() {
            return Err(RemoteError::Malformed(format!(
                "validated {} queries, got {} results",
                scoped.len(),
                parsed.queries.len()
            )));
        }
        Ok(parsed.queries.into_iter().map(check_from_wire).collect())
    }

    /// Fetch every issue matching one scoped query, paging until the
    /// server-reported total is reached.
    pub async fn search_all(&self, scoped_jql: &str) -> Result<Vec<Issue>, RemoteError> {
        let mut issues = Vec::new();
        loop {
            let body = serde_json::json!({
                "jql": scoped_jql,
                "startAt": issues.len(),
                "maxResults": SEARCH_PAGE_SIZE,
                "fields": ISSUE_FIELDS,
            });
            let json = self.post_json("/rest/api/2/search", &body).await?;
            let page: SearchResponse = serde_json::from_value(json)
                .map_err(|e| RemoteError::Malformed(e.to_string()))?;

            let page_len = page.issues.len();
            for wire in page.issues {
                issues.push(issue_from_wire(wire)?);
            }
            // An empty page short-circuits even if total says otherwise,
            // so a lying server cannot loop us forever.
            if issues.len() >= page.total || page_len == 0 {
                return Ok(issues);
            }
        }
    }
}

fn check_from_wire(parsed: ParsedQuery) -> QueryCheck {
    QueryCheck {
        valid: parsed.errors.is_empty(),
        errors: parsed.errors,
        warnings: parsed.warnings,
    }
}

fn issue_from_wire(wire: WireIssue) -> Result<Issue, RemoteError> {
    Ok(Issue {
        summary: wire.fields.summary.unwrap_or_default(),
        status: wire.fields.status.name,
        assignee: wire.fields.assignee.map(|u| u.display_name),
        reporter: wire.fields.reporter.map(|u| u.display_name),
        created: parse_timestamp(&wire.fields.created)?,
        updated: parse_timestamp(&wire.fields.updated)?,
        id: wire.id,
        key: wire.key,
    })
}

/// Jira emits "2024-03-01T09:30:00.000+0000"; fall back to RFC 3339 for
/// servers that send a colon in the offset.
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, RemoteError> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RemoteError::Malformed(format!("bad timestamp '{}': {}", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn check_is_valid_only_with_zero_errors() {
        let ok = check_from_wire(ParsedQuery {
            errors: vec![],
            warnings: vec!["field 'foo' is deprecated".into()],
        });
        assert!(ok.valid);
        assert_eq!(ok.warnings.len(), 1);

        let bad = check_from_wire(ParsedQuery {
            errors: vec!["expected a field name".into()],
            warnings: vec![],
        });
        assert!(!bad.valid);
    }

    #[test]
    fn issue_maps_from_search_json() {
        let json = serde_json::json!({
            "id": "10042",
            "key": "PROJ-7",
            "fields": {
                "summary": "Login page 500s",
                "status": { "name": "In Progress" },
                "assignee": { "displayName": "Riley Chen" },
                "reporter": null,
                "created": "2024-03-01T09:30:00.000+0000",
                "updated": "2024-03-02T10:00:00.000+0000"
            }
        });
        let wire: WireIssue = serde_json::from_value(json).unwrap();
        let issue = issue_from_wire(wire).unwrap();
        assert_eq!(issue.key, "PROJ-7");
        assert_eq!(issue.status, "In Progress");
        assert_eq!(issue.assignee.as_deref(), Some("Riley Chen"));
        assert_eq!(issue.reporter, None);
        assert_eq!(issue.created.to_rfc3339(), "2024-03-01T09:30:00+00:00");
    }

    #[test]
    fn rfc3339_timestamps_also_parse() {
        assert!(parse_timestamp("2024-03-01T09:30:00+02:00").is_ok());
        assert!(parse_timestamp("not a date").is_err());
    }

    #[test]
    fn parse_response_defaults_missing_lists() {
        let json = serde_json::json!({ "queries": [ {}, { "errors": ["boom"] } ] });
        let parsed: ParseResponse = serde_json::from_value(json).unwrap();
        let checks: Vec<_> = parsed.queries.into_iter().map(check_from_wire).collect();
        assert!(checks[0].valid);
        assert!(!checks[1].valid);
    }
}
