use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize, de};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    #[default]
    Pending,
    InProgress,
    Resolved,
}

impl IssueStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Resolved => "resolved",
        }
    }
}

/// Accept a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, keeping
/// only the calendar date.
pub fn parse_promised_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
}

fn promised_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_promised_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date: {}", raw)))
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: i64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "promised_date")]
    pub date_promised: NaiveDate,
    #[serde(default)]
    pub status: IssueStatus,
    /// Keys this version does not know about, carried through saves untouched.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl Issue {
    /// Overlay every field present in `patch`; the id never changes.
    pub fn apply(&mut self, patch: IssuePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(description) = patch.description {
            self.description = description;
        }
        if let Some(date_promised) = patch.date_promised {
            self.date_promised = date_promised;
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
    }
}

/// Fields accepted when creating an issue. Status is not accepted; new
/// issues always start out pending.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewIssue {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(deserialize_with = "promised_date")]
    pub date_promised: NaiveDate,
}

/// Partial update. Unknown keys (including `id`) are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub date_promised: Option<NaiveDate>,
    pub status: Option<IssueStatus>,
}

/// On-disk document shape: `{ "issues": [...] }`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IssueDocument {
    #[serde(default)]
    pub issues: Vec<Issue>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub resolved: usize,
    pub days_since_oldest_promise: Option<i64>,
}

impl Summary {
    pub fn from_issues(issues: &[Issue], today: NaiveDate) -> Self {
        let count = |status: IssueStatus| issues.iter().filter(|i| i.status == status).count();
        Self {
            total: issues.len(),
            pending: count(IssueStatus::Pending),
            in_progress: count(IssueStatus::InProgress),
            resolved: count(IssueStatus::Resolved),
            days_since_oldest_promise: days_since_oldest_promise(issues, today),
        }
    }
}

/// Whole days between the oldest promised date and `today`.
pub fn days_since_oldest_promise(issues: &[Issue], today: NaiveDate) -> Option<i64> {
    issues
        .iter()
        .map(|i| i.date_promised)
        .min()
        .map(|oldest| (today - oldest).num_days())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn issue(id: i64, promised: &str, status: IssueStatus) -> Issue {
        Issue {
            id,
            title: format!("Issue {}", id),
            description: String::new(),
            date_promised: date(promised),
            status,
            extra: Default::default(),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_string(&IssueStatus::InProgress).unwrap(),
            "\"in-progress\""
        );
        for status in [
            IssueStatus::Pending,
            IssueStatus::InProgress,
            IssueStatus::Resolved,
        ] {
            let wire = serde_json::to_value(status).unwrap();
            assert_eq!(wire, status.as_str());
        }
        assert!(serde_json::from_str::<IssueStatus>("\"in_progress\"").is_err());
    }

    #[test]
    fn test_issue_json_shape() {
        let issue = issue(7, "2024-01-01", IssueStatus::Pending);
        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["id"], 7);
        assert_eq!(value["datePromised"], "2024-01-01");
        assert_eq!(value["status"], "pending");
    }

    #[test]
    fn test_missing_status_defaults_to_pending() {
        let json = r#"{"id":1,"title":"t","description":"d","datePromised":"2024-02-03"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.status, IssueStatus::Pending);
    }

    #[test]
    fn test_sparse_record_reads_with_defaults() {
        let json = r#"{"id":1,"title":"Old","datePromised":"2023-01-01","status":"pending"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.description, "");
        assert_eq!(issue.title, "Old");

        let untitled: Issue = serde_json::from_str(r#"{"id":2,"datePromised":"2023-01-01"}"#).unwrap();
        assert_eq!(untitled.title, "");
        assert_eq!(untitled.status, IssueStatus::Pending);
    }

    #[test]
    fn test_unknown_keys_survive_round_trip() {
        let json = r#"{"id":1,"title":"t","description":"","datePromised":"2023-01-01","status":"resolved","owner":"landlord"}"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.extra["owner"], "landlord");

        let value = serde_json::to_value(&issue).unwrap();
        assert_eq!(value["owner"], "landlord");
        assert_eq!(value["status"], "resolved");
    }

    #[test]
    fn test_promised_date_accepts_timestamps() {
        assert_eq!(parse_promised_date("2024-01-01"), Some(date("2024-01-01")));
        assert_eq!(
            parse_promised_date("2024-01-01T00:00:00.000Z"),
            Some(date("2024-01-01"))
        );
        assert_eq!(parse_promised_date("next tuesday"), None);

        let issue: Issue =
            serde_json::from_str(r#"{"id":1,"datePromised":"2023-05-06T12:00:00Z"}"#).unwrap();
        assert_eq!(issue.date_promised, date("2023-05-06"));
    }

    #[test]
    fn test_apply_patch_keeps_id() {
        let mut target = issue(3, "2024-01-01", IssueStatus::Pending);
        let patch: IssuePatch =
            serde_json::from_str(r#"{"id": 99, "status": "resolved", "title": "Fixed"}"#).unwrap();
        target.apply(patch);
        assert_eq!(target.id, 3);
        assert_eq!(target.title, "Fixed");
        assert_eq!(target.status, IssueStatus::Resolved);
        assert_eq!(target.date_promised, date("2024-01-01"));
    }

    #[test]
    fn test_new_issue_ignores_status() {
        let req: NewIssue = serde_json::from_str(
            r#"{"title":"Leaky roof","datePromised":"2024-01-01","status":"resolved"}"#,
        )
        .unwrap();
        assert_eq!(req.title, "Leaky roof");
        assert_eq!(req.description, "");
    }

    #[test]
    fn test_days_since_oldest_promise() {
        let issues = vec![
            issue(1, "2024-03-01", IssueStatus::Pending),
            issue(2, "2024-01-01", IssueStatus::Resolved),
        ];
        assert_eq!(
            days_since_oldest_promise(&issues, date("2024-01-11")),
            Some(10)
        );
        assert_eq!(days_since_oldest_promise(&[], date("2024-01-11")), None);
    }

    #[test]
    fn test_summary_counts() {
        let issues = vec![
            issue(1, "2024-01-01", IssueStatus::Pending),
            issue(2, "2024-01-02", IssueStatus::InProgress),
            issue(3, "2024-01-03", IssueStatus::InProgress),
        ];
        let summary = Summary::from_issues(&issues, date("2024-01-31"));
        assert_eq!(summary.total, 3);
        assert_eq!(summary.pending, 1);
        assert_eq!(summary.in_progress, 2);
        assert_eq!(summary.resolved, 0);
        assert_eq!(summary.days_since_oldest_promise, Some(30));
    }
}
