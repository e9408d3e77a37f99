// ingest.rs — Parsing the extraction service's response.
//
// The service answers `POST /process` with `{ "meeting": {...}, "goals": [...] }`
// on success and `{ "detail": "..." }` on failure. Both arrive here as JSON;
// anything that is not a well-formed success body becomes `InvalidResult`,
// so callers can keep the board they already have.
//
// Goals coming from the service may omit `subtasks`, `dependencies`,
// `description` and `meeting_id`. The first three default to empty; a
// missing `meeting_id` is filled with the enclosing meeting's id.

use std::collections::BTreeSet;

use serde::Deserialize;
use serde_json::Value;

use crate::error::GoalError;
use crate::model::{BoardSnapshot, Goal, GoalId, Meeting, Priority, Subtask};

/// A complete, parsed extraction result ready for `GoalGraphStore::ingest`.
pub type ExtractionResult = BoardSnapshot;

/// Goal as sent over the wire, before `meeting_id` is settled.
#[derive(Deserialize)]
struct WireGoal {
    id: GoalId,
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    priority: Priority,
    #[serde(default)]
    assignees: Vec<String>,
    #[serde(default)]
    subtasks: Option<Vec<Subtask>>,
    #[serde(default)]
    dependencies: Option<BTreeSet<GoalId>>,
    #[serde(default)]
    meeting_id: Option<i64>,
}

impl WireGoal {
    fn into_goal(self, meeting_id: i64) -> Goal {
        Goal {
            id: self.id,
            name: self.name,
            description: self.description.unwrap_or_default(),
            priority: self.priority,
            assignees: self.assignees,
            subtasks: self.subtasks.unwrap_or_default(),
            dependencies: self.dependencies.unwrap_or_default(),
            meeting_id: self.meeting_id.unwrap_or(meeting_id),
        }
    }
}

/// Parse a response body held as a JSON value.
pub fn parse_result(value: &Value) -> Result<ExtractionResult, GoalError> {
    let Some(body) = value.as_object() else {
        return Err(GoalError::InvalidResult(
            "response body is not a JSON object".to_string(),
        ));
    };

    if let Some(detail) = body.get("detail") {
        let detail = match detail {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        };
        return Err(GoalError::InvalidResult(format!(
            "extraction service reported an error: {detail}"
        )));
    }

    let meeting = match body.get("meeting") {
        Some(m @ Value::Object(_)) => m,
        Some(_) => return Err(GoalError::InvalidResult("`meeting` is not an object".to_string())),
        None => return Err(GoalError::InvalidResult("missing `meeting`".to_string())),
    };
    let goals = match body.get("goals") {
        Some(Value::Array(items)) => items,
        Some(_) => return Err(GoalError::InvalidResult("`goals` is not an array".to_string())),
        None => return Err(GoalError::InvalidResult("missing `goals`".to_string())),
    };

    let meeting = Meeting::deserialize(meeting)
        .map_err(|e| GoalError::InvalidResult(format!("malformed meeting: {e}")))?;

    let goals = goals
        .iter()
        .enumerate()
        .map(|(i, raw)| {
            WireGoal::deserialize(raw)
                .map(|g| g.into_goal(meeting.id))
                .map_err(|e| GoalError::InvalidResult(format!("malformed goal at index {i}: {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(ExtractionResult { meeting, goals })
}

/// Parse a response body from text.
pub fn parse_result_str(body: &str) -> Result<ExtractionResult, GoalError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| GoalError::InvalidResult(format!("response is not JSON: {e}")))?;
    parse_result(&value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Value {
        json!({
            "meeting": { "id": 12, "title": "Launch sync", "date": "2024-03-01", "summary": "Plan launch" },
            "goals": [
                {
                    "id": 1,
                    "name": "Draft announcement",
                    "description": "Write the blog post",
                    "priority": "High",
                    "assignees": ["Ana"],
                    "subtasks": [{ "id": 1, "name": "Outline" }],
                    "dependencies": [],
                    "meeting_id": 12
                },
                {
                    "id": 2,
                    "name": "Publish",
                    "description": "Push it live",
                    "priority": "Low",
                    "assignees": ["Bo", "Ana"],
                    "dependencies": [1]
                }
            ]
        })
    }

    #[test]
    fn parses_a_success_body() {
        let result = parse_result(&sample()).unwrap();
        assert_eq!(result.meeting.id, 12);
        assert_eq!(result.meeting.date.as_deref(), Some("2024-03-01"));
        assert_eq!(result.goals.len(), 2);
        assert_eq!(result.goals[0].subtasks.len(), 1);
        assert_eq!(result.goals[1].priority, Priority::Low);
        assert!(result.goals[1].depends_on(1));
    }

    #[test]
    fn missing_optional_goal_fields_get_defaults() {
        let result = parse_result(&sample()).unwrap();
        let publish = &result.goals[1];
        assert!(publish.subtasks.is_empty());
        assert_eq!(publish.meeting_id, 12);
    }

    #[test]
    fn null_subtasks_and_dependencies_become_empty() {
        let body = json!({
            "meeting": { "id": 1, "title": "T" },
            "goals": [{ "id": 1, "name": "G", "priority": "Medium", "assignees": [],
                        "subtasks": null, "dependencies": null }]
        });
        let result = parse_result(&body).unwrap();
        assert!(result.goals[0].subtasks.is_empty());
        assert!(result.goals[0].dependencies.is_empty());
        assert_eq!(result.meeting.summary, "");
    }

    #[test]
    fn missing_goals_is_invalid() {
        let body = json!({ "meeting": { "id": 1, "title": "T" } });
        let err = parse_result(&body).unwrap_err();
        assert!(matches!(err, GoalError::InvalidResult(ref m) if m.contains("goals")));
    }

    #[test]
    fn missing_meeting_is_invalid() {
        let body = json!({ "goals": [] });
        let err = parse_result(&body).unwrap_err();
        assert!(matches!(err, GoalError::InvalidResult(ref m) if m.contains("meeting")));
    }

    #[test]
    fn wrong_container_types_are_invalid() {
        let body = json!({ "meeting": [], "goals": [] });
        assert!(matches!(parse_result(&body), Err(GoalError::InvalidResult(_))));
        let body = json!({ "meeting": { "id": 1, "title": "T" }, "goals": {} });
        assert!(matches!(parse_result(&body), Err(GoalError::InvalidResult(_))));
    }

    #[test]
    fn error_detail_is_surfaced() {
        let body = json!({ "detail": "OpenAI API key not found" });
        let err = parse_result(&body).unwrap_err();
        assert!(err.to_string().contains("OpenAI API key not found"));
    }

    #[test]
    fn unknown_priority_is_a_shape_error() {
        let body = json!({
            "meeting": { "id": 1, "title": "T" },
            "goals": [{ "id": 1, "name": "G", "priority": "Urgent", "assignees": [] }]
        });
        let err = parse_result(&body).unwrap_err();
        assert!(matches!(err, GoalError::InvalidResult(ref m) if m.contains("index 0")));
    }

    #[test]
    fn non_json_text_is_invalid() {
        assert!(matches!(
            parse_result_str("<html>502</html>"),
            Err(GoalError::InvalidResult(_))
        ));
    }
}
