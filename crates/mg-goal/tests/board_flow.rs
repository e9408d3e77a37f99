// board_flow.rs — End-to-end test of one editing session.
//
// Walks the path a user takes through the board:
//
//   1. The extraction service answers with a meeting and goals
//   2. The response is ingested; views get an `ingested` event
//   3. Goals, subtasks and dependency edges are edited
//   4. A cycle-closing edge is rejected without touching state
//   5. A goal is removed and its incoming edges are cleaned up
//   6. The board is saved and restored from the session file
//
// VERIFY:
//   - Snapshot right after ingest equals the service response
//   - Every successful edit produced exactly one event, in order
//   - No goal references a missing goal at the end
//   - The restored board equals the saved one

use std::fs;

use serde_json::json;
use tempfile::tempdir;

use mg_goal::{
    parse_result, AssigneeInput, BoardConfig, EventDispatcher, GoalError, GoalGraphStore,
    GoalUpdate, LogSink, MemorySink, SessionFile,
};

fn service_response() -> serde_json::Value {
    json!({
        "meeting": {
            "id": 31,
            "title": "Website relaunch",
            "date": "2024-06-12",
            "summary": "Agreed on scope and owners for the relaunch."
        },
        "goals": [
            {
                "id": 1,
                "name": "Finalize design",
                "description": "Sign off on the new layout",
                "priority": "High",
                "assignees": ["Maya"],
                "subtasks": [{ "id": 1, "name": "Review mockups" }],
                "dependencies": [],
                "meeting_id": 31
            },
            {
                "id": 2,
                "name": "Build pages",
                "description": "Implement the approved layout",
                "priority": "Medium",
                "assignees": ["Leo", "Maya"],
                "subtasks": [],
                "dependencies": [1],
                "meeting_id": 31
            },
            {
                "id": 3,
                "name": "Launch",
                "description": "Switch DNS",
                "priority": "Low",
                "assignees": ["Ivan"],
                "subtasks": [],
                "dependencies": [2],
                "meeting_id": 31
            }
        ]
    })
}

#[test]
fn full_editing_session() {
    let project = tempdir().unwrap();
    let config = BoardConfig::for_project(project.path());

    // =========================================================
    // 1–2. Ingest the service response
    // =========================================================

    let views = MemorySink::new();
    let mut dispatcher = EventDispatcher::new();
    dispatcher.add_sink(Box::new(views.clone()));
    dispatcher.add_sink(Box::new(LogSink::new(&config.events_log)));
    let mut store = GoalGraphStore::new().with_dispatcher(dispatcher);

    let response = service_response();
    store.ingest_value(&response).unwrap();

    let expected = parse_result(&response).unwrap();
    assert_eq!(store.snapshot(), Some(expected));
    assert_eq!(store.all_assignees(), vec!["Maya", "Leo", "Ivan"]);

    // =========================================================
    // 3. Edit goals, subtasks and edges
    // =========================================================

    let qa = store
        .add_goal(config.settings().unwrap().new_goal())
        .unwrap();
    assert_eq!(qa.id, 4);

    store
        .update_goal(
            qa.id,
            GoalUpdate {
                name: Some("QA pass".to_string()),
                priority: Some("High".to_string()),
                assignees: Some(AssigneeInput::Raw("Leo, Ivan".to_string())),
                ..Default::default()
            },
        )
        .unwrap();

    let step = store.add_subtask(1).unwrap();
    assert_eq!(step.id, 2);
    store.update_subtask(1, step.id, "Collect feedback").unwrap();

    store.add_dependency(qa.id, 2).unwrap();
    store.add_dependency(3, qa.id).unwrap();

    let duplicate = store.add_dependency(3, qa.id).unwrap_err();
    assert!(duplicate.is_soft());

    // =========================================================
    // 4. Cycle-closing edge is rejected
    // =========================================================

    let before = store.snapshot();
    let err = store.add_dependency(1, 3).unwrap_err();
    assert!(matches!(err, GoalError::CircularDependency { .. }));
    assert_eq!(store.snapshot(), before);

    assert_eq!(store.execution_order().unwrap(), vec![1, 2, 4, 3]);

    // =========================================================
    // 5. Remove a goal that others depend on
    // =========================================================

    store.remove_goal(2).unwrap();
    for goal in store.goals() {
        for dep in &goal.dependencies {
            assert!(store.goal(*dep).is_some(), "goal {} has dangling {}", goal.id, dep);
        }
    }
    assert!(store.dependencies_of(qa.id).is_empty());
    assert!(store.integrity_issues().is_empty());

    let types: Vec<String> = views
        .drain()
        .iter()
        .map(|e| e.event_type().to_string())
        .collect();
    assert_eq!(
        types,
        vec![
            "ingested",
            "goal_added",
            "goal_updated",
            "subtask_added",
            "subtask_updated",
            "dependency_added",
            "dependency_added",
            "goal_removed",
        ]
    );
    let logged = fs::read_to_string(&config.events_log).unwrap();
    assert_eq!(logged.lines().count(), types.len());

    // =========================================================
    // 6. Save and restore
    // =========================================================

    let session = SessionFile::new(&config.session_file);
    session.persist(&store).unwrap();

    let mut reopened = GoalGraphStore::new();
    assert!(session.restore(&mut reopened).unwrap());
    assert_eq!(reopened.snapshot(), store.snapshot());
    assert_eq!(reopened.goal(4).unwrap().assignees, vec!["Leo", "Ivan"]);
}

#[test]
fn failed_submission_keeps_previous_board() {
    let mut store = GoalGraphStore::new();
    store.ingest_value(&service_response()).unwrap();
    let before = store.snapshot();

    let err = store
        .ingest_value(&json!({ "detail": "Error generating goals: timeout" }))
        .unwrap_err();
    assert!(matches!(err, GoalError::InvalidResult(_)));
    assert_eq!(store.snapshot(), before);
}
