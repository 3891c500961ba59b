use chrono::{TimeZone, Utc};
use std::collections::BTreeMap;
use taskboard_core::{Board, BoardValidationError, Column, Task, TaskPatch, TaskQuery};

fn fixed_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap()
}

fn board_with(columns: Vec<Column>, tasks: Vec<Task>) -> Board {
    Board {
        tasks: tasks
            .into_iter()
            .map(|task| (task.id.clone(), task))
            .collect::<BTreeMap<_, _>>(),
        columns,
    }
}

#[test]
fn default_board_has_three_empty_columns() {
    let board = Board::default_board();

    let ids: Vec<&str> = board.columns.iter().map(|c| c.id.as_str()).collect();
    let titles: Vec<&str> = board.columns.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(ids, ["todo", "in-progress", "done"]);
    assert_eq!(titles, ["To Do", "In Progress", "Done"]);
    assert!(board.columns.iter().all(Column::is_empty));
    assert_eq!(board.task_count(), 0);
    assert!(board.validate().is_ok());
}

#[test]
fn task_serialization_uses_expected_wire_fields() {
    let task = Task::with_id("t1", "todo", "Draft outline", "first draft", fixed_time());

    let json = serde_json::to_value(&task).unwrap();
    assert_eq!(json["id"], "t1");
    assert_eq!(json["title"], "Draft outline");
    assert_eq!(json["description"], "first draft");
    assert_eq!(json["status"], "todo");
    assert_eq!(json["createdAt"], "2024-05-01T09:30:00Z");

    let decoded: Task = serde_json::from_value(json).unwrap();
    assert_eq!(decoded, task);
}

#[test]
fn column_serializes_task_ids_in_camel_case() {
    let mut column = Column::with_id("todo", "To Do");
    column.task_ids.push("t1".to_string());

    let json = serde_json::to_value(&column).unwrap();
    assert_eq!(json["taskIds"][0], "t1");
    assert!(json.get("task_ids").is_none());
}

#[test]
fn new_entities_get_distinct_generated_ids() {
    let a = Task::new("todo", "a", "");
    let b = Task::new("todo", "b", "");
    assert_ne!(a.id, b.id);
    assert_ne!(Column::new("x").id, Column::new("x").id);
}

#[test]
fn merged_patch_keeps_identity_and_creation_time() {
    let task = Task::with_id("t1", "todo", "old", "body", fixed_time());
    let patch = TaskPatch::new().with_title("new").with_status("done");

    let merged = task.merged(&patch);
    assert_eq!(merged.id, "t1");
    assert_eq!(merged.created_at, fixed_time());
    assert_eq!(merged.title, "new");
    assert_eq!(merged.description, "body");
    assert_eq!(merged.status, "done");
    assert!(TaskPatch::new().is_empty());
    assert!(!patch.is_empty());
}

#[test]
fn column_tasks_follow_column_order() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids = vec!["b".to_string(), "a".to_string()];
    let board = board_with(
        vec![todo],
        vec![
            Task::with_id("a", "todo", "A", "", fixed_time()),
            Task::with_id("b", "todo", "B", "", fixed_time()),
        ],
    );

    let titles: Vec<&str> = board
        .column_tasks("todo")
        .iter()
        .map(|task| task.title.as_str())
        .collect();
    assert_eq!(titles, ["B", "A"]);
    assert!(board.column_tasks("missing").is_empty());
    assert_eq!(board.column_of("a").unwrap().id, "todo");
}

#[test]
fn validate_rejects_dangling_reference() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids.push("ghost".to_string());
    let board = board_with(vec![todo], vec![]);

    let err = board.validate().unwrap_err();
    assert_eq!(
        err,
        BoardValidationError::DanglingTaskRef {
            column_id: "todo".to_string(),
            task_id: "ghost".to_string(),
        }
    );
}

#[test]
fn validate_rejects_task_listed_twice() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids.push("t1".to_string());
    let mut done = Column::with_id("done", "Done");
    done.task_ids.push("t1".to_string());
    let board = board_with(
        vec![todo, done],
        vec![Task::with_id("t1", "todo", "T", "", fixed_time())],
    );

    assert_eq!(
        board.validate().unwrap_err(),
        BoardValidationError::DuplicateMembership("t1".to_string())
    );
}

#[test]
fn validate_rejects_status_mismatch_and_orphans() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids.push("t1".to_string());
    let mismatched = board_with(
        vec![todo, Column::with_id("done", "Done")],
        vec![Task::with_id("t1", "done", "T", "", fixed_time())],
    );
    assert!(matches!(
        mismatched.validate().unwrap_err(),
        BoardValidationError::StatusMismatch { listed_in: Some(ref c), .. } if c == "todo"
    ));

    let orphan = board_with(
        vec![Column::with_id("todo", "To Do")],
        vec![Task::with_id("t2", "gone", "T", "", fixed_time())],
    );
    assert!(matches!(
        orphan.validate().unwrap_err(),
        BoardValidationError::StatusMismatch { listed_in: None, .. }
    ));
}

#[test]
fn validate_rejects_duplicate_columns() {
    let board = board_with(
        vec![
            Column::with_id("todo", "To Do"),
            Column::with_id("todo", "Again"),
        ],
        vec![],
    );
    assert_eq!(
        board.validate().unwrap_err(),
        BoardValidationError::DuplicateColumn("todo".to_string())
    );
}

#[test]
fn search_matches_title_or_description_case_insensitively() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids = vec!["a".to_string(), "b".to_string()];
    let mut done = Column::with_id("done", "Done");
    done.task_ids = vec!["c".to_string()];
    let board = board_with(
        vec![todo, done],
        vec![
            Task::with_id("a", "todo", "Fix login", "", fixed_time()),
            Task::with_id("b", "todo", "Docs", "mention LOGIN flow", fixed_time()),
            Task::with_id("c", "done", "Login copy", "", fixed_time()),
        ],
    );

    let ids: Vec<&str> = board
        .search(&TaskQuery::text("login"))
        .iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(ids, ["a", "b", "c"]);

    let done_only: Vec<&str> = board
        .search(&TaskQuery::text("LOGIN").in_column("done"))
        .iter()
        .map(|task| task.id.as_str())
        .collect();
    assert_eq!(done_only, ["c"]);

    assert_eq!(board.search(&TaskQuery::text("  ")).len(), 3);
    assert!(board.search(&TaskQuery::text("nothing")).is_empty());
}

#[test]
fn repair_rehomes_tasks_to_their_status_column() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids = vec!["a".to_string(), "b".to_string(), "ghost".to_string()];
    let mut done = Column::with_id("done", "Done");
    done.task_ids = vec!["c".to_string(), "b".to_string()];
    let mut board = board_with(
        vec![todo, done],
        vec![
            Task::with_id("a", "done", "A", "", fixed_time()),
            Task::with_id("b", "todo", "B", "", fixed_time()),
            Task::with_id("c", "done", "C", "", fixed_time()),
        ],
    );

    assert!(board.repair() > 0);
    assert!(board.validate().is_ok());
    assert_eq!(board.column("todo").unwrap().task_ids, ["b"]);
    assert_eq!(board.column("done").unwrap().task_ids, ["c", "a"]);
    assert_eq!(board.task_count(), 3);
}

#[test]
fn repair_adopts_listing_column_for_unknown_status() {
    let mut todo = Column::with_id("todo", "To Do");
    todo.task_ids.push("a".to_string());
    let mut board = board_with(
        vec![todo, Column::with_id("todo", "Shadow")],
        vec![
            Task::with_id("a", "archived", "A", "", fixed_time()),
            Task::with_id("b", "archived", "B", "", fixed_time()),
        ],
    );

    board.repair();
    assert!(board.validate().is_ok());
    assert_eq!(board.columns.len(), 1);
    assert_eq!(board.task("a").unwrap().status, "todo");
    assert_eq!(board.task("b").unwrap().status, "todo");
    assert_eq!(board.column("todo").unwrap().task_ids, ["a", "b"]);
}

#[test]
fn repair_drops_unplaceable_tasks_and_leaves_valid_boards_alone() {
    let mut empty = board_with(vec![], vec![Task::with_id("a", "todo", "A", "", fixed_time())]);
    assert_eq!(empty.repair(), 1);
    assert_eq!(empty.task_count(), 0);

    let mut valid = Board::default_board();
    assert_eq!(valid.repair(), 0);
    assert_eq!(valid, Board::default_board());
}
