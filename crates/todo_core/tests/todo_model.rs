use chrono::{TimeZone, Utc};
use todo_core::{
    DueDate, ImplementationDate, Memo, Priority, Status, Title, Todo, TodoId, TodoInput,
    TodoOutput,
};

fn stored_todo() -> Todo {
    Todo::reconstitute(
        TodoId::new(42).unwrap(),
        Title::new("Write plan").unwrap(),
        ImplementationDate::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 30, 0).unwrap()).unwrap(),
        DueDate::new(Utc.with_ymd_and_hms(2024, 3, 8, 18, 0, 0).unwrap()).unwrap(),
        Status::Doing,
        Priority::High,
        Memo::new("draft first").unwrap(),
    )
}

#[test]
fn uncreated_todo_starts_as_todo_without_id() {
    let at = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
    let todo = Todo::uncreated(
        Title::new("Buy milk").unwrap(),
        ImplementationDate::new(at).unwrap(),
        DueDate::new(at).unwrap(),
        Priority::Medium,
        Memo::new("").unwrap(),
    );

    assert_eq!(todo.id(), None);
    assert_eq!(todo.status(), Status::Todo);
    assert_eq!(todo.priority(), Priority::Medium);
    assert_eq!(todo.title().value(), "Buy milk");
}

#[test]
fn reconstituted_todo_keeps_every_field() {
    let todo = stored_todo();

    assert_eq!(todo.id().map(TodoId::value), Some(42));
    assert_eq!(todo.status(), Status::Doing);
    assert_eq!(todo.priority(), Priority::High);
    assert_eq!(todo.memo().value(), "draft first");
}

#[test]
fn output_projection_round_trips_into_equal_aggregate() {
    let todo = stored_todo();
    let output = TodoOutput::from(&todo);
    let rebuilt = Todo::try_from(&output).unwrap();

    assert_eq!(rebuilt, todo);
}

#[test]
fn output_serializes_with_expected_wire_fields() {
    let output = TodoOutput::from(&stored_todo());
    let json = serde_json::to_value(&output).unwrap();

    assert_eq!(json["id"], 42);
    assert_eq!(json["title"], "Write plan");
    assert_eq!(json["implementationDate"], "2024-03-01T10:30:00Z");
    assert_eq!(json["dueDate"], "2024-03-08T18:00:00Z");
    assert_eq!(json["statusID"], 2);
    assert_eq!(json["priorityID"], 4);
    assert_eq!(json["memo"], "draft first");
}

#[test]
fn input_defaults_missing_optional_fields() {
    let input: TodoInput = serde_json::from_value(serde_json::json!({
        "title": "Buy milk",
        "implementationDate": "2024-01-01T00:00:00Z",
        "dueDate": "2024-01-05T00:00:00+09:00",
        "priorityID": 2
    }))
    .unwrap();

    assert_eq!(input.id, 0);
    assert_eq!(input.status_id, 0);
    assert_eq!(input.memo, "");
    assert_eq!(
        input.due_date,
        Utc.with_ymd_and_hms(2024, 1, 4, 15, 0, 0).unwrap()
    );
}

#[test]
fn input_requires_dates() {
    let result = serde_json::from_value::<TodoInput>(serde_json::json!({
        "title": "Buy milk",
        "priorityID": 2
    }));
    assert!(result.is_err());
}
