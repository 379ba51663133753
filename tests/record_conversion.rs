// Reading both stored task layouts and writing the structured one.
use chrono::NaiveDate;
use goteam::model::adapter::{
    ConversionError, RawTaskRecord, convert_tasks, location_from_record, location_to_record,
    task_to_record,
};
use goteam::model::{Contact, Location, Recurrence, Task, TaskLocation};
use goteam::remote::{RawRecord, RecordClass};
use serde_json::{Value, json};

fn record(value: Value) -> RawRecord {
    serde_json::from_value(value).unwrap()
}

fn day(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[test]
fn test_structured_record() {
    let raw = RawTaskRecord::classify(record(json!({
        "UserName": "alice",
        "taskID": "t1",
        "taskName": "Pay rent ",
        "taskNameWithAnnotations": "Pay rent *monthly ~Home",
        "taskDate": "2024-03-01T00:00:00+00:00",
        "taskFromDate": {"__type": "Date", "iso": "2024-02-25T10:00:00.000Z"},
        "taskPriority": 2,
        "taskReccurence": 3,
        "taskList": "bills",
        "taskLocation": {"locationID": "1,2", "latitude": 1.0, "longitude": 2.0, "title": "Home"},
        "taskContacts": [{"identifier": "c1", "name": "Ann"}, {"name": "Bob"}]
    })));
    assert!(matches!(raw, RawTaskRecord::Structured(_)));

    let task = raw.into_task().unwrap();
    assert_eq!(task.id(), "t1");
    assert_eq!(task.name, "Pay rent ");
    assert_eq!(task.name_with_annotations, "Pay rent *monthly ~Home");
    assert_eq!(task.date, day(2024, 3, 1));
    assert_eq!(task.from_date, day(2024, 2, 25));
    assert_eq!(task.priority, Some(2));
    assert_eq!(task.recurrence, Some(Recurrence::Monthly));
    assert_eq!(task.label.as_deref(), Some("bills"));
    assert_eq!(
        task.location,
        Some(TaskLocation::Inline(Location::new(1.0, 2.0).with_title("Home")))
    );
    assert_eq!(
        task.contacts,
        vec![Contact::new("c1", "Ann"), Contact::new("Bob", "Bob")]
    );
}

#[test]
fn test_flat_record_from_older_clients() {
    let raw = RawTaskRecord::classify(record(json!({
        "UserName": "alice",
        "taskID": {"__type": "Date", "iso": "2017-05-05T10:00:00.000Z"},
        "taskName": "Dinner",
        "taskDate": "2017-05-06",
        "taskLocation": "Luigi's",
        "taskSocialContact": "Carol"
    })));
    assert!(matches!(raw, RawTaskRecord::Flat(_)));

    let task = raw.into_task().unwrap();
    assert_eq!(task.id(), "2017-05-05T10:00:00.000Z");
    // No annotated text was stored; the plain name stands in.
    assert_eq!(task.name_with_annotations, "Dinner");
    assert_eq!(task.date, day(2017, 5, 6));
    assert_eq!(task.location, Some(TaskLocation::Reference("Luigi's".to_string())));
    assert_eq!(task.contacts, vec![Contact::new("Carol", "Carol")]);
}

#[test]
fn test_bad_fields_become_absent() {
    let task = RawTaskRecord::classify(record(json!({
        "taskID": 42,
        "taskName": null,
        "taskDate": "next tuesday",
        "taskPriority": 99,
        "taskReccurence": -1,
        "taskList": "   ",
        "taskLocation": {"title": null},
        "taskContacts": "not a list"
    })))
    .into_task()
    .unwrap();

    assert_eq!(task.id(), "42");
    assert_eq!(task.name, "");
    assert_eq!(task.date, None);
    assert_eq!(task.priority, None);
    assert_eq!(task.recurrence, None);
    assert_eq!(task.label, None);
    assert_eq!(task.location, None);
    assert!(task.contacts.is_empty());
}

#[test]
fn test_missing_id_is_the_only_rejection() {
    let err = RawTaskRecord::classify(record(json!({"taskName": "orphan"})))
        .into_task()
        .unwrap_err();
    assert_eq!(err, ConversionError::MissingId(RecordClass::Task));

    let tasks = convert_tasks(vec![
        record(json!({"taskName": "orphan"})),
        record(json!({"taskID": "ok"})),
    ]);
    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].id(), "ok");
}

#[test]
fn test_writes_use_the_structured_layout() {
    let mut task = Task::with_id("t9");
    task.name = "Dinner".to_string();
    task.name_with_annotations = "Dinner".to_string();
    task.date = day(2024, 3, 1);
    task.recurrence = Some(Recurrence::Yearly);
    task.location = Some(TaskLocation::Reference("Luigi's".to_string()));
    task.contacts = vec![Contact::new("Carol", "Carol")];

    let written = task_to_record(&task, "alice");
    assert_eq!(written.get_str("UserName"), Some("alice"));
    assert_eq!(written.get_str("taskDate"), Some("2024-03-01T00:00:00+00:00"));
    assert_eq!(written.get_i64("taskReccurence"), Some(4));
    assert!(!written.contains("taskSocialContact"));
    assert!(!written.contains("taskPriority"));
    assert_eq!(
        written.get_record("taskLocation").unwrap().get_str("locationID"),
        Some("Luigi's")
    );

    let read = RawTaskRecord::classify(written);
    assert!(matches!(read, RawTaskRecord::Structured(_)));
    let back = read.into_task().unwrap();
    assert_eq!(back.date, task.date);
    assert_eq!(back.recurrence, task.recurrence);
    assert_eq!(back.location, task.location);
    assert_eq!(back.contacts, task.contacts);
}

#[test]
fn test_location_records() {
    let location = Location::new(48.8584, 2.2945)
        .with_title("Eiffel Tower")
        .with_subtitle("Paris");
    let written = location_to_record(&location, "alice");
    assert_eq!(written.user(), Some("alice"));
    assert_eq!(written.id(RecordClass::Location).as_deref(), Some(location.id()));
    assert_eq!(location_from_record(&written).unwrap(), location);

    let stringly = record(json!({"latitude": "48.8584", "longitude": 2.2945}));
    assert_eq!(location_from_record(&stringly).unwrap().id(), location.id());

    let missing = record(json!({"title": "Nowhere", "latitude": 1.0}));
    assert_eq!(
        location_from_record(&missing),
        Err(ConversionError::MissingCoordinates)
    );
}
