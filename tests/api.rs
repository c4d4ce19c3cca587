use chrono::{FixedOffset, TimeZone};
use mockito::{Matcher, Server};
use togglapi::{
    ClientRepository, ProjectRepository, TimeEntry, TimeEntryRepository, TogglApi, TogglError,
    WorkspaceRepository,
};

const TOKEN: &str = "sakldjaksljkl312312";

#[test]
fn lists_clients_in_order() {
    let mut server = Server::new();
    server
        .mock("GET", "/clients")
        .with_body(
            r#"[
  {"id": 1, "wid": 1, "name": "Client A", "notes": ""},
  {"id": 2, "wid": 1, "name": "Client B", "notes": "Yada Yada"}
]"#,
        )
        .create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let clients = api.fetch_clients().unwrap();

    let names: Vec<_> = clients.iter().map(|client| client.name.as_str()).collect();
    assert_eq!(names, ["Client A", "Client B"]);
}

#[test]
fn lists_projects_of_one_workspace() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/workspaces/7/projects")
        .with_body(r#"[{"id": 3, "wid": 7, "name": "Bugs", "at": "2016-09-06T09:32:06+00:00"}]"#)
        .create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let projects = api.fetch_projects(7).unwrap();

    mock.assert();
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0].wid, 7);
}

#[test]
fn lists_time_entries_for_the_requested_range() {
    let mut server = Server::new();
    let mock = server
        .mock("GET", "/time_entries")
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("start_date".to_string(), "2016-01-01T00:00:01-05:00".to_string()),
            Matcher::UrlEncoded("end_date".to_string(), "2016-06-30T23:59:59-05:00".to_string()),
        ]))
        .with_body(
            r#"[{"id": 1, "wid": 1, "pid": 1, "start": "2016-09-06T06:33:56+00:00", "stop": "2016-09-06T06:48:51+00:00", "duration": 895, "description": "Lorem Ipsum"}]"#,
        )
        .create();

    let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
    let start = new_york.with_ymd_and_hms(2016, 1, 1, 0, 0, 1).unwrap();
    let end = new_york.with_ymd_and_hms(2016, 6, 30, 23, 59, 59).unwrap();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let entries = api.fetch_time_entries(start, end).unwrap();

    mock.assert();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].duration, Some(895));
}

#[test]
fn creates_time_entry_from_wrapped_response() {
    let mut server = Server::new();
    let mock = server
        .mock("POST", "/time_entries")
        .match_body(Matcher::PartialJsonString(
            r#"{"wid": 1, "description": "Lorem Ipsum", "created_with": "togglapi"}"#.to_string(),
        ))
        .with_body(r#"{"data": {"id": 42, "wid": 1, "description": "Lorem Ipsum", "duration": 900}}"#)
        .create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let entry = TimeEntry {
        wid: 1,
        description: "Lorem Ipsum".to_string(),
        duration: Some(900),
        ..TimeEntry::default()
    };
    let created = api.create_time_entry(&entry).unwrap();

    mock.assert();
    assert_eq!(created.id, 42);
    assert_eq!(created.duration, Some(900));
}

#[test]
fn rejected_create_surfaces_service_error() {
    let mut server = Server::new();
    server
        .mock("POST", "/projects")
        .with_status(400)
        .with_body("Workspace ID must be present")
        .create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let err = api.create_project(&Default::default()).unwrap_err();

    assert!(matches!(err, TogglError::Request { .. }));
    assert_eq!(err.status(), Some(400));
    let message = err.to_string();
    assert!(message.starts_with("failed to create project: the POST request against"));
    assert!(message.contains("Workspace ID must be present"));
}

#[test]
fn unauthorized_listing_fails_without_records() {
    let mut server = Server::new();
    server.mock("GET", "/workspaces").with_status(403).create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let result = api.fetch_workspaces();

    let err = result.unwrap_err();
    assert_eq!(err.status(), Some(403));
    assert_eq!(err.operation(), "failed to retrieve workspaces");
}

#[test]
fn empty_success_body_on_list_is_a_deserialization_error() {
    let mut server = Server::new();
    server.mock("GET", "/clients").with_status(200).create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let err = api.fetch_clients().unwrap_err();

    assert!(err.is_deserialization());
}

#[test]
fn wrapped_create_response_with_invalid_entry_is_a_deserialization_error() {
    let mut server = Server::new();
    server
        .mock("POST", "/time_entries")
        .with_body(r#"{"data": {"id": 1, "start": "2016-09-06 06:33:56"}}"#)
        .create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let err = api.create_time_entry(&TimeEntry::default()).unwrap_err();

    assert!(err.is_deserialization());
    assert_eq!(err.operation(), "failed to deserialize the created time entry");
}

#[test]
fn empty_success_body_on_create_is_a_deserialization_error() {
    let mut server = Server::new();
    server.mock("POST", "/time_entries").with_status(200).create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();
    let err = api.create_time_entry(&TimeEntry::default()).unwrap_err();

    assert!(err.is_deserialization());
}

#[test]
fn array_responses_are_not_read_as_records() {
    let mut server = Server::new();
    server.mock("POST", "/clients").with_body(r#"[5, 7, "X"]"#).create();
    server.mock("GET", "/clients").with_body(r#"[[5, 7, "X"]]"#).create();

    let api = TogglApi::new(&server.url(), TOKEN).unwrap();

    assert!(api.create_client(&Default::default()).unwrap_err().is_deserialization());
    assert!(api.fetch_clients().unwrap_err().is_deserialization());
}
