use std::borrow::Cow;
use std::sync::Arc;

use chrono::{DateTime, FixedOffset};
use reqwest::Method;
use url::form_urlencoded;

use crate::dates::format_timestamp;
use crate::error::{RequestError, TogglError};
use crate::models::TimeEntry;
use crate::repository::{created_record, decode_list, encode, parse_json, send};
use crate::toggl::{RestRequester, TogglRestClient};

/// Application name reported to the service on created time entries.
pub const CLIENT_NAME: &str = "togglapi";

pub trait TimeEntryRepository {
    fn create_time_entry(&self, time_entry: &TimeEntry) -> Result<TimeEntry, TogglError>;

    /// Time entries started between `start` and `end`, both inclusive.
    fn fetch_time_entries(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeEntry>, TogglError>;
}

#[derive(Clone)]
pub struct RestTimeEntryRepository {
    requester: Arc<dyn RestRequester>,
}

impl RestTimeEntryRepository {
    pub fn new(requester: Arc<dyn RestRequester>) -> Self {
        Self { requester }
    }

    pub fn connect(base_url: &str, token: &str) -> Result<Self, RequestError> {
        Ok(Self::new(Arc::new(TogglRestClient::new(base_url, token)?)))
    }
}

impl TimeEntryRepository for RestTimeEntryRepository {
    fn create_time_entry(&self, time_entry: &TimeEntry) -> Result<TimeEntry, TogglError> {
        let time_entry = with_client_name(time_entry);
        let body = encode(&*time_entry, "failed to serialize the time entry")?;
        let content = send(
            self.requester.as_ref(),
            Method::POST,
            "time_entries",
            Some(body),
            "failed to create time entry",
        )?;
        decode_created_time_entry(&content)
    }

    fn fetch_time_entries(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeEntry>, TogglError> {
        let route = time_entries_route(&start, &end);
        let content = send(
            self.requester.as_ref(),
            Method::GET,
            &route,
            None,
            "failed to retrieve time entries",
        )?;
        decode_list(&content, "failed to deserialize the time entries")
    }
}

fn with_client_name(time_entry: &TimeEntry) -> Cow<'_, TimeEntry> {
    if time_entry.created_with.as_deref().is_some_and(|name| !name.is_empty()) {
        return Cow::Borrowed(time_entry);
    }
    let mut named = time_entry.clone();
    named.created_with = Some(CLIENT_NAME.to_string());
    Cow::Owned(named)
}

// Depending on the API version the created entry comes back bare or as
// `{"data": {...}}`.
fn decode_created_time_entry(content: &[u8]) -> Result<TimeEntry, TogglError> {
    const OPERATION: &str = "failed to deserialize the created time entry";
    let mut value = parse_json(content, OPERATION)?;
    if let Some(data) = value.as_object_mut().and_then(|object| object.remove("data")) {
        value = data;
    }
    created_record(value, OPERATION)
}

fn time_entries_route(start: &DateTime<FixedOffset>, end: &DateTime<FixedOffset>) -> String {
    let query = form_urlencoded::Serializer::new(String::new())
        .append_pair("start_date", &format_timestamp(start))
        .append_pair("end_date", &format_timestamp(end))
        .finish();
    format!("time_entries?{query}")
}
