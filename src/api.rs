use std::sync::Arc;

use chrono::{DateTime, FixedOffset};

use crate::clients::{ClientRepository, RestClientRepository};
use crate::error::{RequestError, TogglError};
use crate::models::{Client, Project, TimeEntry, Workspace};
use crate::projects::{ProjectRepository, RestProjectRepository};
use crate::time_entries::{RestTimeEntryRepository, TimeEntryRepository};
use crate::toggl::{RestRequester, TogglRestClient};
use crate::workspaces::{RestWorkspaceRepository, WorkspaceRepository};

/// Everything the Toggl API offers through this crate.
pub trait TogglApiClient:
    WorkspaceRepository + ClientRepository + ProjectRepository + TimeEntryRepository
{
}

impl<T> TogglApiClient for T where
    T: WorkspaceRepository + ClientRepository + ProjectRepository + TimeEntryRepository
{
}

/// One handle over the four repositories, all sharing a single transport.
#[derive(Clone)]
pub struct TogglApi {
    workspaces: RestWorkspaceRepository,
    clients: RestClientRepository,
    projects: RestProjectRepository,
    time_entries: RestTimeEntryRepository,
}

impl TogglApi {
    pub fn new(base_url: &str, token: &str) -> Result<Self, RequestError> {
        Ok(Self::from_client(TogglRestClient::new(base_url, token)?))
    }

    pub fn from_client(client: TogglRestClient) -> Self {
        Self::with_requester(Arc::new(client))
    }

    pub fn with_requester(requester: Arc<dyn RestRequester>) -> Self {
        Self {
            workspaces: RestWorkspaceRepository::new(Arc::clone(&requester)),
            clients: RestClientRepository::new(Arc::clone(&requester)),
            projects: RestProjectRepository::new(Arc::clone(&requester)),
            time_entries: RestTimeEntryRepository::new(requester),
        }
    }

    pub fn workspaces(&self) -> &RestWorkspaceRepository {
        &self.workspaces
    }

    pub fn clients(&self) -> &RestClientRepository {
        &self.clients
    }

    pub fn projects(&self) -> &RestProjectRepository {
        &self.projects
    }

    pub fn time_entries(&self) -> &RestTimeEntryRepository {
        &self.time_entries
    }
}

impl WorkspaceRepository for TogglApi {
    fn fetch_workspaces(&self) -> Result<Vec<Workspace>, TogglError> {
        self.workspaces.fetch_workspaces()
    }
}

impl ClientRepository for TogglApi {
    fn create_client(&self, client: &Client) -> Result<Client, TogglError> {
        self.clients.create_client(client)
    }

    fn fetch_clients(&self) -> Result<Vec<Client>, TogglError> {
        self.clients.fetch_clients()
    }
}

impl ProjectRepository for TogglApi {
    fn create_project(&self, project: &Project) -> Result<Project, TogglError> {
        self.projects.create_project(project)
    }

    fn fetch_projects(&self, workspace_id: u64) -> Result<Vec<Project>, TogglError> {
        self.projects.fetch_projects(workspace_id)
    }
}

impl TimeEntryRepository for TogglApi {
    fn create_time_entry(&self, time_entry: &TimeEntry) -> Result<TimeEntry, TogglError> {
        self.time_entries.create_time_entry(time_entry)
    }

    fn fetch_time_entries(
        &self,
        start: DateTime<FixedOffset>,
        end: DateTime<FixedOffset>,
    ) -> Result<Vec<TimeEntry>, TogglError> {
        self.time_entries.fetch_time_entries(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::toggl::testing::StubRequester;
    use reqwest::Method;

    fn list_everything(api: &dyn TogglApiClient) -> Result<usize, TogglError> {
        let mut total = api.fetch_workspaces()?.len();
        total += api.fetch_clients()?.len();
        total += api.fetch_projects(1)?.len();
        Ok(total)
    }

    #[test]
    fn new_builds_api() {
        assert!(TogglApi::new("http://api.example.com", "sakldjaksljkl312312").is_ok());
    }

    #[test]
    fn repositories_share_one_requester() {
        let stub = StubRequester::returning("[]");
        let api = TogglApi::with_requester(stub.clone());
        assert_eq!(list_everything(&api).unwrap(), 0);

        let routes: Vec<_> = stub.calls().into_iter().map(|call| (call.method, call.route)).collect();
        assert_eq!(
            routes,
            vec![
                (Method::GET, "workspaces".to_string()),
                (Method::GET, "clients".to_string()),
                (Method::GET, "workspaces/1/projects".to_string()),
            ]
        );
    }

    #[test]
    fn errors_pass_through_unchanged() {
        let api = TogglApi::with_requester(StubRequester::failing());
        let err = api.create_client(&Client::default()).unwrap_err();
        assert_eq!(err.operation(), "failed to create client");
        let err = api.create_time_entry(&TimeEntry::default()).unwrap_err();
        assert_eq!(err.operation(), "failed to create time entry");
    }
}
