use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use crate::error::{RequestError, TogglError};
use crate::models::Project;
use crate::repository::{decode_created, decode_list, encode, send};
use crate::toggl::{RestRequester, TogglRestClient};

pub trait ProjectRepository {
    fn create_project(&self, project: &Project) -> Result<Project, TogglError>;

    /// All projects of the given workspace.
    fn fetch_projects(&self, workspace_id: u64) -> Result<Vec<Project>, TogglError>;
}

#[derive(Serialize)]
struct CreateProjectRequest<'a> {
    project: &'a Project,
}

#[derive(Clone)]
pub struct RestProjectRepository {
    requester: Arc<dyn RestRequester>,
}

impl RestProjectRepository {
    pub fn new(requester: Arc<dyn RestRequester>) -> Self {
        Self { requester }
    }

    pub fn connect(base_url: &str, token: &str) -> Result<Self, RequestError> {
        Ok(Self::new(Arc::new(TogglRestClient::new(base_url, token)?)))
    }
}

impl ProjectRepository for RestProjectRepository {
    fn create_project(&self, project: &Project) -> Result<Project, TogglError> {
        let body = encode(&CreateProjectRequest { project }, "failed to serialize the project")?;
        let content = send(
            self.requester.as_ref(),
            Method::POST,
            "projects",
            Some(body),
            "failed to create project",
        )?;
        decode_created(&content, "failed to deserialize the created project")
    }

    fn fetch_projects(&self, workspace_id: u64) -> Result<Vec<Project>, TogglError> {
        let route = format!("workspaces/{}/projects", workspace_id);
        let content = send(
            self.requester.as_ref(),
            Method::GET,
            &route,
            None,
            "failed to retrieve projects",
        )?;
        decode_list(&content, "failed to deserialize the projects")
    }
}
