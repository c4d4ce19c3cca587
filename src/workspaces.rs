use std::sync::Arc;

use reqwest::Method;

use crate::error::{RequestError, TogglError};
use crate::models::Workspace;
use crate::repository::{decode_list, send};
use crate::toggl::{RestRequester, TogglRestClient};

pub trait WorkspaceRepository {
    /// All workspaces visible to the current user.
    fn fetch_workspaces(&self) -> Result<Vec<Workspace>, TogglError>;
}

#[derive(Clone)]
pub struct RestWorkspaceRepository {
    requester: Arc<dyn RestRequester>,
}

impl RestWorkspaceRepository {
    pub fn new(requester: Arc<dyn RestRequester>) -> Self {
        Self { requester }
    }

    pub fn connect(base_url: &str, token: &str) -> Result<Self, RequestError> {
        Ok(Self::new(Arc::new(TogglRestClient::new(base_url, token)?)))
    }
}

impl WorkspaceRepository for RestWorkspaceRepository {
    fn fetch_workspaces(&self) -> Result<Vec<Workspace>, TogglError> {
        let content = send(
            self.requester.as_ref(),
            Method::GET,
            "workspaces",
            None,
            "failed to retrieve workspaces",
        )?;
        decode_list(&content, "failed to deserialize the workspaces")
    }
}
