//! Client for the Toggl time tracking REST API.
//!
//! Workspaces, clients, projects and time entries are reached through one
//! repository each. [`TogglApi`] bundles all four over a shared
//! [`TogglRestClient`]:
//!
//! ```no_run
//! use togglapi::{TogglApi, WorkspaceRepository};
//!
//! let api = TogglApi::new("https://www.toggl.com/api/v8", "your-api-token")?;
//! for workspace in api.fetch_workspaces()? {
//!     println!("{}", workspace.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod api;
pub mod clients;
pub mod dates;
pub mod error;
pub mod models;
pub mod projects;
mod repository;
pub mod time_entries;
pub mod toggl;
pub mod workspaces;

pub use api::{TogglApi, TogglApiClient};
pub use clients::{ClientRepository, RestClientRepository};
pub use dates::{DateError, format_timestamp, parse_timestamp};
pub use error::{RequestError, TogglError};
pub use models::{Client, Project, TimeEntry, Workspace};
pub use projects::{ProjectRepository, RestProjectRepository};
pub use reqwest::Method;
pub use time_entries::{CLIENT_NAME, RestTimeEntryRepository, TimeEntryRepository};
pub use toggl::{DEFAULT_BASE_URL, RestRequester, TogglRestClient, TogglRestClientBuilder};
pub use workspaces::{RestWorkspaceRepository, WorkspaceRepository};
