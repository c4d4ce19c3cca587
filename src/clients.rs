use std::sync::Arc;

use reqwest::Method;
use serde::Serialize;

use crate::error::{RequestError, TogglError};
use crate::models::Client;
use crate::repository::{decode_created, decode_list, encode, send};
use crate::toggl::{RestRequester, TogglRestClient};

pub trait ClientRepository {
    fn create_client(&self, client: &Client) -> Result<Client, TogglError>;

    fn fetch_clients(&self) -> Result<Vec<Client>, TogglError>;
}

#[derive(Serialize)]
struct CreateClientRequest<'a> {
    client: &'a Client,
}

#[derive(Clone)]
pub struct RestClientRepository {
    requester: Arc<dyn RestRequester>,
}

impl RestClientRepository {
    pub fn new(requester: Arc<dyn RestRequester>) -> Self {
        Self { requester }
    }

    pub fn connect(base_url: &str, token: &str) -> Result<Self, RequestError> {
        Ok(Self::new(Arc::new(TogglRestClient::new(base_url, token)?)))
    }
}

impl ClientRepository for RestClientRepository {
    fn create_client(&self, client: &Client) -> Result<Client, TogglError> {
        let body = encode(&CreateClientRequest { client }, "failed to serialize the client")?;
        let content = send(
            self.requester.as_ref(),
            Method::POST,
            "clients",
            Some(body),
            "failed to create client",
        )?;
        decode_created(&content, "failed to deserialize the created client")
    }

    fn fetch_clients(&self) -> Result<Vec<Client>, TogglError> {
        let content = send(
            self.requester.as_ref(),
            Method::GET,
            "clients",
            None,
            "failed to retrieve clients",
        )?;
        decode_list(&content, "failed to deserialize the clients")
    }
}
