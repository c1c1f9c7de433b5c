use serde_json::Value;

use super::require_id;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Id, ServiceInput};

/// `/service/*` endpoints.
pub struct ServiceApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ServiceApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Value, ApiError> {
        self.client.call(HttpMethod::Get, "/service/get-all")
    }

    pub fn create(&self, input: &ServiceInput) -> Result<Value, ApiError> {
        self.client.call_json(HttpMethod::Post, "/service/create", input)
    }

    pub fn update(&self, id: &Id, input: &ServiceInput) -> Result<Value, ApiError> {
        let path = format!("/service/update/{}", require_id(id)?);
        self.client.call_json(HttpMethod::Put, &path, input)
    }

    pub fn delete(&self, id: &Id) -> Result<Value, ApiError> {
        let path = format!("/service/delete/{}", require_id(id)?);
        self.client.call(HttpMethod::Delete, &path)
    }
}
