use serde_json::Value;

use super::require_id;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{CategoryInput, Id};

/// `/category/*` endpoints.
pub struct CategoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CategoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Value, ApiError> {
        self.client.call(HttpMethod::Get, "/category/get-all")
    }

    pub fn create(&self, input: &CategoryInput) -> Result<Value, ApiError> {
        self.client.call_json(HttpMethod::Post, "/category/create", input)
    }

    pub fn update(&self, id: &Id, input: &CategoryInput) -> Result<Value, ApiError> {
        let path = format!("/category/update/{}", require_id(id)?);
        self.client.call_json(HttpMethod::Put, &path, input)
    }

    pub fn delete(&self, id: &Id) -> Result<Value, ApiError> {
        let path = format!("/category/delete/{}", require_id(id)?);
        self.client.call(HttpMethod::Delete, &path)
    }
}
