use serde_json::Value;

use super::require_id;
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{Id, ToggleStatus, UpdateUser};

/// `/admin-user/*` endpoints.
pub struct AdminUserApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AdminUserApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    pub fn list(&self) -> Result<Value, ApiError> {
        self.client.call(HttpMethod::Get, "/admin-user/get-admin")
    }

    pub fn update(&self, id: &Id, payload: &UpdateUser) -> Result<Value, ApiError> {
        let path = format!("/admin-user/update-admin/{}", require_id(id)?);
        self.client.call_json(HttpMethod::Put, &path, payload)
    }

    pub fn delete(&self, id: &Id) -> Result<Value, ApiError> {
        let path = format!("/admin-user/delete-admin/{}", require_id(id)?);
        self.client.call(HttpMethod::Delete, &path)
    }

    /// Set the active flag. The desired state is always sent; the server is
    /// never asked to infer the flip.
    pub fn set_active(&self, id: &Id, is_active: bool) -> Result<Value, ApiError> {
        let path = format!("/admin-user/toggle-admin/{}", require_id(id)?);
        self.client
            .call_json(HttpMethod::Patch, &path, &ToggleStatus { is_active })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::error::ApiError;
    use crate::http::HttpMethod;
    use crate::testing::{client, ScriptedTransport};
    use crate::types::{Id, UpdateUser};

    #[test]
    fn list_is_a_plain_get() {
        let transport = ScriptedTransport::new().respond(200, "[]");
        client(&transport).admin_users().list().unwrap();
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Get);
        assert!(sent.url.ends_with("/admin-user/get-admin"));
        assert!(sent.body.is_none());
    }

    #[test]
    fn set_active_sends_explicit_state() {
        let transport = ScriptedTransport::new().respond(200, "{}");
        client(&transport)
            .admin_users()
            .set_active(&Id::from(12), false)
            .unwrap();
        let sent = &transport.requests()[0];
        assert_eq!(sent.method, HttpMethod::Patch);
        assert!(sent.url.ends_with("/admin-user/toggle-admin/12"));
        assert_eq!(transport.last_body(), json!({ "is_active": false }));
    }

    #[test]
    fn update_and_delete_interpolate_id() {
        let transport = ScriptedTransport::new().respond(200, "{}").respond(204, "");
        let client = client(&transport);
        let payload = UpdateUser {
            full_name: "Lan".into(),
            email: "lan@example.com".into(),
            phone_number: String::new(),
            role_id: 2,
            is_active: true,
        };
        client.admin_users().update(&Id::from(4), &payload).unwrap();
        client.admin_users().delete(&Id::from(4)).unwrap();

        let requests = transport.requests();
        assert_eq!(requests[0].method, HttpMethod::Put);
        assert!(requests[0].url.ends_with("/admin-user/update-admin/4"));
        assert_eq!(requests[1].method, HttpMethod::Delete);
        assert!(requests[1].url.ends_with("/admin-user/delete-admin/4"));
    }

    #[test]
    fn empty_id_is_rejected_without_a_request() {
        let transport = ScriptedTransport::new();
        let err = client(&transport).admin_users().delete(&Id::new("")).unwrap_err();
        assert!(matches!(err, ApiError::MissingId));
        assert!(transport.requests().is_empty());
    }
}
