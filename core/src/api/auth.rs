use serde_json::Value;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::http::HttpMethod;
use crate::types::{
    ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest, VerifyRequest,
    VerifyResetOtpRequest,
};

/// `/auth/*` endpoints.
pub struct AuthApi<'a> {
    client: &'a ApiClient,
}

impl<'a> AuthApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        Self { client }
    }

    /// Sign in with a phone number and password.
    pub fn login(&self, phone: &str, password: &str) -> Result<Value, ApiError> {
        let body = LoginRequest {
            number_phone: phone.to_string(),
            password: password.to_string(),
        };
        self.client.call_json(HttpMethod::Post, "/auth/login", &body)
    }

    pub fn register(&self, request: &RegisterRequest) -> Result<Value, ApiError> {
        self.client.call_json(HttpMethod::Post, "/auth/register", request)
    }

    /// Confirm a registration with the OTP sent to the user.
    pub fn verify(&self, phone: &str, otp: &str) -> Result<Value, ApiError> {
        let body = VerifyRequest {
            otp: otp.to_string(),
            number_phone: phone.to_string(),
        };
        self.client.call_json(HttpMethod::Post, "/auth/verify", &body)
    }

    pub fn forgot_password(&self, email: &str) -> Result<Value, ApiError> {
        let body = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.client.call_json(HttpMethod::Post, "/auth/forgot-password", &body)
    }

    pub fn verify_reset_otp(&self, email: &str, otp: &str) -> Result<Value, ApiError> {
        let body = VerifyResetOtpRequest {
            email: email.to_string(),
            otp: otp.to_string(),
        };
        self.client.call_json(HttpMethod::Post, "/auth/verify-reset-otp", &body)
    }

    pub fn reset_password(&self, reset_token: &str, new_password: &str) -> Result<Value, ApiError> {
        let body = ResetPasswordRequest {
            reset_token: reset_token.to_string(),
            new_password: new_password.to_string(),
        };
        self.client.call_json(HttpMethod::Post, "/auth/reset-password", &body)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::testing::{client, ScriptedTransport};
    use crate::types::RegisterRequest;

    #[test]
    fn login_posts_phone_and_password() {
        let transport = ScriptedTransport::new().respond(200, r#"{"access_token":"abc123"}"#);
        let client = client(&transport);
        let value = client.auth().login("0912345678", "secret1").unwrap();
        assert_eq!(value["access_token"], "abc123");

        let sent = &transport.requests()[0];
        assert_eq!(sent.url, "http://localhost:5000/api/v1/auth/login");
        assert_eq!(transport.last_body(), json!({ "numberPhone": "0912345678", "password": "secret1" }));
    }

    #[test]
    fn register_and_verify_bodies() {
        let transport = ScriptedTransport::new().respond(201, "").respond(200, "{}");
        let client = client(&transport);
        client
            .auth()
            .register(&RegisterRequest {
                email: "lan@example.com".into(),
                password: "secret1".into(),
                full_name: "Lan".into(),
                number_phone: "0900000001".into(),
            })
            .unwrap();
        client.auth().verify("0900000001", "123456").unwrap();

        let requests = transport.requests();
        let register: serde_json::Value = serde_json::from_str(requests[0].body.as_deref().unwrap()).unwrap();
        assert_eq!(register["full_name"], "Lan");
        assert_eq!(register["numberPhone"], "0900000001");
        assert!(requests[1].url.ends_with("/auth/verify"));
        assert_eq!(transport.last_body(), json!({ "otp": "123456", "numberPhone": "0900000001" }));
    }

    #[test]
    fn password_reset_endpoints() {
        let transport = ScriptedTransport::new()
            .respond(200, "{}")
            .respond(200, r#"{"data":{"reset_token":"r1"}}"#)
            .respond(200, "{}");
        let client = client(&transport);
        client.auth().forgot_password("lan@example.com").unwrap();
        client.auth().verify_reset_otp("lan@example.com", "654321").unwrap();
        client.auth().reset_password("r1", "newpass").unwrap();

        let paths: Vec<String> = transport.requests().iter().map(|r| r.url.clone()).collect();
        assert!(paths[0].ends_with("/auth/forgot-password"));
        assert!(paths[1].ends_with("/auth/verify-reset-otp"));
        assert!(paths[2].ends_with("/auth/reset-password"));
        assert_eq!(transport.last_body(), json!({ "reset_token": "r1", "new_password": "newpass" }));
    }
}
