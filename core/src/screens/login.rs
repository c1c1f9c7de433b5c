use tracing::info;

use super::{check_otp, handle_failure, Ui, ADMIN_PATH, LOGIN_PATH};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::session::PendingRegistration;
use crate::types::{extract_token, RegisterRequest};

/// Sign-in, registration and OTP verification.
#[derive(Debug, Default)]
pub struct LoginFlow {
    pending: Option<PendingRegistration>,
}

impl LoginFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Continue a registration started earlier in the session.
    pub fn resume(pending: Option<PendingRegistration>) -> Self {
        Self { pending }
    }

    pub fn pending(&self) -> Option<&PendingRegistration> {
        self.pending.as_ref()
    }

    pub fn awaiting_otp(&self) -> bool {
        self.pending.is_some()
    }

    pub fn login(&mut self, phone: &str, password: &str, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        let result = api
            .auth()
            .login(phone, password)
            .and_then(|response| store_token(api, &response));
        match result {
            Ok(()) => {
                info!("signed in");
                ui.notify_success("Signed in");
                ui.navigate(ADMIN_PATH);
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    /// Register and wait for the OTP sent by email.
    pub fn register(&mut self, request: &RegisterRequest, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.auth().register(request) {
            Ok(_) => {
                self.pending = Some(PendingRegistration {
                    email: request.email.clone(),
                    phone: request.number_phone.clone(),
                });
                ui.notify_success("Registered. Check your email for the OTP.");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn verify_otp(&mut self, otp: &str, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        let result = self.verify(otp, api);
        match result {
            Ok(()) => {
                self.pending = None;
                ui.notify_success("Account verified");
                ui.navigate(ADMIN_PATH);
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    fn verify(&self, otp: &str, api: &ApiClient) -> Result<(), ApiError> {
        let otp = check_otp(otp)?;
        let phone = self
            .pending
            .as_ref()
            .map(|pending| pending.phone.as_str())
            .ok_or(ApiError::FlowState("no registration is awaiting verification"))?;
        let response = api.auth().verify(phone, otp)?;
        store_token(api, &response)
    }

    /// Back to the registration form.
    pub fn cancel_registration(&mut self) {
        self.pending = None;
    }

    pub fn logout(&mut self, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        self.pending = None;
        match api.session().clear() {
            Ok(()) => {
                ui.notify_success("Signed out");
                if ui.location() != LOGIN_PATH {
                    ui.navigate(LOGIN_PATH);
                }
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }
}

fn store_token(api: &ApiClient, response: &serde_json::Value) -> Result<(), ApiError> {
    let token = extract_token(response).ok_or(ApiError::MissingToken)?;
    api.session().set_token(&token)
}
