use serde::{Deserialize, Serialize};

use super::{check_otp, handle_failure, Ui, LOGIN_PATH};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::types::extract_reset_token;

/// Where a password reset stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "step", rename_all = "snake_case")]
pub enum ResetStep {
    Email,
    Otp { email: String },
    Reset { email: String, reset_token: String },
    Done,
}

/// email → OTP → new password.
#[derive(Debug)]
pub struct ForgotPasswordFlow {
    step: ResetStep,
}

impl Default for ForgotPasswordFlow {
    fn default() -> Self {
        Self::new()
    }
}

impl ForgotPasswordFlow {
    pub fn new() -> Self {
        Self {
            step: ResetStep::Email,
        }
    }

    pub fn resume(step: ResetStep) -> Self {
        Self { step }
    }

    pub fn step(&self) -> &ResetStep {
        &self.step
    }

    pub fn send_otp(&mut self, email: &str, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.auth().forgot_password(email) {
            Ok(_) => {
                self.step = ResetStep::Otp {
                    email: email.to_string(),
                };
                ui.notify_success("An OTP has been sent to your email");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn verify_otp(&mut self, otp: &str, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match self.verify(otp, api) {
            Ok(next) => {
                self.step = next;
                ui.notify_success("OTP verified");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    fn verify(&self, otp: &str, api: &ApiClient) -> Result<ResetStep, ApiError> {
        let ResetStep::Otp { email } = &self.step else {
            return Err(ApiError::FlowState("request an OTP first"));
        };
        let otp = check_otp(otp)?;
        let response = api.auth().verify_reset_otp(email, otp)?;
        let reset_token = extract_reset_token(&response).ok_or(ApiError::MissingToken)?;
        Ok(ResetStep::Reset {
            email: email.clone(),
            reset_token,
        })
    }

    pub fn reset_password(&mut self, new_password: &str, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        let result = match &self.step {
            ResetStep::Reset { reset_token, .. } => api.auth().reset_password(reset_token, new_password),
            _ => Err(ApiError::FlowState("verify the OTP first")),
        };
        match result {
            Ok(_) => {
                self.step = ResetStep::Done;
                ui.notify_success("Password has been reset");
                ui.navigate(LOGIN_PATH);
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    /// Return to the email step.
    pub fn back(&mut self) {
        self.step = ResetStep::Email;
    }
}
