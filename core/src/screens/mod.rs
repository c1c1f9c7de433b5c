//! Screen controllers: local state, reconciliation, and user feedback.
//!
//! # Design
//! Controllers own their state and talk to the outside world through `Ui`
//! (notifications and navigation). Every failure is caught at the action
//! that caused it and passed to `handle_failure`, the one place that turns
//! an `Unauthorized` error into a redirect to the login screen. Mutations
//! hit the server first and touch local state only on success.

mod categories;
mod forgot_password;
mod list;
mod login;
mod services;
mod users;

pub use categories::CategoryManagement;
pub use forgot_password::{ForgotPasswordFlow, ResetStep};
pub use list::{ListScreen, ListState, Record};
pub use login::LoginFlow;
pub use services::ServiceManagement;
pub use users::UserManagement;

use tracing::info;

use crate::error::ApiError;
use crate::session::Session;

pub const LOGIN_PATH: &str = "/login";
pub const ADMIN_PATH: &str = "/admin";
pub const FORGOT_PASSWORD_PATH: &str = "/forgot-password";

/// Notifications and navigation, provided by the host.
pub trait Ui {
    fn notify_success(&mut self, message: &str);
    fn notify_error(&mut self, message: &str);
    fn location(&self) -> &str;
    fn navigate(&mut self, path: &str);
}

/// Report a failed action. Auth failures also send the user to the login
/// screen unless they are already there.
pub fn handle_failure(ui: &mut dyn Ui, error: &ApiError) {
    ui.notify_error(&error.to_string());
    if error.is_auth_failure() && ui.location() != LOGIN_PATH {
        info!("session rejected, redirecting to login");
        ui.navigate(LOGIN_PATH);
    }
}

/// Route guard for protected screens.
pub fn ensure_authenticated(session: &Session, ui: &mut dyn Ui) -> bool {
    if session.is_authenticated() {
        return true;
    }
    if ui.location() != LOGIN_PATH {
        ui.navigate(LOGIN_PATH);
    }
    false
}

/// Six ASCII digits.
pub(crate) fn check_otp(otp: &str) -> Result<&str, ApiError> {
    let otp = otp.trim();
    if otp.len() == 6 && otp.bytes().all(|b| b.is_ascii_digit()) {
        Ok(otp)
    } else {
        Err(ApiError::InvalidOtp)
    }
}
