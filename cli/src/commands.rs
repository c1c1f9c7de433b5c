//! One console action per invocation.
//!
//! Each command places the terminal `Ui` on the screen it belongs to, runs
//! the matching controller, persists whatever flow state the controller
//! left behind, and prints listings to `out`. The return value tells the
//! binary whether the action succeeded: the controller said so and no error
//! was reported along the way.

use std::io::Write;

use anyhow::Result;
use console_core::screens::{
    ensure_authenticated, CategoryManagement, ForgotPasswordFlow, LoginFlow, ResetStep,
    ServiceManagement, Ui, UserManagement, ADMIN_PATH, FORGOT_PASSWORD_PATH, LOGIN_PATH,
};
use console_core::types::{RegisterRequest, RoleRef};
use console_core::{ApiClient, Category, CategoryInput, Id, Role, Service, ServiceInput, User};
use tracing::debug;

use crate::cli::{CategoryCommand, Command, NewService, ServiceChanges, ServiceCommand, UserCommand};
use crate::store::StateDir;
use crate::terminal::TerminalUi;

pub struct Console {
    api: ApiClient,
    state: StateDir,
    ui: TerminalUi,
    out: Box<dyn Write>,
}

impl Console {
    pub fn new(api: ApiClient, state: StateDir, ui: TerminalUi, out: Box<dyn Write>) -> Self {
        Self { api, state, ui, out }
    }

    pub fn execute(&mut self, command: Command) -> Result<bool> {
        debug!(state_dir = %self.state.root().display(), "running command");
        let ok = match command {
            Command::Login { phone, password } => {
                self.ui.enter(LOGIN_PATH);
                LoginFlow::new().login(&phone, &password, &self.api, &mut self.ui)
            }
            Command::Register {
                email,
                password,
                full_name,
                phone,
            } => {
                self.ui.enter(LOGIN_PATH);
                let request = RegisterRequest {
                    email,
                    password,
                    full_name,
                    number_phone: phone,
                };
                let mut flow = LoginFlow::new();
                let ok = flow.register(&request, &self.api, &mut self.ui);
                if ok {
                    self.state.set_registration(flow.pending())?;
                }
                ok
            }
            Command::Verify { otp } => {
                self.ui.enter(LOGIN_PATH);
                let mut flow = LoginFlow::resume(self.state.registration()?);
                let ok = flow.verify_otp(&otp, &self.api, &mut self.ui);
                self.state.set_registration(flow.pending())?;
                ok
            }
            Command::CancelRegistration => {
                self.ui.enter(LOGIN_PATH);
                let mut flow = LoginFlow::resume(self.state.registration()?);
                flow.cancel_registration();
                self.state.set_registration(flow.pending())?;
                self.ui.notify_success("Registration cancelled");
                true
            }
            Command::Logout => {
                self.ui.enter(LOGIN_PATH);
                let mut flow = LoginFlow::resume(self.state.registration()?);
                let ok = flow.logout(&self.api, &mut self.ui);
                self.state.clear_flows()?;
                ok
            }
            Command::ForgotPassword { email } => {
                self.ui.enter(FORGOT_PASSWORD_PATH);
                let mut flow = ForgotPasswordFlow::new();
                let ok = flow.send_otp(&email, &self.api, &mut self.ui);
                self.state.set_password_reset(flow.step())?;
                ok
            }
            Command::VerifyResetOtp { otp } => {
                self.ui.enter(FORGOT_PASSWORD_PATH);
                let mut flow = self.reset_flow()?;
                let ok = flow.verify_otp(&otp, &self.api, &mut self.ui);
                self.state.set_password_reset(flow.step())?;
                ok
            }
            Command::ResetPassword { new_password } => {
                self.ui.enter(FORGOT_PASSWORD_PATH);
                let mut flow = self.reset_flow()?;
                let ok = flow.reset_password(&new_password, &self.api, &mut self.ui);
                self.state.set_password_reset(flow.step())?;
                ok
            }
            Command::Users(command) => self.guarded(|console| console.users(command))?,
            Command::Categories(command) => self.guarded(|console| console.categories(command))?,
            Command::Services(command) => self.guarded(|console| console.services(command))?,
        };
        Ok(ok && !self.ui.failed())
    }

    fn reset_flow(&self) -> Result<ForgotPasswordFlow> {
        let step = self.state.password_reset()?.unwrap_or(ResetStep::Email);
        Ok(ForgotPasswordFlow::resume(step))
    }

    /// Run an admin screen action, or bounce to login without a credential.
    fn guarded(&mut self, action: impl FnOnce(&mut Self) -> Result<bool>) -> Result<bool> {
        self.ui.enter(ADMIN_PATH);
        if !ensure_authenticated(self.api.session(), &mut self.ui) {
            return Ok(false);
        }
        action(self)
    }

    fn users(&mut self, command: UserCommand) -> Result<bool> {
        let mut screen = UserManagement::new();
        let ok = match command {
            UserCommand::List => {
                let ok = screen.refresh(&self.api, &mut self.ui);
                if ok {
                    print_users(&mut self.out, screen.users())?;
                }
                ok
            }
            UserCommand::Update {
                id,
                full_name,
                email,
                phone,
                role,
            } => {
                if !screen.refresh(&self.api, &mut self.ui) {
                    return Ok(false);
                }
                let Some(current) = screen.start_edit(&Id::from(id.as_str())).cloned() else {
                    self.ui.notify_error(&format!("no user with id {id}"));
                    return Ok(false);
                };
                let mut edited = current;
                if let Some(full_name) = full_name {
                    edited.full_name = full_name;
                }
                if let Some(email) = email {
                    edited.email = email;
                }
                if let Some(phone) = phone {
                    edited.phone_number = Some(phone);
                }
                if let Some(role) = role {
                    edited.role_id = Some(RoleRef::Id(Role::from(role).id().into()));
                }
                screen.update(&edited, &self.api, &mut self.ui)
            }
            UserCommand::Toggle { id } => {
                screen.refresh(&self.api, &mut self.ui)
                    && screen.toggle_status(&Id::from(id.as_str()), &self.api, &mut self.ui)
            }
            UserCommand::Delete { id } => screen.delete(&Id::from(id.as_str()), &self.api, &mut self.ui),
        };
        Ok(ok)
    }

    fn categories(&mut self, command: CategoryCommand) -> Result<bool> {
        let mut screen = CategoryManagement::new();
        let ok = match command {
            CategoryCommand::List => {
                let ok = screen.refresh(&self.api, &mut self.ui);
                if ok {
                    print_categories(&mut self.out, screen.categories())?;
                }
                ok
            }
            CategoryCommand::Create { name, description } => {
                screen.create(&CategoryInput { name, description }, &self.api, &mut self.ui)
            }
            CategoryCommand::Update { id, name, description } => {
                if !screen.refresh(&self.api, &mut self.ui) {
                    return Ok(false);
                }
                let id = Id::from(id.as_str());
                let Some(current) = screen.list().get(&id) else {
                    self.ui.notify_error(&format!("no category with id {id}"));
                    return Ok(false);
                };
                let input = CategoryInput {
                    name: name.unwrap_or_else(|| current.name.clone()),
                    description: description.unwrap_or_else(|| current.description.clone()),
                };
                screen.update(&id, &input, &self.api, &mut self.ui)
            }
            CategoryCommand::Delete { id } => screen.delete(&Id::from(id.as_str()), &self.api, &mut self.ui),
        };
        Ok(ok)
    }

    fn services(&mut self, command: ServiceCommand) -> Result<bool> {
        let mut screen = ServiceManagement::new();
        let ok = match command {
            ServiceCommand::List => {
                let ok = screen.refresh(&self.api, &mut self.ui);
                if ok {
                    print_services(&mut self.out, screen.services())?;
                }
                ok
            }
            ServiceCommand::View { id } => {
                if !screen.refresh(&self.api, &mut self.ui) {
                    return Ok(false);
                }
                match screen.view(&Id::from(id.as_str())) {
                    Some(service) => {
                        print_service(&mut self.out, service)?;
                        true
                    }
                    None => {
                        self.ui.notify_error(&format!("no service with id {id}"));
                        false
                    }
                }
            }
            ServiceCommand::Create(new) => screen.create(&new_service(new), &self.api, &mut self.ui),
            ServiceCommand::Update { id, changes } => {
                if !screen.refresh(&self.api, &mut self.ui) {
                    return Ok(false);
                }
                let id = Id::from(id.as_str());
                let Some(current) = screen.list().get(&id) else {
                    self.ui.notify_error(&format!("no service with id {id}"));
                    return Ok(false);
                };
                let input = apply_changes(current, changes);
                screen.update(&id, &input, &self.api, &mut self.ui)
            }
            ServiceCommand::Delete { id } => screen.delete(&Id::from(id.as_str()), &self.api, &mut self.ui),
        };
        Ok(ok)
    }
}

fn new_service(new: NewService) -> ServiceInput {
    ServiceInput {
        name: new.name,
        description: new.description,
        duration: new.duration,
        price: new.price,
        category_id: new.category.map(Id::new),
        is_active: !new.inactive,
    }
}

fn apply_changes(current: &Service, changes: ServiceChanges) -> ServiceInput {
    ServiceInput {
        name: changes.name.unwrap_or_else(|| current.name.clone()),
        description: changes.description.unwrap_or_else(|| current.description.clone()),
        duration: changes.duration.or(current.duration),
        price: changes.price.unwrap_or(current.price),
        category_id: changes.category.map(Id::new).or_else(|| current.category_id.clone()),
        is_active: changes.active.unwrap_or(current.is_active),
    }
}

fn status(is_active: bool) -> &'static str {
    if is_active {
        "active"
    } else {
        "inactive"
    }
}

fn print_users(out: &mut dyn Write, users: &[User]) -> Result<()> {
    if users.is_empty() {
        writeln!(out, "No users.")?;
        return Ok(());
    }
    writeln!(out, "{:<6} {:<24} {:<28} {:<14} {:<6} STATUS", "ID", "NAME", "EMAIL", "PHONE", "ROLE")?;
    for user in users {
        writeln!(
            out,
            "{:<6} {:<24} {:<28} {:<14} {:<6} {}",
            user.id,
            user.full_name,
            user.email,
            user.phone_number.as_deref().unwrap_or("-"),
            user.role().label(),
            status(user.is_active)
        )?;
    }
    Ok(())
}

fn print_categories(out: &mut dyn Write, categories: &[Category]) -> Result<()> {
    if categories.is_empty() {
        writeln!(out, "No categories.")?;
        return Ok(());
    }
    writeln!(out, "{:<6} {:<24} {:<6} DESCRIPTION", "ID", "NAME", "ITEMS")?;
    for category in categories {
        let items = category.item_count.map(|n| n.to_string()).unwrap_or_else(|| "-".into());
        writeln!(
            out,
            "{:<6} {:<24} {:<6} {}",
            category.id, category.name, items, category.description
        )?;
    }
    Ok(())
}

fn print_services(out: &mut dyn Write, services: &[Service]) -> Result<()> {
    if services.is_empty() {
        writeln!(out, "No services.")?;
        return Ok(());
    }
    writeln!(out, "{:<6} {:<24} {:>12} {:<8} {:<9} STATUS", "ID", "NAME", "PRICE", "MINUTES", "CATEGORY")?;
    for service in services {
        writeln!(
            out,
            "{:<6} {:<24} {:>12} {:<8} {:<9} {}",
            service.id,
            service.name,
            service.price,
            service.duration.map(|d| d.to_string()).unwrap_or_else(|| "-".into()),
            service.category_id.as_ref().map(Id::to_string).unwrap_or_else(|| "-".into()),
            status(service.is_active)
        )?;
    }
    Ok(())
}

fn print_service(out: &mut dyn Write, service: &Service) -> Result<()> {
    writeln!(out, "id:          {}", service.id)?;
    writeln!(out, "name:        {}", service.name)?;
    writeln!(out, "description: {}", service.description)?;
    writeln!(out, "price:       {}", service.price)?;
    if let Some(duration) = service.duration {
        writeln!(out, "duration:    {duration} min")?;
    }
    if let Some(category) = &service.category_id {
        writeln!(out, "category:    {category}")?;
    }
    writeln!(out, "status:      {}", status(service.is_active))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::collections::VecDeque;
    use std::io;
    use std::sync::{Arc, Mutex};

    use console_core::{
        ApiConfig, ApiError, HttpRequest, HttpResponse, MemoryStore, PendingRegistration, Session, Transport,
    };
    use tempfile::TempDir;

    use super::*;

    /// Answers requests in order from a fixed list.
    struct Canned(Mutex<VecDeque<(u16, &'static str)>>);

    impl Transport for Canned {
        fn execute(&self, _request: &HttpRequest) -> Result<HttpResponse, ApiError> {
            let (status, body) = self.0.lock().unwrap().pop_front().unwrap_or((500, ""));
            Ok(HttpResponse {
                status,
                headers: Vec::new(),
                body: body.to_string(),
            })
        }
    }

    fn console(dir: &TempDir, replies: Vec<(u16, &'static str)>) -> Console {
        let session = Session::new(Arc::new(MemoryStore::new()));
        session.set_token("tok-1").unwrap();
        let api = ApiClient::new(
            &ApiConfig::from_domain("http://localhost:5000"),
            session,
            Canned(Mutex::new(replies.into())),
        );
        let ui = TerminalUi::with_writer(ADMIN_PATH, Box::new(io::sink()));
        Console::new(api, StateDir::new(dir.path()), ui, Box::new(io::sink()))
    }

    #[test]
    fn reported_errors_fail_the_command() {
        let dir = TempDir::new().unwrap();
        let mut console = console(&dir, vec![(201, r#"{"message":"created"}"#), (500, r#"{"message":"db down"}"#)]);
        let command = Command::Categories(CategoryCommand::Create {
            name: "Garden".into(),
            description: String::new(),
        });
        assert!(!console.execute(command).unwrap());
    }

    #[test]
    fn cancel_registration_forgets_the_pending_account() {
        let dir = TempDir::new().unwrap();
        let state = StateDir::new(dir.path());
        state
            .set_registration(Some(&PendingRegistration {
                email: "lan@example.com".into(),
                phone: "0900000001".into(),
            }))
            .unwrap();

        let mut console = console(&dir, Vec::new());
        assert!(console.execute(Command::CancelRegistration).unwrap());
        assert!(state.registration().unwrap().is_none());
    }

    fn service() -> Service {
        Service {
            id: Id::from(9),
            name: "Cleaning".into(),
            description: "Flat".into(),
            duration: Some(120),
            price: 200000.0,
            category_id: Some(Id::from(7)),
            is_active: true,
        }
    }

    #[test]
    fn omitted_changes_keep_current_values() {
        let changes = ServiceChanges {
            name: None,
            description: None,
            duration: None,
            price: Some(250000.0),
            category: None,
            active: Some(false),
        };
        let input = apply_changes(&service(), changes);
        assert_eq!(input.name, "Cleaning");
        assert_eq!(input.duration, Some(120));
        assert_eq!(input.price, 250000.0);
        assert_eq!(input.category_id, Some(Id::from(7)));
        assert!(!input.is_active);
    }

    #[test]
    fn service_details_skip_missing_fields() {
        let mut service = service();
        service.duration = None;
        service.category_id = None;
        let mut out = Vec::new();
        print_service(&mut out, &service).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("name:        Cleaning"));
        assert!(!text.contains("duration"));
        assert!(!text.contains("category"));
    }

    #[test]
    fn empty_listings_say_so() {
        let mut out = Vec::new();
        print_categories(&mut out, &[]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "No categories.\n");
    }
}
