use super::{handle_failure, ListScreen, Ui};
use crate::client::ApiClient;
use crate::types::{Id, RoleRef, UpdateUser, User};

/// The user management screen.
#[derive(Debug, Default)]
pub struct UserManagement {
    list: ListScreen<User>,
    editing: Option<User>,
}

impl UserManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &ListScreen<User> {
        &self.list
    }

    pub fn users(&self) -> &[User] {
        self.list.items()
    }

    pub fn editing(&self) -> Option<&User> {
        self.editing.as_ref()
    }

    pub fn refresh(&mut self, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        self.list.begin_loading();
        let result = api.admin_users().list();
        self.list.settle(result, ui)
    }

    /// Open the edit dialog for a listed user.
    pub fn start_edit(&mut self, id: &Id) -> Option<&User> {
        self.editing = self.list.get(id).cloned();
        self.editing.as_ref()
    }

    pub fn cancel_edit(&mut self) {
        self.editing = None;
    }

    /// Save an edited user and patch the row with what was sent.
    pub fn update(&mut self, edited: &User, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        let payload = UpdateUser::from(edited);
        match api.admin_users().update(&edited.id, &payload) {
            Ok(_) => {
                self.list.patch(&edited.id, |user| {
                    user.full_name = payload.full_name.clone();
                    user.email = payload.email.clone();
                    user.phone_number = Some(payload.phone_number.clone());
                    user.role_id = Some(RoleRef::Id(u64::from(payload.role_id)));
                    user.is_active = payload.is_active;
                });
                self.editing = None;
                ui.notify_success("User updated");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    /// Flip a user's active flag, sending the new state explicitly.
    pub fn toggle_status(&mut self, id: &Id, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        let Some(current) = self.list.get(id).map(|user| user.is_active) else {
            ui.notify_error(&format!("user {id} is not listed"));
            return false;
        };
        match api.admin_users().set_active(id, !current) {
            Ok(_) => {
                self.list.patch(id, |user| user.is_active = !current);
                ui.notify_success("Status updated");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn delete(&mut self, id: &Id, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.admin_users().delete(id) {
            Ok(_) => {
                self.list.remove(id);
                if self.editing.as_ref().is_some_and(|user| &user.id == id) {
                    self.editing = None;
                }
                ui.notify_success("User deleted");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }
}
