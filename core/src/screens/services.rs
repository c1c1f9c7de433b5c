use super::{handle_failure, ListScreen, Ui};
use crate::client::ApiClient;
use crate::envelope::decode_record;
use crate::types::{Id, Service, ServiceInput};

/// The service management screen.
#[derive(Debug, Default)]
pub struct ServiceManagement {
    list: ListScreen<Service>,
    viewing: Option<Id>,
}

impl ServiceManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &ListScreen<Service> {
        &self.list
    }

    pub fn services(&self) -> &[Service] {
        self.list.items()
    }

    pub fn refresh(&mut self, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        self.list.begin_loading();
        let result = api.services().list();
        self.list.settle(result, ui)
    }

    /// Open the detail view for a listed service.
    pub fn view(&mut self, id: &Id) -> Option<&Service> {
        self.viewing = self.list.get(id).map(|service| service.id.clone());
        self.viewing()
    }

    pub fn viewing(&self) -> Option<&Service> {
        self.viewing.as_ref().and_then(|id| self.list.get(id))
    }

    pub fn close_view(&mut self) {
        self.viewing = None;
    }

    pub fn create(&mut self, input: &ServiceInput, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.services().create(input) {
            Ok(response) => {
                let reloaded = match decode_record::<Service>(response, "service") {
                    Some(created) => {
                        self.list.push(created);
                        true
                    }
                    None => self.refresh(api, ui),
                };
                if reloaded {
                    ui.notify_success("Service created");
                } else {
                    ui.notify_success("Service created, but the list could not be reloaded");
                }
                reloaded
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn update(&mut self, id: &Id, input: &ServiceInput, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.services().update(id, input) {
            Ok(_) => {
                self.list.patch(id, |service| {
                    service.name = input.name.clone();
                    service.description = input.description.clone();
                    service.duration = input.duration;
                    service.price = input.price;
                    service.category_id = input.category_id.clone();
                    service.is_active = input.is_active;
                });
                ui.notify_success("Service updated");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn delete(&mut self, id: &Id, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.services().delete(id) {
            Ok(_) => {
                self.list.remove(id);
                if self.viewing.as_ref() == Some(id) {
                    self.viewing = None;
                }
                ui.notify_success("Service deleted");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }
}
