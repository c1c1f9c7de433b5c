use super::{handle_failure, ListScreen, Ui};
use crate::client::ApiClient;
use crate::envelope::decode_record;
use crate::types::{Category, CategoryInput, Id};

/// The category management screen.
#[derive(Debug, Default)]
pub struct CategoryManagement {
    list: ListScreen<Category>,
}

impl CategoryManagement {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn list(&self) -> &ListScreen<Category> {
        &self.list
    }

    pub fn categories(&self) -> &[Category] {
        self.list.items()
    }

    pub fn refresh(&mut self, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        self.list.begin_loading();
        let result = api.categories().list();
        self.list.settle(result, ui)
    }

    /// Create a category. The returned record is appended; if the server
    /// does not echo one back the list is fetched again. A failed reload
    /// returns `false` even though the category now exists.
    pub fn create(&mut self, input: &CategoryInput, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.categories().create(input) {
            Ok(response) => {
                let reloaded = match decode_record::<Category>(response, "category") {
                    Some(created) => {
                        self.list.push(created);
                        true
                    }
                    None => self.refresh(api, ui),
                };
                if reloaded {
                    ui.notify_success("Category created");
                } else {
                    ui.notify_success("Category created, but the list could not be reloaded");
                }
                reloaded
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn update(&mut self, id: &Id, input: &CategoryInput, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.categories().update(id, input) {
            Ok(_) => {
                self.list.patch(id, |category| {
                    category.name = input.name.clone();
                    category.description = input.description.clone();
                });
                ui.notify_success("Category updated");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }

    pub fn delete(&mut self, id: &Id, api: &ApiClient, ui: &mut dyn Ui) -> bool {
        match api.categories().delete(id) {
            Ok(_) => {
                self.list.remove(id);
                ui.notify_success("Category deleted");
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::screens::ADMIN_PATH;
    use crate::testing::{client, RecordingUi, ScriptedTransport};

    const CATEGORIES: &str = r#"[
        {"id":"3","name":"Home","description":"Household","itemCount":67},
        {"id":"7","name":"Electronics","description":"Devices","itemCount":45}
    ]"#;

    fn loaded(transport: &ScriptedTransport) -> (CategoryManagement, ApiClient, RecordingUi) {
        let api = client(transport);
        let mut ui = RecordingUi::at(ADMIN_PATH);
        let mut screen = CategoryManagement::new();
        assert!(screen.refresh(&api, &mut ui));
        (screen, api, ui)
    }

    fn ids(screen: &CategoryManagement) -> Vec<&str> {
        screen.categories().iter().map(|c| c.id.as_str()).collect()
    }

    #[test]
    fn delete_with_empty_response_removes_row() {
        let transport = ScriptedTransport::new().respond(200, CATEGORIES).respond(204, "");
        let (mut screen, api, mut ui) = loaded(&transport);
        assert!(screen.delete(&Id::from("7"), &api, &mut ui));
        assert_eq!(ids(&screen), vec!["3"]);
        assert_eq!(ui.successes, vec!["Category deleted"]);
    }

    #[test]
    fn delete_not_found_keeps_row_and_shows_message() {
        let transport = ScriptedTransport::new()
            .respond(200, CATEGORIES)
            .respond(404, r#"{"message":"not found"}"#);
        let (mut screen, api, mut ui) = loaded(&transport);
        assert!(!screen.delete(&Id::from("7"), &api, &mut ui));
        assert_eq!(ids(&screen), vec!["3", "7"]);
        assert_eq!(ui.errors, vec!["not found"]);
        assert!(ui.successes.is_empty());
        assert!(ui.navigations.is_empty());
    }

    #[test]
    fn create_appends_returned_record() {
        let transport = ScriptedTransport::new()
            .respond(200, CATEGORIES)
            .respond(201, r#"{"message":"created","data":{"id":9,"name":"Garden","description":""}}"#);
        let (mut screen, api, mut ui) = loaded(&transport);
        let input = CategoryInput {
            name: "Garden".into(),
            description: String::new(),
        };
        assert!(screen.create(&input, &api, &mut ui));
        assert_eq!(ids(&screen), vec!["3", "7", "9"]);
        assert_eq!(transport.requests().len(), 2);
    }

    #[test]
    fn create_without_record_refetches() {
        let transport = ScriptedTransport::new()
            .respond(200, "[]")
            .respond(201, r#"{"message":"created"}"#)
            .respond(200, r#"{"data":[{"id":1,"name":"Garden"}]}"#);
        let (mut screen, api, mut ui) = loaded(&transport);
        let input = CategoryInput {
            name: "Garden".into(),
            description: String::new(),
        };
        assert!(screen.create(&input, &api, &mut ui));
        assert_eq!(ids(&screen), vec!["1"]);
        assert_eq!(transport.requests().len(), 3);
    }

    #[test]
    fn update_patches_name_and_description() {
        let transport = ScriptedTransport::new().respond(200, CATEGORIES).respond(200, "");
        let (mut screen, api, mut ui) = loaded(&transport);
        let input = CategoryInput {
            name: "Household".into(),
            description: "Things for the home".into(),
        };
        assert!(screen.update(&Id::from("3"), &input, &api, &mut ui));
        let row = screen.list().get(&Id::from("3")).unwrap();
        assert_eq!(row.name, "Household");
        assert_eq!(row.item_count, Some(67));
    }

    #[test]
    fn create_reports_a_failed_reload() {
        let transport = ScriptedTransport::new()
            .respond(200, CATEGORIES)
            .respond(201, r#"{"message":"created"}"#)
            .respond(500, r#"{"message":"db down"}"#);
        let (mut screen, api, mut ui) = loaded(&transport);
        let input = CategoryInput {
            name: "Garden".into(),
            description: String::new(),
        };
        assert!(!screen.create(&input, &api, &mut ui));
        assert_eq!(ids(&screen), vec!["3", "7"]);
        assert_eq!(ui.errors, vec!["db down"]);
        assert_eq!(ui.successes, vec!["Category created, but the list could not be reloaded"]);
    }
}
