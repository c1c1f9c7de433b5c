use serde::de::DeserializeOwned;
use serde_json::Value;

use super::{handle_failure, Ui};
use crate::envelope::decode_list;
use crate::error::ApiError;
use crate::types::{Category, Id, Service, User};

/// A list row with an identifier.
pub trait Record: DeserializeOwned + Clone {
    /// Key used when the list arrives wrapped, e.g. `users`.
    const RESOURCE: &'static str;

    fn id(&self) -> &Id;
}

impl Record for User {
    const RESOURCE: &'static str = "users";

    fn id(&self) -> &Id {
        &self.id
    }
}

impl Record for Category {
    const RESOURCE: &'static str = "categories";

    fn id(&self) -> &Id {
        &self.id
    }
}

impl Record for Service {
    const RESOURCE: &'static str = "services";

    fn id(&self) -> &Id {
        &self.id
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum ListState<T> {
    Loading,
    Loaded(Vec<T>),
    Empty,
}

/// Rows of one management screen.
#[derive(Debug, Clone)]
pub struct ListScreen<T> {
    state: ListState<T>,
}

impl<T: Record> Default for ListScreen<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Record> ListScreen<T> {
    pub fn new() -> Self {
        Self {
            state: ListState::Loading,
        }
    }

    pub fn state(&self) -> &ListState<T> {
        &self.state
    }

    pub fn items(&self) -> &[T] {
        match &self.state {
            ListState::Loaded(items) => items,
            ListState::Loading | ListState::Empty => &[],
        }
    }

    pub fn get(&self, id: &Id) -> Option<&T> {
        self.items().iter().find(|item| item.id() == id)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ListState::Loading)
    }

    /// Replace the rows with a normalized list response.
    pub fn load(&mut self, response: Value) {
        self.set_items(decode_list(response, T::RESOURCE));
    }

    /// Settle a fetch result. A failed fetch notifies and keeps whatever rows
    /// were already shown; with none it settles on `Empty`.
    pub fn settle(&mut self, result: Result<Value, ApiError>, ui: &mut dyn Ui) -> bool {
        match result {
            Ok(response) => {
                self.load(response);
                true
            }
            Err(e) => {
                handle_failure(ui, &e);
                if !matches!(self.state, ListState::Loaded(_)) {
                    self.state = ListState::Empty;
                }
                false
            }
        }
    }

    pub fn begin_loading(&mut self) {
        if !matches!(self.state, ListState::Loaded(_)) {
            self.state = ListState::Loading;
        }
    }

    pub fn push(&mut self, item: T) {
        let mut items = self.take_items();
        items.push(item);
        self.set_items(items);
    }

    /// Apply `patch` to the row with `id`. Returns whether a row matched.
    pub fn patch(&mut self, id: &Id, patch: impl FnOnce(&mut T)) -> bool {
        if let ListState::Loaded(items) = &mut self.state {
            if let Some(item) = items.iter_mut().find(|item| item.id() == id) {
                patch(item);
                return true;
            }
        }
        false
    }

    pub fn remove(&mut self, id: &Id) -> Option<T> {
        let mut items = self.take_items();
        let position = items.iter().position(|item| item.id() == id);
        let removed = position.map(|index| items.remove(index));
        self.set_items(items);
        removed
    }

    fn take_items(&mut self) -> Vec<T> {
        match std::mem::replace(&mut self.state, ListState::Empty) {
            ListState::Loaded(items) => items,
            ListState::Loading | ListState::Empty => Vec::new(),
        }
    }

    fn set_items(&mut self, items: Vec<T>) {
        self.state = if items.is_empty() {
            ListState::Empty
        } else {
            ListState::Loaded(items)
        };
    }
}
