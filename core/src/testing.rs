//! Test doubles shared by the unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::client::ApiClient;
use crate::config::ApiConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::screens::Ui;
use crate::session::Session;
use crate::transport::Transport;

#[derive(Default)]
struct Script {
    replies: VecDeque<Result<HttpResponse, String>>,
    requests: Vec<HttpRequest>,
}

/// Replays queued responses in order and records every request.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Arc<Mutex<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .replies
            .push_back(Ok(HttpResponse::new(status, body)));
        self
    }

    pub fn fail(self, reason: &str) -> Self {
        self.script
            .lock()
            .unwrap()
            .replies
            .push_back(Err(reason.to_string()));
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.script.lock().unwrap().requests.clone()
    }

    pub fn last_body(&self) -> serde_json::Value {
        let requests = self.requests();
        let body = requests.last().and_then(|r| r.body.clone()).expect("request body");
        serde_json::from_str(&body).unwrap()
    }
}

impl Transport for ScriptedTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let mut script = self.script.lock().unwrap();
        script.requests.push(request.clone());
        match script.replies.pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(reason)) => Err(ApiError::Transport(reason)),
            None => panic!("unexpected request: {} {}", request.method, request.url),
        }
    }
}

pub fn client(transport: &ScriptedTransport) -> ApiClient {
    ApiClient::new(
        &ApiConfig::from_domain("http://localhost:5000"),
        Session::in_memory(),
        transport.clone(),
    )
}

/// Records notifications and navigation.
#[derive(Debug, Default)]
pub struct RecordingUi {
    pub location: String,
    pub successes: Vec<String>,
    pub errors: Vec<String>,
    pub navigations: Vec<String>,
}

impl RecordingUi {
    pub fn at(location: &str) -> Self {
        Self {
            location: location.to_string(),
            ..Self::default()
        }
    }
}

impl Ui for RecordingUi {
    fn notify_success(&mut self, message: &str) {
        self.successes.push(message.to_string());
    }

    fn notify_error(&mut self, message: &str) {
        self.errors.push(message.to_string());
    }

    fn location(&self) -> &str {
        &self.location
    }

    fn navigate(&mut self, path: &str) {
        self.navigations.push(path.to_string());
        self.location = path.to_string();
    }
}
