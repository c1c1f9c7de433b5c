//! Drive the console commands against the mock backend, one invocation at a
//! time, with state persisted in a temporary directory between them.

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use admin_console::cli::Args;
use admin_console::commands::Console;
use admin_console::store::StateDir;
use admin_console::terminal::TerminalUi;
use clap::Parser;
use console_core::screens::{ResetStep, LOGIN_PATH};
use console_core::{ApiClient, ApiConfig, Session, UreqTransport};
use mock_server::{ADMIN_EMAIL, ADMIN_PASSWORD, ADMIN_PHONE, MOCK_OTP};
use tempfile::TempDir;

#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl Write for Captured {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Captured {
    fn take(&self) -> String {
        let bytes = std::mem::take(&mut *self.0.lock().unwrap());
        String::from_utf8(bytes).unwrap()
    }
}

fn start_server() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            mock_server::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}

struct Harness {
    origin: String,
    state: TempDir,
    out: Captured,
    log: Captured,
}

impl Harness {
    fn new() -> Self {
        Self {
            origin: start_server(),
            state: TempDir::new().unwrap(),
            out: Captured::default(),
            log: Captured::default(),
        }
    }

    fn state_dir(&self) -> StateDir {
        StateDir::new(self.state.path())
    }

    /// One invocation: a fresh client reading credentials from disk.
    fn run(&self, argv: &[&str]) -> bool {
        let mut full = vec!["admin-console", "--api-url", self.origin.as_str()];
        full.extend_from_slice(argv);
        let args = Args::try_parse_from(full).unwrap();

        let state = self.state_dir();
        let session = Session::new(Arc::new(state.credentials()));
        let api = ApiClient::new(&ApiConfig::from_domain(&args.api_url), session, UreqTransport::new());
        let ui = TerminalUi::with_writer(LOGIN_PATH, Box::new(self.log.clone()));
        let mut console = Console::new(api, state, ui, Box::new(self.out.clone()));
        console.execute(args.command).unwrap()
    }
}

#[test]
fn catalogue_management_across_invocations() {
    let h = Harness::new();

    // Nothing works before signing in.
    assert!(!h.run(&["categories", "list"]));
    assert!(h.log.take().contains("admin-console login"));

    assert!(h.run(&["login", "--phone", ADMIN_PHONE, "--password", ADMIN_PASSWORD]));
    assert!(h.state.path().join("credentials.json").exists());

    assert!(h.run(&["categories", "create", "--name", "Home", "--description", "Household"]));
    assert!(h.run(&["categories", "list"]));
    let listing = h.out.take();
    assert!(listing.contains("Home"));
    assert!(listing.contains("Household"));

    // The mock allocates ids sequentially after the seeded admin.
    assert!(h.run(&["categories", "update", "2", "--name", "House"]));
    assert!(h.run(&["services", "create", "--name", "Cleaning", "--price", "200000", "--category", "2"]));
    assert!(h.run(&["services", "update", "3", "--duration", "90"]));
    assert!(h.run(&["services", "view", "3"]));
    let details = h.out.take();
    assert!(details.contains("duration:    90 min"));
    assert!(details.contains("category:    2"));

    assert!(h.run(&["categories", "list"]));
    let listing = h.out.take();
    let names: Vec<&str> = listing.lines().skip(1).filter_map(|line| line.split_whitespace().nth(1)).collect();
    assert_eq!(names, vec!["House"]);

    assert!(!h.run(&["services", "view", "42"]));
    assert!(h.log.take().contains("error: no service with id 42"));

    assert!(h.run(&["services", "delete", "3"]));
    assert!(h.run(&["categories", "delete", "2"]));
    assert!(!h.run(&["categories", "delete", "2"]));
    assert!(h.log.take().contains("error: not found"));

    assert!(h.run(&["logout"]));
    assert!(!h.state.path().join("credentials.json").exists());
    assert!(!h.run(&["services", "list"]));
}

#[test]
fn user_administration() {
    let h = Harness::new();
    assert!(h.run(&["register", "--email", "lan@example.com", "--password", "secret1", "--full-name", "Lan", "--phone", "0900000001"]));
    assert!(h.state_dir().registration().unwrap().is_some());
    assert!(h.run(&["verify", MOCK_OTP]));
    assert!(h.state_dir().registration().unwrap().is_none());

    // A customer is signed in but the backend refuses admin screens, which
    // drops the stored credential.
    assert!(!h.run(&["users", "list"]));
    assert!(h.log.take().contains("error: admin only"));
    assert!(!h.state.path().join("credentials.json").exists());

    assert!(h.run(&["login", "--phone", ADMIN_PHONE, "--password", ADMIN_PASSWORD]));
    assert!(h.run(&["users", "update", "2", "--role", "staff", "--full-name", "Lan Tran"]));
    assert!(h.run(&["users", "toggle", "2"]));
    assert!(h.run(&["users", "list"]));
    let listing = h.out.take();
    let row = listing.lines().find(|line| line.contains("Lan Tran")).unwrap();
    assert!(row.contains("Staff"));
    assert!(row.contains("inactive"));

    assert!(h.run(&["users", "delete", "2"]));
    assert!(!h.run(&["users", "update", "2", "--email", "x@example.com"]));
}

#[test]
fn password_reset_resumes_between_invocations() {
    let h = Harness::new();

    assert!(!h.run(&["reset-password", "--new-password", "brandnew"]));
    assert!(h.log.take().contains("verify the OTP first"));

    assert!(h.run(&["forgot-password", "--email", ADMIN_EMAIL]));
    assert!(matches!(h.state_dir().password_reset().unwrap(), Some(ResetStep::Otp { .. })));

    assert!(!h.run(&["verify-reset-otp", "12ab56"]));
    assert!(h.log.take().contains("enter all 6 digits of the OTP"));
    assert!(h.run(&["verify-reset-otp", MOCK_OTP]));
    assert!(matches!(h.state_dir().password_reset().unwrap(), Some(ResetStep::Reset { .. })));

    assert!(h.run(&["reset-password", "--new-password", "brandnew"]));
    assert!(h.state_dir().password_reset().unwrap().is_none());

    assert!(!h.run(&["login", "--phone", ADMIN_PHONE, "--password", ADMIN_PASSWORD]));
    assert!(h.run(&["login", "--phone", ADMIN_PHONE, "--password", "brandnew"]));
}
