//! Terminal front end for the admin console.
//!
//! Each invocation performs one action through the `console_core` screen
//! controllers. Credentials and in-progress registration or password reset
//! live in a state directory between invocations.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod store;
pub mod terminal;

use std::io;
use std::sync::Arc;

use anyhow::Result;
use console_core::screens::LOGIN_PATH;
use console_core::{ApiClient, ApiConfig, Session, UreqTransport};
use tracing::info;

use crate::cli::Args;
use crate::commands::Console;
use crate::store::StateDir;
use crate::terminal::TerminalUi;

/// Execute the parsed command. `Ok(false)` means the action was attempted
/// and reported a failure.
pub fn run(args: Args) -> Result<bool> {
    let state = StateDir::resolve(args.state_dir)?;
    let config = ApiConfig::from_domain(&args.api_url);
    info!(base_url = %config.base_url, state_dir = %state.root().display(), "starting");

    let session = Session::new(Arc::new(state.credentials()));
    let api = ApiClient::new(&config, session, UreqTransport::new());
    let mut console = Console::new(api, state, TerminalUi::at(LOGIN_PATH), Box::new(io::stdout()));
    console.execute(args.command)
}
