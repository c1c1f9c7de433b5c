use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};
use console_core::config::DEFAULT_API_DOMAIN;
use console_core::Role;

#[derive(Parser, Debug)]
#[command(name = "admin-console", about = "Manage users, categories and services of the admin backend")]
pub struct Args {
    #[arg(long, env = "API_URL", default_value = DEFAULT_API_DOMAIN, help = "Backend origin; /api/v1 is appended")]
    pub api_url: String,

    #[arg(long, env = "ADMIN_CONSOLE_HOME", help = "Directory holding credentials and in-progress flows")]
    pub state_dir: Option<PathBuf>,

    #[arg(short, long, help = "Debug logging (overrides RUST_LOG)")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in with phone number and password
    Login {
        #[arg(long)]
        phone: String,
        #[arg(long, env = "ADMIN_CONSOLE_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Create an account; an OTP is emailed
    Register {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        phone: String,
    },
    /// Confirm a registration with its 6-digit OTP
    Verify { otp: String },
    /// Abandon a registration awaiting its OTP
    CancelRegistration,
    /// Forget the stored credential and any in-progress flow
    Logout,
    /// Start a password reset; an OTP is emailed
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Confirm the password reset OTP
    VerifyResetOtp { otp: String },
    /// Choose the new password once the OTP is verified
    ResetPassword {
        #[arg(long)]
        new_password: String,
    },
    #[command(subcommand)]
    Users(UserCommand),
    #[command(subcommand)]
    Categories(CategoryCommand),
    #[command(subcommand)]
    Services(ServiceCommand),
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    List,
    /// Edit an account; omitted fields keep their value
    Update {
        id: String,
        #[arg(long)]
        full_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long, value_enum)]
        role: Option<RoleArg>,
    },
    /// Flip the active flag
    Toggle { id: String },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum CategoryCommand {
    List,
    Create {
        #[arg(long)]
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete { id: String },
}

#[derive(Subcommand, Debug)]
pub enum ServiceCommand {
    List,
    View { id: String },
    Create(NewService),
    Update {
        id: String,
        #[command(flatten)]
        changes: ServiceChanges,
    },
    Delete { id: String },
}

#[derive(ClapArgs, Debug)]
pub struct NewService {
    #[arg(long)]
    pub name: String,
    #[arg(long, default_value = "")]
    pub description: String,
    #[arg(long, help = "Duration in minutes")]
    pub duration: Option<u32>,
    #[arg(long)]
    pub price: f64,
    #[arg(long, help = "Category id")]
    pub category: Option<String>,
    #[arg(long, help = "Create the service deactivated")]
    pub inactive: bool,
}

#[derive(ClapArgs, Debug)]
pub struct ServiceChanges {
    #[arg(long)]
    pub name: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub duration: Option<u32>,
    #[arg(long)]
    pub price: Option<f64>,
    #[arg(long)]
    pub category: Option<String>,
    #[arg(long)]
    pub active: Option<bool>,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Admin,
    Staff,
    Customer,
}

impl From<RoleArg> for Role {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => Role::Admin,
            RoleArg::Staff => Role::Staff,
            RoleArg::Customer => Role::Customer,
        }
    }
}
