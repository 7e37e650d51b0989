use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

mod cli;
mod ui;
mod version;

use cli::CliHandler;
use version::CURRENT_VERSION;

#[derive(Parser)]
#[command(
    name = "laptophub",
    about = "Browse LaptopHub listings and manage your account",
    long_about = "LaptopHub - Laptop marketplace client

OVERVIEW:
  Browse laptops posted by Telegram seller channels, leave reviews and
  manage your LaptopHub account from the terminal.

QUICK START:
  laptophub laptops --query thinkpad     # Search listings
  laptophub laptop <UUID>                # Listing details, reviews and similar items
  laptophub channels                     # Seller channels
  laptophub login                        # Sign in (the session is remembered)
  laptophub review add <UUID> --rating 5 # Review a listing
  laptophub status                       # Show the current session

CONFIGURATION:
  Settings are read from the config file (see --config) and from
  LAPTOPHUB_* environment variables, e.g. LAPTOPHUB_BASE_URL.",
    version = CURRENT_VERSION,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file (defaults to the user config directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List laptops, newest first
    #[command(aliases = &["ls"])]
    Laptops(LaptopsArgs),

    /// Show one laptop listing
    Laptop(LaptopArgs),

    /// List seller channels
    Channels(PageArgs),

    /// Show a channel and its listings
    Channel(ChannelArgs),

    /// Create an account
    Register(RegisterArgs),

    /// Sign in with email and password
    Login(LoginArgs),

    /// Sign out and forget the stored session
    Logout,

    /// Show the current session
    #[command(aliases = &["st"])]
    Status,

    /// Show or edit your profile
    Profile(ProfileArgs),

    /// Change or reset your password
    Password(PasswordArgs),

    /// Confirm an email address with the link parameters
    VerifyEmail(VerifyEmailArgs),

    /// Send the verification email again
    ResendVerification,

    /// Permanently delete your account
    DeleteAccount(DeleteAccountArgs),

    /// Write and manage reviews
    Review(ReviewArgs),
}

#[derive(Args)]
pub struct PageArgs {
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args)]
pub struct LaptopsArgs {
    #[arg(short, long, default_value_t = 1)]
    pub page: u32,

    /// Free-text search
    #[arg(short, long)]
    pub query: Option<String>,
}

#[derive(Args)]
pub struct LaptopArgs {
    pub uuid: String,
}

#[derive(Args)]
pub struct ChannelArgs {
    #[arg(allow_negative_numbers = true)]
    pub channel_id: i64,

    #[arg(short, long, default_value_t = 1)]
    pub page: u32,
}

#[derive(Args)]
pub struct RegisterArgs {
    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,
}

#[derive(Args)]
pub struct LoginArgs {
    #[arg(long)]
    pub email: Option<String>,

    /// Prompted for when omitted
    #[arg(long)]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct ProfileArgs {
    #[command(subcommand)]
    pub command: ProfileCommand,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    Show,
    Update(ProfileUpdateArgs),
}

#[derive(Args)]
pub struct ProfileUpdateArgs {
    #[arg(long)]
    pub first_name: Option<String>,

    #[arg(long)]
    pub last_name: Option<String>,

    #[arg(long)]
    pub phone: Option<String>,

    #[arg(long)]
    pub bio: Option<String>,

    /// Image file to upload as the profile picture
    #[arg(long)]
    pub avatar: Option<PathBuf>,
}

#[derive(Args)]
pub struct PasswordArgs {
    #[command(subcommand)]
    pub command: PasswordCommand,
}

#[derive(Subcommand)]
pub enum PasswordCommand {
    /// Change the password of the signed-in account
    Change,

    /// Email a password reset link
    ResetRequest {
        #[arg(long)]
        email: Option<String>,
    },

    /// Set a new password with the reset link parameters
    ResetConfirm { uid: String, token: String },
}

#[derive(Args)]
pub struct VerifyEmailArgs {
    pub uid: String,
    pub token: String,
}

#[derive(Args)]
pub struct DeleteAccountArgs {
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

#[derive(Args)]
pub struct ReviewArgs {
    #[command(subcommand)]
    pub command: ReviewCommand,
}

#[derive(Subcommand)]
pub enum ReviewCommand {
    /// Review a listing
    Add {
        uuid: String,
        #[arg(short, long)]
        rating: i32,
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Delete a review by id
    Delete { review_id: u64 },

    /// Show your review of a listing
    Mine { uuid: String },

    /// Edit your review of a listing
    UpdateMine {
        uuid: String,
        #[arg(short, long)]
        rating: Option<i32>,
        #[arg(short, long)]
        comment: Option<String>,
    },

    /// Delete your review of a listing
    DeleteMine { uuid: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(format!("laptophub={}", log_level))
        .with_writer(std::io::stderr);
    subscriber.init();

    let handler = match CliHandler::new(cli.config) {
        Ok(handler) => handler,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let result = handler.execute(cli.command).await;
    handler.shutdown();

    if let Err(e) = result {
        handler.report(&e);
        std::process::exit(1);
    }
}
