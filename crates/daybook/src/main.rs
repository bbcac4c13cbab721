//! `daybook` - command-line client for the Daybook diary and habit planner.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod app;
mod commands;

use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use commands::diary::DiaryCommand;
use commands::plan::PlanCommand;

#[derive(Parser)]
#[command(name = "daybook")]
#[command(about = "Diary and habit planner", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Backend base URL, overriding settings
    #[arg(long, global = true, env = "DAYBOOK_BASE_URL")]
    base_url: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in and remember the session
    Login {
        /// User name
        username: String,

        /// Password (prompted on stdin if omitted)
        #[arg(long)]
        password: Option<String>,
    },

    /// Forget the cached user and token
    Logout,

    /// Show the signed-in user
    Whoami,

    /// Talk to the assistant
    Chat {
        /// Message text
        text: Vec<String>,
    },

    /// Ask the assistant about a photo
    ChatImage {
        /// Image file
        path: std::path::PathBuf,
    },

    /// Diary entries
    Diary {
        #[command(subcommand)]
        command: DiaryCommand,
    },

    /// Plans and check-ins
    Plan {
        #[command(subcommand)]
        command: PlanCommand,
    },

    /// Transcribe a voice note
    Transcribe {
        /// Audio file
        path: std::path::PathBuf,
    },

    /// Look up the address for a pair of coordinates
    #[command(allow_negative_numbers = true)]
    Locate {
        /// Latitude in degrees
        lat: f64,

        /// Longitude in degrees
        lng: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "daybook=debug,daybook_core=debug,daybook_api=debug"
    } else {
        "daybook=info,daybook_core=info,daybook_api=info"
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let app = App::init(cli.base_url).await?;
    debug!("Settings: {:?}", app.settings);

    match cli.command {
        Commands::Login { username, password } => {
            commands::auth::login(&app, &username, password).await
        }
        Commands::Logout => commands::auth::logout(&app).await,
        Commands::Whoami => commands::auth::whoami(&app).await,
        Commands::Chat { text } => commands::chat::chat(&app, &text.join(" ")).await,
        Commands::ChatImage { path } => commands::chat::chat_image(&app, &path).await,
        Commands::Diary { command } => commands::diary::run(&app, command).await,
        Commands::Plan { command } => commands::plan::run(&app, command).await,
        Commands::Transcribe { path } => commands::media::transcribe(&app, &path).await,
        Commands::Locate { lat, lng } => commands::media::locate(&app, lat, lng).await,
    }
}
