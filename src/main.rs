use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use coinvert::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List top assets by market capitalization
    Prices {
        /// How many assets to display
        #[arg(short, long, default_value_t = 20)]
        limit: u32,
    },
    /// Search assets by name or ticker
    Search { query: String },
    /// Convert an amount of a crypto asset into a fiat currency
    Convert {
        /// Amount of the source asset
        amount: f64,
        /// Source asset ticker, e.g. BTC
        from: String,
        /// Target fiat currency; defaults to the configured one
        #[arg(short, long)]
        to: Option<String>,
    },
    /// Show price history for an asset
    Chart {
        /// Asset ticker, e.g. ETH
        symbol: String,
        /// Trailing window in days
        #[arg(short, long, default_value_t = 7)]
        days: u32,
    },
    /// Manage favorite assets
    Favorites {
        #[command(subcommand)]
        action: Option<FavoritesCommands>,
    },
    /// Manage conversion history
    History {
        #[command(subcommand)]
        action: Option<HistoryCommands>,
    },
    /// Create an account and sign in
    Register {
        email: String,
        /// Display name; defaults to the email's local part
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        password: String,
    },
    /// Sign in to an existing account
    Login {
        email: String,
        #[arg(short, long)]
        password: String,
    },
    /// Sign out
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Subcommand)]
enum FavoritesCommands {
    /// List favorites with current prices
    List,
    /// Add a symbol to favorites
    Add { symbol: String },
    /// Remove a symbol from favorites
    Remove { symbol: String },
}

#[derive(Subcommand)]
enum HistoryCommands {
    /// List past conversions, newest first
    List,
    /// Remove one conversion by id
    Remove { id: String },
    /// Remove all conversions
    Clear,
}

impl From<Commands> for coinvert::AppCommand {
    fn from(cmd: Commands) -> coinvert::AppCommand {
        match cmd {
            Commands::Prices { limit } => coinvert::AppCommand::Prices { limit },
            Commands::Search { query } => coinvert::AppCommand::Search { query },
            Commands::Convert { amount, from, to } => {
                coinvert::AppCommand::Convert { from, to, amount }
            }
            Commands::Chart { symbol, days } => coinvert::AppCommand::Chart { symbol, days },
            Commands::Favorites { action } => {
                coinvert::AppCommand::Favorites(match action {
                    None | Some(FavoritesCommands::List) => coinvert::FavoritesAction::List,
                    Some(FavoritesCommands::Add { symbol }) => {
                        coinvert::FavoritesAction::Add { symbol }
                    }
                    Some(FavoritesCommands::Remove { symbol }) => {
                        coinvert::FavoritesAction::Remove { symbol }
                    }
                })
            }
            Commands::History { action } => coinvert::AppCommand::History(match action {
                None | Some(HistoryCommands::List) => coinvert::HistoryAction::List,
                Some(HistoryCommands::Remove { id }) => coinvert::HistoryAction::Remove { id },
                Some(HistoryCommands::Clear) => coinvert::HistoryAction::Clear,
            }),
            Commands::Register {
                email,
                name,
                password,
            } => {
                let name = name.unwrap_or_else(|| {
                    email.split('@').next().unwrap_or(&email).to_string()
                });
                coinvert::AppCommand::Register {
                    email,
                    name,
                    password,
                }
            }
            Commands::Login { email, password } => coinvert::AppCommand::Login { email, password },
            Commands::Logout => coinvert::AppCommand::Logout,
            Commands::Whoami => coinvert::AppCommand::Whoami,
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => coinvert::cli::setup::setup(),
        Some(cmd) => coinvert::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
