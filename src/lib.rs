pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::accounts::{ANON_OWNER, AccountService, ConversionLedger};
use crate::core::config::AppConfig;
use crate::core::convert::Converter;
use crate::core::market::MarketDataProvider;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Prices {
        limit: u32,
    },
    Search {
        query: String,
    },
    Convert {
        from: String,
        to: Option<String>,
        amount: f64,
    },
    Chart {
        symbol: String,
        days: u32,
    },
    Favorites(FavoritesAction),
    History(HistoryAction),
    Register {
        email: String,
        name: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    Whoami,
}

pub enum FavoritesAction {
    List,
    Add { symbol: String },
    Remove { symbol: String },
}

pub enum HistoryAction {
    List,
    Remove { id: String },
    Clear,
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("coinvert starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load_or_default()?,
    };
    debug!("Loaded config: {config:#?}");

    let data_path = config.default_data_path()?;
    let documents = store::Documents::open(&data_path.join("store"))?;

    let market: Arc<dyn MarketDataProvider> = Arc::new(providers::CachingMarketProvider::new(
        providers::CoinGeckoProvider::new(config.coingecko_base_url()),
        &config.cache,
    ));
    let accounts = store::accounts::LocalAccounts::new(&documents, &data_path)?;
    let profiles = store::caching::CachingProfiles::new(
        store::accounts::LocalProfiles::new(&documents)?,
        &config.cache,
    );
    let ledger: Arc<dyn ConversionLedger> = Arc::new(store::caching::CachingLedger::new(
        store::accounts::LocalLedger::new(&documents)?,
        &config.cache,
    ));
    let converter = Converter::new(Arc::clone(&market), Arc::clone(&ledger));

    // Favorites and history are scoped to the signed-in user, or to a
    // shared anonymous owner when nobody is.
    let owner = match accounts.current_session().await? {
        Some(session) => session.uid,
        None => ANON_OWNER.to_string(),
    };
    debug!(%owner, "Resolved owner");

    match command {
        AppCommand::Prices { limit } => {
            cli::prices::run(market.as_ref(), &profiles, &owner, limit).await
        }
        AppCommand::Search { query } => cli::search::run(market.as_ref(), &query).await,
        AppCommand::Convert { from, to, amount } => {
            let to_currency = to.as_deref().unwrap_or(&config.currency);
            cli::convert::run(&converter, Some(&owner), &from, to_currency, amount).await
        }
        AppCommand::Chart { symbol, days } => {
            cli::chart::run(market.as_ref(), &symbol, days, &config.currency).await
        }
        AppCommand::Favorites(action) => match action {
            FavoritesAction::List => {
                cli::favorites::list(market.as_ref(), &profiles, &owner, &config.currency).await
            }
            FavoritesAction::Add { symbol } => {
                cli::favorites::add(&profiles, &owner, &symbol).await
            }
            FavoritesAction::Remove { symbol } => {
                cli::favorites::remove(&profiles, &owner, &symbol).await
            }
        },
        AppCommand::History(action) => match action {
            HistoryAction::List => cli::history::list(ledger.as_ref(), &owner).await,
            HistoryAction::Remove { id } => cli::history::remove(ledger.as_ref(), &owner, &id).await,
            HistoryAction::Clear => cli::history::clear(ledger.as_ref(), &owner).await,
        },
        AppCommand::Register {
            email,
            name,
            password,
        } => cli::account::register(&accounts, &email, &password, &name).await,
        AppCommand::Login { email, password } => {
            cli::account::login(&accounts, &email, &password).await
        }
        AppCommand::Logout => cli::account::logout(&accounts).await,
        AppCommand::Whoami => cli::account::whoami(&accounts).await,
    }
}
