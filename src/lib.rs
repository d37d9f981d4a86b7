pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::auth::{AuthService, Session};
use crate::core::config::AppConfig;
use crate::core::deposit::NewDeposit;
use crate::core::view::View;
use crate::store::KeyValueStore;
use crate::store::records::DepositRepository;
use anyhow::{Result, bail};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    Register {
        name: String,
        email: String,
        password: String,
    },
    Login {
        email: String,
        password: String,
    },
    Logout,
    WhoAmI,
    View(View),
    /// Markets view fetched fresh, bypassing the rate sheet cache.
    RefreshMarkets,
    AddDeposit(NewDeposit),
    Track {
        id: String,
    },
    RemoveDeposit {
        id: String,
    },
    Calculate {
        principal: Decimal,
        rate: Decimal,
        months: i64,
    },
}

/// Everything a command needs: configuration, the opened store, and the current date.
pub struct App {
    pub config: AppConfig,
    pub store: KeyValueStore,
    pub today: NaiveDate,
}

impl App {
    pub fn new(config: AppConfig, store: KeyValueStore, today: NaiveDate) -> Self {
        Self {
            config,
            store,
            today,
        }
    }

    /// Opens the store under the configured data directory, dated today.
    pub fn open(config: AppConfig) -> Result<Self> {
        let store = KeyValueStore::open(&config.data_path()?)?;
        Ok(Self::new(config, store, chrono::Local::now().date_naive()))
    }

    /// Runs `command` and returns its rendered output.
    pub async fn execute(&self, command: AppCommand) -> Result<String> {
        let currency = self.config.currency.as_str();
        let auth = AuthService::new(&self.store)?;

        match command {
            AppCommand::Calculate {
                principal,
                rate,
                months,
            } => cli::calculator::render(principal, rate, months, &self.config.rates, currency),
            AppCommand::Register {
                name,
                email,
                password,
            } => {
                let user = auth.register(&name, &email, &password).await?;
                Ok(cli::account::render_registered(&user))
            }
            AppCommand::Login { email, password } => {
                let session = auth.login(&email, &password).await?;
                Ok(cli::account::render_logged_in(&session))
            }
            AppCommand::Logout => {
                let session = auth.logout().await?;
                Ok(cli::account::render_logged_out(session.as_ref()))
            }
            AppCommand::WhoAmI => {
                let session = auth.require_session().await?;
                Ok(cli::account::render_whoami(&session))
            }
            AppCommand::View(view) => {
                let session = auth.require_session().await?;
                self.render_view(view, &session).await
            }
            AppCommand::RefreshMarkets => {
                let session = auth.require_session().await?;
                providers::clear_market_cache(&self.store).await?;
                self.render_view(View::Markets, &session).await
            }
            AppCommand::AddDeposit(new) => {
                let session = auth.require_session().await?;
                let deposit = DepositRepository::new(&self.store)?
                    .create(&session.user.id, new)
                    .await?;
                Ok(cli::investments::render_added(&deposit, currency))
            }
            AppCommand::Track { id } => {
                let session = auth.require_session().await?;
                let Some(deposit) = DepositRepository::new(&self.store)?
                    .find(&session.user.id, &id)
                    .await?
                else {
                    bail!("No fixed deposit matches '{id}'");
                };
                cli::investments::render_tracker(&deposit, self.today, &self.config.rates, currency)
            }
            AppCommand::RemoveDeposit { id } => {
                let session = auth.require_session().await?;
                let Some(deposit) = DepositRepository::new(&self.store)?
                    .remove(&session.user.id, &id)
                    .await?
                else {
                    bail!("No fixed deposit matches '{id}'");
                };
                Ok(cli::investments::render_removed(&deposit))
            }
        }
    }

    async fn render_view(&self, view: View, session: &Session) -> Result<String> {
        let deposits = DepositRepository::new(&self.store)?
            .list_for_user(&session.user.id)
            .await?;
        let market = providers::market_provider(&self.config, &self.store)?;
        cli::render_view(
            view,
            session,
            &deposits,
            market.as_ref(),
            self.today,
            &self.config.currency,
        )
        .await
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("FinTechora starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let app = App::open(config)?;
    debug!("Executing {command:?}");
    let output = app.execute(command).await?;
    println!("{output}");
    Ok(())
}
