use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{CommandFactory, Parser, Subcommand};
use fintechora::core::deposit::NewDeposit;
use fintechora::core::log::init_logging;
use fintechora::core::view::View;
use fintechora::{AppCommand, cli::setup};
use rust_decimal::Decimal;

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
    /// Create an account
    Register {
        /// Display name
        #[arg(short, long)]
        name: String,
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Log in and start a session
    Login {
        email: String,
        /// Prompted for when omitted
        #[arg(short, long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the logged-in user
    Whoami,
    /// Portfolio overview and upcoming maturities
    Dashboard,
    /// List fixed deposits
    Investments,
    /// Current bank FD rates and market indices
    Markets {
        /// Ignore the cached rate sheet
        #[arg(long)]
        refresh: bool,
    },
    /// Open a view by name: dashboard, investments or markets
    View {
        name: View,
    },
    /// Record a new fixed deposit
    Add {
        /// Bank holding the deposit
        #[arg(short, long)]
        bank: String,
        /// Amount deposited
        #[arg(short, long)]
        principal: Decimal,
        /// Annual interest rate in percent
        #[arg(short, long)]
        rate: Decimal,
        /// Term in months
        #[arg(short, long)]
        months: u32,
        /// Start date (YYYY-MM-DD), defaults to today
        #[arg(short, long)]
        start: Option<NaiveDate>,
    },
    /// Show growth and comparisons for a deposit
    Track {
        /// Deposit id or a unique prefix of it
        id: String,
    },
    /// Delete a fixed deposit
    Remove {
        /// Deposit id or a unique prefix of it
        id: String,
    },
    /// Calculate maturity value and compare FD, savings and RD
    Calc {
        #[arg(short, long, allow_negative_numbers = true)]
        principal: Decimal,
        /// Annual interest rate in percent
        #[arg(short, long, allow_negative_numbers = true)]
        rate: Decimal,
        /// Term in months
        #[arg(short, long, allow_negative_numbers = true)]
        months: i64,
    },
}

fn prompt_password(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => {
            let term = console::Term::stderr();
            term.write_str("Password: ")?;
            term.read_secure_line().context("Failed to read password")
        }
    }
}

impl TryFrom<Commands> for AppCommand {
    type Error = anyhow::Error;

    fn try_from(cmd: Commands) -> Result<AppCommand> {
        Ok(match cmd {
            Commands::Register {
                name,
                email,
                password,
            } => AppCommand::Register {
                name,
                email,
                password: prompt_password(password)?,
            },
            Commands::Login { email, password } => AppCommand::Login {
                email,
                password: prompt_password(password)?,
            },
            Commands::Logout => AppCommand::Logout,
            Commands::Whoami => AppCommand::WhoAmI,
            Commands::Dashboard => AppCommand::View(View::Dashboard),
            Commands::Investments => AppCommand::View(View::Investments),
            Commands::Markets { refresh: true } => AppCommand::RefreshMarkets,
            Commands::Markets { refresh: false } => AppCommand::View(View::Markets),
            Commands::View { name } => AppCommand::View(name),
            Commands::Add {
                bank,
                principal,
                rate,
                months,
                start,
            } => AppCommand::AddDeposit(NewDeposit {
                bank_name: bank,
                principal,
                interest_rate: rate,
                duration_months: months,
                start_date: start.unwrap_or_else(|| chrono::Local::now().date_naive()),
            }),
            Commands::Track { id } => AppCommand::Track { id },
            Commands::Remove { id } => AppCommand::RemoveDeposit { id },
            Commands::Calc {
                principal,
                rate,
                months,
            } => AppCommand::Calculate {
                principal,
                rate,
                months,
            },
            Commands::Setup => anyhow::bail!("Setup command should be handled separately"),
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => match cli.config_path.as_deref() {
            Some(path) => setup::setup_at_path(path),
            None => setup::setup(),
        },
        Some(cmd) => match AppCommand::try_from(cmd) {
            Ok(command) => fintechora::run_command(command, cli.config_path.as_deref()).await,
            Err(e) => Err(e),
        },
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
