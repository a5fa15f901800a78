// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Tipfeed command-line client
//!
//! Signs in against the tips API, keeps the session in a sealed local file
//! and prints the daily tip feed as JSON.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::sync::Arc;
use tipfeed::{
    config::Config,
    db::FileSecureStore,
    error::AppError,
    models::{
        Category, DateSelection, FilterCriteria, NewTip, OddsRange, SortOrder, WinRateConstraint,
    },
    navigation::LogNavigator,
    services::RestoreOutcome,
    time_utils::parse_iso_date,
    AppContext,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "tipfeed", version, about = "Browse and post betting tips")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign in and store the session
    Login {
        #[arg(long)]
        email: String,
        /// Read from TIPFEED_PASSWORD when omitted
        #[arg(long, env = "TIPFEED_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Sign out and wipe the stored session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Show the five-day calendar strip for this week
    Week,
    /// Show the tip feed for a day
    Tips(TipsArgs),
    /// List betting companies
    Companies,
    /// Post a new tip
    CreateTip(CreateTipArgs),
}

#[derive(Args, Debug)]
struct TipsArgs {
    /// Day tapped on the strip (YYYY-MM-DD); defaults to today
    #[arg(long, conflicts_with = "picker_date")]
    date: Option<String>,

    /// Day chosen in the month picker (DD-MM-YYYY)
    #[arg(long)]
    picker_date: Option<String>,

    #[arg(long, default_value_t = SortOrder::Latest)]
    sort: SortOrder,

    /// Betting company id (repeatable)
    #[arg(long = "company")]
    companies: Vec<u64>,

    /// Category name (repeatable)
    #[arg(long = "category")]
    categories: Vec<String>,

    /// 0 means unset
    #[arg(long, default_value_t = 0.0)]
    min_odds: f64,

    /// 0 means unset
    #[arg(long, default_value_t = 0.0)]
    max_odds: f64,

    /// Minimum win rate in percent
    #[arg(long, conflicts_with_all = ["min_win_rate", "max_win_rate"])]
    win_rate_at_least: Option<f64>,

    #[arg(long)]
    min_win_rate: Option<f64>,

    #[arg(long)]
    max_win_rate: Option<f64>,
}

#[derive(Args, Debug)]
struct CreateTipArgs {
    /// Match date (YYYY-MM-DD)
    #[arg(long)]
    match_date: String,

    #[arg(long)]
    code: String,

    #[arg(long)]
    odds: String,

    #[arg(long)]
    company: u64,

    /// Category name (repeatable)
    #[arg(long = "category", required = true)]
    categories: Vec<String>,
}

impl TipsArgs {
    fn selection(&self, today: NaiveDate) -> Result<DateSelection, AppError> {
        match (&self.date, &self.picker_date) {
            (Some(iso), _) => DateSelection::from_strip(iso)
                .ok_or_else(|| AppError::Validation(format!("Invalid date {:?}", iso))),
            (None, Some(raw)) => DateSelection::from_month_picker(raw)
                .ok_or_else(|| AppError::Validation(format!("Invalid picker date {:?}", raw))),
            (None, None) => Ok(DateSelection::initial(today)),
        }
    }

    fn criteria(&self) -> FilterCriteria {
        let mut criteria = FilterCriteria::default()
            .with_companies(self.companies.iter().copied())
            .with_categories(&self.categories);

        if self.min_odds != 0.0 || self.max_odds != 0.0 {
            criteria = criteria.with_odds(OddsRange::from_form(self.min_odds, self.max_odds));
        }

        if let Some(threshold) = self.win_rate_at_least {
            criteria = criteria.with_win_rate(WinRateConstraint::AtLeast { threshold });
        } else if self.min_win_rate.is_some() || self.max_win_rate.is_some() {
            criteria = criteria.with_win_rate(WinRateConstraint::Between {
                min: self.min_win_rate,
                max: self.max_win_rate,
            });
        }

        criteria
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Logs go to stderr; stdout carries command output
    init_logging();

    let cli = Cli::parse();

    let config = Config::from_env()?;
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let store = Arc::new(FileSecureStore::new(&config.store_path, &config.store_secret)?);
    let ctx = AppContext::new(config, store, Arc::new(LogNavigator))?;

    if let RestoreOutcome::Discarded(reason) = ctx.session.restore() {
        tracing::warn!(reason = %reason, "Stored session discarded");
    }

    match run(&ctx, cli.command).await {
        Ok(output) => {
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok(())
        }
        Err(e) => {
            eprintln!("{}", serde_json::to_string_pretty(&e.notice())?);
            std::process::exit(1);
        }
    }
}

async fn run(ctx: &AppContext, command: Command) -> Result<serde_json::Value, AppError> {
    let to_json = |v: serde_json::Result<serde_json::Value>| {
        v.map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to encode output: {}", e)))
    };

    match command {
        Command::Login { email, password } => {
            let profile = ctx.login(&email, &password).await?;
            to_json(serde_json::to_value(profile))
        }
        Command::Logout => {
            ctx.logout()?;
            Ok(serde_json::json!({ "logged_out": true }))
        }
        Command::Whoami => to_json(serde_json::to_value(ctx.session.snapshot().user_data)),
        Command::Week => {
            let week = ctx.engine.compute_current_week(ctx.today());
            to_json(serde_json::to_value(week))
        }
        Command::Tips(args) => {
            let selection = args.selection(ctx.today())?;
            let view = ctx
                .load_feed(&selection, &args.criteria(), args.sort)
                .await?;
            to_json(serde_json::to_value(view))
        }
        Command::Companies => {
            let token = ctx.session.require_token()?;
            let companies = ctx.api.get_betting_companies(&token).await?;
            to_json(serde_json::to_value(companies))
        }
        Command::CreateTip(args) => {
            let match_date = parse_iso_date(&args.match_date).ok_or_else(|| {
                AppError::Validation(format!("Invalid match date {:?}", args.match_date))
            })?;
            let tip = NewTip {
                match_date,
                booking_code: args.code,
                odds: args.odds,
                betting_company_id: args.company,
                categories: args.categories.iter().map(|c| Category::parse(c)).collect(),
            };
            ctx.create_tip(&tip).await?;
            Ok(serde_json::json!({ "created": true }))
        }
    }
}

/// Initialize structured JSON logging on stderr.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tipfeed=debug,info"));

    tracing_subscriber::registry().with(filter).with(format).init();
}
