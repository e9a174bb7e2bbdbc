//! Report CLI commands
//!
//! Every report is computed from one snapshot of the user's data taken at a
//! reference date.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use serde::Serialize;

use super::{parse_date, parse_month_or, today};
use crate::config::settings::Settings;
use crate::display::report::{
    format_breakdown, format_budget_view, format_health, format_insights, format_summary,
    format_trend, format_velocity,
};
use crate::error::{FinsightError, FinsightResult};
use crate::models::MonthKey;
use crate::services::{CategoryService, ReportService};
use crate::storage::Storage;

/// Options shared by every report
#[derive(Args, Debug, Clone, Default)]
pub struct ReportArgs {
    /// Month to report on (YYYY-MM)
    #[arg(short, long)]
    pub month: Option<String>,
    /// Reference date standing in for today (YYYY-MM-DD)
    #[arg(short, long)]
    pub date: Option<String>,
    /// Print JSON instead of text
    #[arg(long)]
    pub json: bool,
}

impl ReportArgs {
    /// Resolve the reference date and report month.
    ///
    /// A month without a date reports as of that month's last day, or as of
    /// today when the month is the current one.
    pub fn resolve(&self, now: NaiveDate) -> FinsightResult<(NaiveDate, MonthKey)> {
        match (&self.date, &self.month) {
            (Some(date), month) => {
                let date = parse_date(date)?;
                Ok((date, parse_month_or(month.as_deref(), date)?))
            }
            (None, Some(_)) => {
                let month = parse_month_or(self.month.as_deref(), now)?;
                let date = if month.contains(now) { now } else { month.last_day() };
                Ok((date, month))
            }
            (None, None) => Ok((now, MonthKey::of(now))),
        }
    }
}

/// Report subcommands
#[derive(Subcommand)]
pub enum ReportCommands {
    /// Income, expenses and weekly spending for a month
    Summary(ReportArgs),
    /// Budget vs. actual per allocation
    Budget(ReportArgs),
    /// Financial health score
    Health(ReportArgs),
    /// Spending pace and month-end projection
    Velocity(ReportArgs),
    /// Spending per category
    Breakdown(ReportArgs),
    /// Six months of spending
    Trend(ReportArgs),
    /// Warnings and tips for the month
    Insights(ReportArgs),
}

fn print_json<T: Serialize>(value: &T) -> FinsightResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Handle a report command
pub fn handle_report_command(storage: &Storage, settings: &Settings, cmd: ReportCommands) -> FinsightResult<()> {
    let user = settings.require_user()?;
    let symbol = settings.currency_symbol.as_str();

    let args = match &cmd {
        ReportCommands::Summary(a)
        | ReportCommands::Budget(a)
        | ReportCommands::Health(a)
        | ReportCommands::Velocity(a)
        | ReportCommands::Breakdown(a)
        | ReportCommands::Trend(a)
        | ReportCommands::Insights(a) => a.clone(),
    };
    let (date, month) = args.resolve(today())?;
    let snapshot = ReportService::new(storage, user).snapshot(date, settings.insight_limit)?;

    match cmd {
        ReportCommands::Summary(_) => {
            let totals = snapshot.monthly_totals(month);
            let weeks = snapshot.weekly_buckets(month);
            if args.json {
                print_json(&serde_json::json!({ "totals": totals, "weeks": weeks }))?;
            } else {
                print!("{}", format_summary(&totals, &weeks, symbol));
            }
        }

        ReportCommands::Budget(_) => {
            let view = snapshot
                .budget_with_spending(month)
                .ok_or_else(|| FinsightError::budget_not_found(month.to_string()))?;
            if args.json {
                print_json(&view)?;
            } else {
                let categories = CategoryService::new(storage, user).list()?;
                print!("{}", format_budget_view(&view, &categories, symbol));
            }
        }

        ReportCommands::Health(_) => {
            let health = snapshot.financial_health(month);
            if args.json {
                print_json(&health)?;
            } else {
                print!("{}", format_health(&health));
            }
        }

        ReportCommands::Velocity(_) => {
            let velocity = snapshot.velocity();
            if args.json {
                print_json(&velocity)?;
            } else {
                let budget = snapshot
                    .budget_for(velocity.month)
                    .map(|b| b.total_amount);
                print!("{}", format_velocity(&velocity, budget, symbol));
            }
        }

        ReportCommands::Breakdown(_) => {
            let rows = snapshot.category_breakdown(month);
            if args.json {
                print_json(&rows)?;
            } else {
                println!("Spending by category, {}", month.label());
                print!("{}", format_breakdown(&rows, symbol));
            }
        }

        ReportCommands::Trend(_) => {
            let trend = snapshot.spending_trend(month);
            if args.json {
                print_json(&trend)?;
            } else {
                print!("{}", format_trend(&trend, symbol));
            }
        }

        ReportCommands::Insights(_) => {
            let insights = snapshot.insights();
            if args.json {
                print_json(&insights)?;
            } else {
                print!("{}", format_insights(&insights));
            }
        }
    }

    Ok(())
}
