use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use finsight::cli::{
    handle_budget_command, handle_category_command, handle_export_command, handle_goal_command,
    handle_recurring_command, handle_report_command, handle_transaction_command,
};
use finsight::config::{paths::FinsightPaths, settings::Settings};
use finsight::services::CategoryService;
use finsight::storage::Storage;

#[derive(Parser)]
#[command(
    name = "finsight",
    version,
    about = "Personal finance tracker with budgets, goals and spending insights",
    long_about = "finsight records income and expenses, tracks monthly budgets and savings \
                  goals, and turns your spending into health scores, projections and \
                  insights, all from the command line."
)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Transaction management commands
    #[command(subcommand, alias = "transaction")]
    Txn(finsight::cli::TransactionCommands),

    /// Category management commands
    #[command(subcommand)]
    Category(finsight::cli::CategoryCommands),

    /// Monthly budget commands
    #[command(subcommand)]
    Budget(finsight::cli::BudgetCommands),

    /// Savings goal commands
    #[command(subcommand)]
    Goal(finsight::cli::GoalCommands),

    /// Recurring transaction templates
    #[command(subcommand)]
    Recurring(finsight::cli::RecurringCommands),

    /// Analytics reports
    #[command(subcommand)]
    Report(finsight::cli::ReportCommands),

    /// Export data
    #[command(subcommand)]
    Export(finsight::cli::ExportCommands),

    /// Create the data directory, your profile and the default categories
    Init,

    /// Show current configuration and paths
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = FinsightPaths::new()?;
    let mut settings = Settings::load_or_create(&paths)?;

    let level = if cli.verbose { "debug" } else { settings.log_level.as_str() };
    init_logger(level);
    debug!(base_dir = %paths.base_dir().display(), "paths resolved");

    let storage = Storage::open(paths.clone())?;

    match cli.command {
        Some(Commands::Txn(cmd)) => handle_transaction_command(&storage, &settings, cmd)?,
        Some(Commands::Category(cmd)) => handle_category_command(&storage, &settings, cmd)?,
        Some(Commands::Budget(cmd)) => handle_budget_command(&storage, &settings, cmd)?,
        Some(Commands::Goal(cmd)) => handle_goal_command(&storage, &settings, cmd)?,
        Some(Commands::Recurring(cmd)) => handle_recurring_command(&storage, &settings, cmd)?,
        Some(Commands::Report(cmd)) => handle_report_command(&storage, &settings, cmd)?,
        Some(Commands::Export(cmd)) => handle_export_command(&storage, &settings, cmd)?,
        Some(Commands::Init) => {
            println!("Initializing finsight at: {}", paths.base_dir().display());
            finsight::storage::init::initialize_storage(&paths)?;

            let (user, created) = settings.ensure_user();
            settings.setup_completed = true;
            settings.save(&paths)?;

            let seeded = CategoryService::new(&storage, user).seed_defaults()?;

            if created {
                println!("Created your profile: {}", user);
            } else {
                println!("Profile already exists: {}", user);
            }
            if seeded.is_empty() {
                println!("Categories already set up.");
            } else {
                let names: Vec<&str> = seeded.iter().map(|c| c.name.as_str()).collect();
                println!("Default categories created: {}", names.join(", "));
            }
            println!();
            println!("Run 'finsight txn add <amount> --category <name>' to record a transaction.");
        }
        Some(Commands::Config) => {
            println!("finsight Configuration");
            println!("======================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Export directory: {}", paths.export_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            match settings.user_id {
                Some(user) => println!("  Profile:        {}", user),
                None => println!("  Profile:        (none, run 'finsight init')"),
            }
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Date format:    {}", settings.date_format);
            println!("  Log level:      {}", settings.log_level);
            println!("  Insight limit:  {}", settings.insight_limit);
            println!("  Audit entries:  {}", storage.audit().entry_count()?);
        }
        None => {
            println!("finsight - personal finance tracking");
            println!();
            println!("Run 'finsight --help' for usage information.");
            println!("Run 'finsight init' to get started.");
        }
    }

    Ok(())
}

/// Initializes the tracing subscriber. `RUST_LOG` wins over the configured
/// level.
fn init_logger(level: &str) {
    let filter = match std::env::var("RUST_LOG").ok() {
        Some(_) => EnvFilter::from_default_env(),
        None => EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), level)),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
