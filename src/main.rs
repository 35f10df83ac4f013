use anyhow::Result;
use clap::{Parser, Subcommand};

use fundledger::cli::{
    handle_balance_command, handle_export_command, handle_post_command, handle_rebuild_command,
    handle_report_command, handle_transaction_command, handle_user_command, handle_verify_command,
    Credentials, ExportCommands, PostCommands, ReportCommands, TransactionCommands, UserCommands,
};
use fundledger::config::{paths::LedgerPaths, settings::Settings};
use fundledger::logging::init_tracing;
use fundledger::models::TransactionKind;
use fundledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "fundledger",
    version,
    about = "Single-fund income and expense ledger",
    long_about = "FundLedger records income and expenses against one fund, \
                  refuses any expense the balance cannot cover, and produces \
                  category breakdowns, CSV exports and a PDF summary."
)]
struct Cli {
    /// Username to act as
    #[arg(short, long, global = true, env = "FUNDLEDGER_USER")]
    user: Option<String>,

    /// Password (prompted for when omitted)
    #[arg(long, global = true, env = "FUNDLEDGER_PASSWORD", hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a new ledger
    Init,

    /// Show current configuration and paths
    Config,

    /// User management commands
    #[command(subcommand)]
    User(UserCommands),

    /// Post income
    #[command(subcommand)]
    Income(PostCommands),

    /// Post an expense
    #[command(subcommand)]
    Expense(PostCommands),

    /// Show the fund balance
    Balance,

    /// Check the balance against a replay of all transactions
    Verify,

    /// Recompute the balance from the transactions
    Rebuild,

    /// Transaction listing commands
    #[command(subcommand, alias = "txn")]
    Transaction(TransactionCommands),

    /// Report commands
    #[command(subcommand)]
    Report(ReportCommands),

    /// Export commands
    #[command(subcommand)]
    Export(ExportCommands),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    // Initialize paths and settings
    let paths = LedgerPaths::new()?;
    let settings = Settings::load_or_create(&paths)?;

    // Initialize storage
    let storage = Storage::with_lock_timeout(paths.clone(), settings.lock_timeout())?;
    storage.load_all()?;

    let credentials = Credentials::new(cli.user, cli.password);

    match cli.command {
        Some(Commands::Init) => {
            println!("Initializing FundLedger at: {}", paths.base_dir().display());
            initialize_storage(&paths, &settings)?;
            println!("Initialization complete!");
            println!();
            println!("Register the first accountant with:");
            println!("  fundledger user register <name> --role accountant");
        }
        Some(Commands::Config) => {
            println!("FundLedger Configuration");
            println!("========================");
            println!("Base directory:   {}", paths.base_dir().display());
            println!("Data directory:   {}", paths.data_dir().display());
            println!("Audit log:        {}", paths.audit_log().display());
            println!();
            println!("Settings:");
            println!("  Organization:   {}", settings.organization_name);
            println!("  Currency:       {}", settings.currency_symbol);
            println!("  Date format:    {}", settings.date_format);
            println!("  Report title:   {}", settings.report_title);
            println!("  Lock timeout:   {}ms", settings.lock_timeout_ms);
        }
        Some(Commands::User(cmd)) => {
            handle_user_command(&storage, &settings, &credentials, cmd)?;
        }
        Some(Commands::Income(cmd)) => {
            handle_post_command(&storage, &settings, &credentials, TransactionKind::Income, cmd)?;
        }
        Some(Commands::Expense(cmd)) => {
            handle_post_command(&storage, &settings, &credentials, TransactionKind::Expense, cmd)?;
        }
        Some(Commands::Balance) => {
            handle_balance_command(&storage, &settings, &credentials)?;
        }
        Some(Commands::Verify) => {
            handle_verify_command(&storage, &settings, &credentials)?;
        }
        Some(Commands::Rebuild) => {
            handle_rebuild_command(&storage, &settings, &credentials)?;
        }
        Some(Commands::Transaction(cmd)) => {
            handle_transaction_command(&storage, &settings, &credentials, cmd)?;
        }
        Some(Commands::Report(cmd)) => {
            handle_report_command(&storage, &settings, &credentials, cmd)?;
        }
        Some(Commands::Export(cmd)) => {
            handle_export_command(&storage, &settings, &credentials, cmd)?;
        }
        None => {
            println!("FundLedger - single-fund income and expense ledger");
            println!();
            println!("Run 'fundledger --help' for usage information.");
            println!("Run 'fundledger init' to set up a new ledger.");
        }
    }

    Ok(())
}
