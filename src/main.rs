use anyhow::{bail, Result};
use clap::{Parser, Subcommand};

use pocket_ledger::cli::{
    handle_account_command, handle_budget_command, handle_category_command, handle_goal_command,
    handle_report_command, handle_scan_command, handle_transaction_command, AccountCommands,
    BudgetCommands, CategoryCommands, GoalCommands, ReportCommands, ScanArgs, TransactionCommands,
};
use pocket_ledger::config::{PocketPaths, Settings};
use pocket_ledger::storage::{initialize_storage, Storage};

#[derive(Parser)]
#[command(
    name = "pocket",
    version,
    about = "Personal finance ledger with receipt scanning",
    long_about = "pocket tracks accounts, expenses, income, budgets and savings goals \
                  in local JSON files, reports spending by category and cash flow by \
                  month, and turns photographed receipts into transactions."
)]
struct Cli {
    /// Data directory (overrides the platform default)
    #[arg(long, global = true, env = "POCKET_LEDGER_DATA_DIR")]
    data_dir: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and built-in categories
    Init,

    /// Show or change settings
    Config {
        /// Currency symbol used when printing amounts
        #[arg(long)]
        currency: Option<String>,
        /// Command that structures receipt text, e.g. "llm -m gemini-flash"
        #[arg(long)]
        structurer: Option<String>,
        /// Minimum confidence (0-1) for accepting a scanned receipt
        #[arg(long)]
        confidence: Option<f64>,
    },

    /// Account management
    #[command(subcommand)]
    Account(AccountCommands),

    /// Category management
    #[command(subcommand)]
    Category(CategoryCommands),

    /// Transaction management
    #[command(subcommand, alias = "transaction")]
    Txn(TransactionCommands),

    /// Savings goals
    #[command(subcommand)]
    Goal(GoalCommands),

    /// Category budgets
    #[command(subcommand)]
    Budget(BudgetCommands),

    /// Reports
    #[command(subcommand)]
    Report(ReportCommands),

    /// Scan a receipt image
    Scan(ScanArgs),
}

fn main() -> Result<()> {
    pocket_ledger::init_tracing();
    let cli = Cli::parse();

    let paths = match cli.data_dir {
        Some(dir) => PocketPaths::with_base_dir(dir),
        None => PocketPaths::new()?,
    };
    let mut settings = Settings::load_or_create(&paths)?;

    let command = match cli.command {
        None => {
            println!("pocket - personal finance ledger");
            println!();
            println!("Run 'pocket init' to get started, or 'pocket --help' for usage.");
            return Ok(());
        }
        Some(Commands::Init) => {
            println!("Initializing pocket-ledger at: {}", paths.base_dir().display());
            let seeded = initialize_storage(&paths)?;
            settings.save(&paths)?;
            if seeded > 0 {
                println!("Created {} built-in categories.", seeded);
            }
            println!("Initialization complete!");
            println!("Run 'pocket account add <name>' to create your first account.");
            return Ok(());
        }
        Some(Commands::Config {
            currency,
            structurer,
            confidence,
        }) => {
            let changed = currency.is_some() || structurer.is_some() || confidence.is_some();
            if changed && !paths.is_initialized() {
                bail!("pocket-ledger is not initialized. Run 'pocket init' first.");
            }
            if let Some(currency) = currency {
                settings.currency_symbol = currency;
            }
            if let Some(structurer) = structurer {
                settings.scan.structurer_command =
                    structurer.split_whitespace().map(str::to_string).collect();
            }
            if let Some(confidence) = confidence {
                if !(0.0..=1.0).contains(&confidence) {
                    bail!("Confidence must be between 0 and 1");
                }
                settings.scan.confidence_threshold = confidence;
            }
            if changed {
                settings.save(&paths)?;
            }

            println!("pocket-ledger configuration");
            println!("===========================");
            println!("Base directory: {}", paths.base_dir().display());
            println!("Data directory: {}", paths.data_dir().display());
            println!("Initialized:    {}", paths.is_initialized());
            println!();
            println!("User:           {}", settings.user_id);
            println!("Currency:       {}", settings.currency_symbol);
            println!("Date format:    {}", settings.date_format);
            println!("Scan confidence threshold: {}", settings.scan.confidence_threshold);
            if settings.scan.structurer_command.is_empty() {
                println!("Structuring command: (not set)");
            } else {
                println!("Structuring command: {}", settings.scan.structurer_command.join(" "));
            }
            return Ok(());
        }
        Some(command) => command,
    };

    if !paths.is_initialized() {
        bail!("pocket-ledger is not initialized. Run 'pocket init' first.");
    }
    let storage = Storage::open(paths)?;

    match command {
        Commands::Account(cmd) => handle_account_command(&storage, &settings, cmd)?,
        Commands::Category(cmd) => handle_category_command(&storage, &settings, cmd)?,
        Commands::Txn(cmd) => handle_transaction_command(&storage, &settings, cmd)?,
        Commands::Goal(cmd) => handle_goal_command(&storage, &settings, cmd)?,
        Commands::Budget(cmd) => handle_budget_command(&storage, &settings, cmd)?,
        Commands::Report(cmd) => handle_report_command(&storage, &settings, cmd)?,
        Commands::Scan(args) => handle_scan_command(&storage, &settings, args)?,
        Commands::Init | Commands::Config { .. } => unreachable!("handled above"),
    }

    Ok(())
}
