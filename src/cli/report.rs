//! CLI commands for reports

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};

use crate::config::Settings;
use crate::error::{PocketError, PocketResult};
use crate::reports::{CategoryReport, ReportAggregator, ReportKind};
use crate::services::{BudgetService, CategoryService, TransactionService};
use crate::storage::Storage;

use super::parse_range;

#[derive(Args, Debug, Clone)]
pub struct ReportOptions {
    /// YYYY-MM or YYYY-MM-DD..YYYY-MM-DD (default: this month)
    #[arg(short, long)]
    period: Option<String>,

    /// Export to a CSV file instead of printing
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum ReportCommands {
    /// Spending by category
    Expense {
        #[command(flatten)]
        options: ReportOptions,
        /// Show only the N largest categories
        #[arg(long)]
        top: Option<usize>,
    },
    /// Income by category
    Income {
        #[command(flatten)]
        options: ReportOptions,
        #[arg(long)]
        top: Option<usize>,
    },
    /// Income against expenses per month
    #[command(alias = "cashflow")]
    CashFlow {
        #[command(flatten)]
        options: ReportOptions,
    },
}

pub fn handle_report_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ReportCommands,
) -> PocketResult<()> {
    let user = settings.user_id;
    let transactions = TransactionService::new(storage, user).snapshot()?;
    let categories = CategoryService::new(storage, user).list()?;

    // Budgeted categories lead the category breakdowns
    let mut order = Vec::new();
    for budget in BudgetService::new(storage, user).list()? {
        if !order.contains(&budget.category_id) {
            order.push(budget.category_id);
        }
    }
    let aggregator = ReportAggregator::new(&transactions, &categories).with_order(order);

    match cmd {
        ReportCommands::Expense { options, top } => {
            let range = parse_range(options.period.as_deref())?;
            let report = aggregator.by_category(ReportKind::Expense, range);
            output_category_report(&report, options.output, top, settings)
        }
        ReportCommands::Income { options, top } => {
            let range = parse_range(options.period.as_deref())?;
            let report = aggregator.by_category(ReportKind::Income, range);
            output_category_report(&report, options.output, top, settings)
        }
        ReportCommands::CashFlow { options } => {
            let range = parse_range(options.period.as_deref())?;
            let report = aggregator.cash_flow(range);
            match options.output {
                Some(path) => {
                    report.export_csv(create_output(&path)?)?;
                    println!("Cash flow report exported to: {}", path.display());
                }
                None => print!("{}", report.format_terminal(&settings.currency_symbol)),
            }
            Ok(())
        }
    }
}

fn output_category_report(
    report: &CategoryReport,
    output: Option<PathBuf>,
    top: Option<usize>,
    settings: &Settings,
) -> PocketResult<()> {
    if let Some(path) = output {
        report.export_csv(create_output(&path)?)?;
        println!("{} report exported to: {}", report.kind, path.display());
        return Ok(());
    }

    print!("{}", report.format_terminal(&settings.currency_symbol));

    if let Some(n) = top {
        println!();
        println!("Top {} categories:", n);
        for (i, summary) in report.top(n).iter().enumerate() {
            println!(
                "  {}. {} {} ({:.1}%)",
                i + 1,
                summary.category_name,
                summary.total.format_with_symbol(&settings.currency_symbol),
                summary.percentage
            );
        }
    }
    Ok(())
}

fn create_output(path: &Path) -> PocketResult<BufWriter<File>> {
    let file = File::create(path)
        .map_err(|e| PocketError::Export(format!("Failed to create {}: {}", path.display(), e)))?;
    Ok(BufWriter::new(file))
}
