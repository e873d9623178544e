//! Receipt scan command
//!
//! Reads the OCR text saved next to an image, asks the configured
//! structuring command to read it and previews the result. With `--save`
//! the reviewed draft becomes an expense.

use std::path::PathBuf;

use clap::Args;

use crate::config::Settings;
use crate::display::format_scan_result;
use crate::error::{PocketError, PocketResult};
use crate::scan::{
    CommandStructurer, ReceiptImage, ReceiptStructurer, ResponseFileStructurer, ScanOrchestrator,
    SidecarTextExtractor,
};
use crate::services::{AccountService, CategoryService, TransactionService};
use crate::storage::Storage;

#[derive(Args, Debug)]
pub struct ScanArgs {
    /// Receipt image; its OCR text is read from IMAGE.txt
    image: PathBuf,

    /// Use a saved JSON response instead of calling the structuring command
    #[arg(long)]
    response: Option<PathBuf>,

    /// Save the result as an expense in this account (name or ID)
    #[arg(short, long)]
    save: Option<String>,

    /// Category to use instead of the guessed one (name, key or ID)
    #[arg(short, long)]
    category: Option<String>,
}

pub fn handle_scan_command(storage: &Storage, settings: &Settings, args: ScanArgs) -> PocketResult<()> {
    let user = settings.user_id;

    // Resolve the target account before spending a remote call on the scan
    let account = match &args.save {
        Some(raw) => Some(
            AccountService::new(storage, user)
                .find(raw)?
                .ok_or_else(|| PocketError::account_not_found(raw))?,
        ),
        None => None,
    };

    let structurer: Box<dyn ReceiptStructurer> = match &args.response {
        Some(path) => Box::new(ResponseFileStructurer::new(path)),
        None => Box::new(
            CommandStructurer::from_argv(&settings.scan.structurer_command).ok_or_else(|| {
                PocketError::Config(
                    "No structuring command configured. Run 'pocket config --structurer \"<command>\"' or pass --response".into(),
                )
            })?,
        ),
    };

    let orchestrator = ScanOrchestrator::new(SidecarTextExtractor::new(), structurer)
        .with_confidence_threshold(settings.scan.confidence_threshold);
    let scan = orchestrator.scan(&ReceiptImage::new(&args.image), Some(user))?;

    let categories = CategoryService::new(storage, user);
    let category = match (&args.category, scan.category_key.as_deref()) {
        (Some(raw), _) => Some(
            categories
                .find(raw)?
                .ok_or_else(|| PocketError::category_not_found(raw))?,
        ),
        (None, Some(key)) => categories.find_by_standard_key(key)?,
        (None, None) => None,
    };

    print!(
        "{}",
        format_scan_result(
            &scan,
            category.as_ref().map(|c| c.name.as_str()),
            &settings.currency_symbol
        )
    );

    if let Some(account) = account {
        let service = TransactionService::new(storage, user);
        let mut draft = service.draft_from_scan(&scan, account.id)?;
        if args.category.is_some() {
            draft.category_id = category.map(|c| c.id);
        }
        let txn = service.create(draft)?;
        println!();
        println!("Saved as expense in {}", account.name);
        println!("  ID: {}", txn.id);
    }

    Ok(())
}
