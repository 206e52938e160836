//! Import command implementation.

use crate::cli::ImportArgs;
use crate::cli::output;
use crate::error::Result;
use crate::prompt::InteractivePrompt;
use crate::secrets::OnePasswordCli;
use crate::store::SsmStore;
use crate::sync::{ImportOutcome, Importer};

/// Execute the import command.
pub fn execute(args: &ImportArgs, json: bool) -> Result<()> {
    let options = super::resolve_options(&args.store)?;
    let resolver = OnePasswordCli::new();

    let outcome = super::runtime()?.block_on(async {
        let store = SsmStore::connect(&options).await;
        Importer::new(&store, &resolver, &InteractivePrompt, &options)
            .dry_run(args.dry_run)
            .import(&args.file, |record| {
                if !json {
                    output::info(&format!("Importing {} as {}...", record.name, record.kind));
                }
            })
            .await
    })?;

    if json {
        let value = match &outcome {
            ImportOutcome::Cancelled => serde_json::json!({
                "success": true,
                "cancelled": true,
                "profile": options.profile,
            }),
            ImportOutcome::DryRun(plan) => serde_json::json!({
                "success": true,
                "dry_run": true,
                "plan": plan,
            }),
            ImportOutcome::Imported(stats) => serde_json::json!({
                "success": true,
                "stats": stats,
            }),
        };
        return output::json(&value);
    }

    match outcome {
        ImportOutcome::Cancelled => output::warn("Operation cancelled by user"),
        ImportOutcome::DryRun(plan) => {
            output::heading(&format!(
                "Dry run: {} parameter(s) would be written to {}",
                plan.writes.len(),
                plan.profile
            ));
            for write in &plan.writes {
                let marker = if write.secret_reference { " (op://)" } else { "" };
                output::info(&format!("  {} as {}{marker}", write.name, write.kind));
            }
            if plan.secret_count() > 0 {
                output::info(&format!(
                    "{} secret reference(s) would be resolved",
                    plan.secret_count()
                ));
            }
        }
        ImportOutcome::Imported(stats) => output::success(&format!(
            "Imported {} parameters to {} Parameter Store!",
            stats.imported, stats.profile
        )),
    }

    Ok(())
}
