//! Export command implementation.

use crate::cli::ExportArgs;
use crate::cli::output;
use crate::error::{Error, Result};
use crate::prompt::InteractivePrompt;
use crate::store::{Query, SsmStore};
use crate::sync::{ExportOutcome, ExportRequest, Exporter, check_store_path};

/// Execute the export command.
pub fn execute(args: &ExportArgs, json: bool) -> Result<()> {
    check_store_path(&args.path).map_err(Error::InvalidArgument)?;
    let options = super::resolve_options(&args.store)?;

    let request = ExportRequest {
        destination: args.file.clone(),
        query: Query {
            path: args.path.clone(),
            recursive: args.recursive,
            decrypt: args.decrypt,
        },
    };

    let outcome = super::runtime()?.block_on(async {
        let store = SsmStore::connect(&options).await;
        Exporter::new(&store, &InteractivePrompt, &options)
            .export(&request)
            .await
    })?;

    if json {
        let value = match &outcome {
            ExportOutcome::Cancelled => serde_json::json!({
                "success": true,
                "cancelled": true,
                "profile": options.profile,
            }),
            ExportOutcome::NoParameters { skipped } => serde_json::json!({
                "success": true,
                "exported": 0,
                "skipped": skipped,
                "profile": options.profile,
                "path": request.query.path,
            }),
            ExportOutcome::Exported(stats) => serde_json::json!({
                "success": true,
                "profile": options.profile,
                "stats": stats,
            }),
        };
        return output::json(&value);
    }

    match outcome {
        ExportOutcome::Cancelled => output::warn("Operation cancelled by user"),
        ExportOutcome::NoParameters { skipped } => {
            warn_skipped(skipped);
            output::warn("No parameters found to export");
        }
        ExportOutcome::Exported(stats) => {
            warn_skipped(stats.skipped);
            output::success(&format!(
                "Exported {} parameters to {}!",
                stats.exported,
                stats.path.display()
            ));
        }
    }

    Ok(())
}

fn warn_skipped(skipped: usize) {
    if skipped > 0 {
        output::warn(&format!(
            "Skipped {skipped} parameter(s) that cannot be represented (e.g. StringList)"
        ));
    }
}
