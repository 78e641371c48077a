//! The `submit` subcommand: the write path.

use crate::app;
use crate::cli::{output, SubmitArgs};
use crate::config::Config;
use crate::domain::ReportDraft;
use crate::error::Result;

pub async fn execute(args: SubmitArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();

    let store = app::build_store(&config)?;
    let draft = ReportDraft {
        description: args.description,
        tags: args.tags,
        neighborhood: args.location,
    };
    let id = store.insert_report(draft).await?;

    output::ok(&format!("report submitted: {id}"));
    Ok(())
}
