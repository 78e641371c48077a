//! The `run` subcommand: the foreground dashboard loop.

use tracing::info;

use crate::app::{self, App};
use crate::cli::{output, render, RunArgs};
use crate::config::Config;
use crate::dashboard::LoadState;
use crate::error::Result;

pub async fn execute(args: RunArgs) -> Result<()> {
    let config = Config::load(&args.config)?;
    config.init_logging();
    info!("vigia starting");

    let store = app::build_store(&config)?;
    let (app, mut state_rx) = App::start(&config, store.as_ref()).await?;
    let worker = tokio::spawn(app.run());

    loop {
        if state_rx.changed().await.is_err() {
            break;
        }
        let state = state_rx.borrow_and_update().clone();
        match state {
            LoadState::Loading => {}
            LoadState::Ready(snapshot) => {
                render::dashboard(&snapshot);
                if args.once {
                    break;
                }
            }
            LoadState::Failed(reason) => {
                output::error(&format!("failed to load: {reason}"));
                if args.once {
                    worker.abort();
                    std::process::exit(1);
                }
            }
        }
    }

    // Dropping the app (by aborting its task) drops the feeds and
    // unsubscribes from the store.
    worker.abort();
    info!("vigia stopped");
    Ok(())
}
