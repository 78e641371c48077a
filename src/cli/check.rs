//! The `check` subcommands: diagnostics.

use crate::cli::{output, ConfigPathArg};
use crate::config::{Backend, Config};
use crate::error::Result;

/// Validate a configuration file and summarize what it selects.
pub fn config(args: ConfigPathArg) -> Result<()> {
    let config = Config::load(&args.config)?;

    output::ok(&format!("config valid: {}", args.config.display()));
    output::key_value(
        "Backend",
        match config.store.backend {
            Backend::Memory => "memory",
            Backend::Remote => "remote",
        },
    );
    if config.store.backend == Backend::Remote {
        output::key_value("Endpoint", &config.store.ws_url);
    }
    output::key_value("Timezone", &config.dashboard.timezone);
    output::key_value("Alert threshold", config.dashboard.daily_alert_threshold);
    Ok(())
}
