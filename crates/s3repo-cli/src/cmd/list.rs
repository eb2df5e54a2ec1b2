use std::io::Write;

use anyhow::Result;
use s3repo_core::{ObjectStore, SelectionObserver, resolve_from_store};

use crate::config::Config;
use crate::ui::list::{write_json, write_listing};

/// List compatible artifacts of the configured service.
pub async fn list(
    config: &Config,
    store: &dyn ObjectStore,
    observer: &dyn SelectionObserver,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    let outcome = resolve_from_store(store, &config.service, &config.pattern, observer).await?;
    outcome.require_winner(&config.service)?;
    tracing::debug!(
        service = %config.service,
        compatible = outcome.compatible.len(),
        "listing compatible artifacts"
    );

    if json {
        write_json(out, &config.service, &config.pattern, &outcome)?;
    } else {
        write_listing(out, &outcome)?;
    }
    Ok(())
}
