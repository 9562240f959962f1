//! Catalog console
//!
//! Loads the configured merchant's catalog and prints a summary, or exports
//! it as a spreadsheet.
//!
//! ```text
//! catalog-console                # summary
//! catalog-console export out.xlsx
//! ```

use anyhow::{Context, bail};
use catalog_client::{BulkJobRunner, CatalogStore, ClientConfig, logger};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ClientConfig::from_env();
    let log_level = std::env::var("LOG_LEVEL").ok();
    logger::init_logger(log_level.as_deref(), false);

    config.validate().context("invalid configuration")?;
    let gateway = Arc::new(config.build_gateway()?);
    let store = Arc::new(CatalogStore::new(gateway, config.merchant_id.clone()));

    let args: Vec<String> = std::env::args().skip(1).collect();
    match args.as_slice() {
        [] => print_summary(&store).await,
        [cmd, path] if cmd == "export" => {
            let runner = BulkJobRunner::new(store);
            let file = runner.export().await?;
            tokio::fs::write(path, &file.bytes)
                .await
                .with_context(|| format!("failed to write {path}"))?;
            println!("{} ({} bytes) -> {}", file.file_name, file.len(), path);
            Ok(())
        }
        _ => bail!("usage: catalog-console [export <path>]"),
    }
}

async fn print_summary<G: catalog_client::CatalogGateway>(
    store: &CatalogStore<G>,
) -> anyhow::Result<()> {
    let count = store.load_categories().await?;
    tracing::info!(merchant_id = %store.merchant_id(), count, "Catalog loaded");

    for category in store.categories() {
        let archived = if category.archived { " [archived]" } else { "" };
        println!(
            "{:<24} {:<8} {:>4} products  {}{}",
            category.name,
            category.status().label(),
            category.product_count,
            category.availability.mode(),
            archived
        );
    }
    Ok(())
}
