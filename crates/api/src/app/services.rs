//! Backend wiring: turns `Settings` into a `ProductStore`.

use anyhow::Context;

use catalog_infra::ProductStore;

use crate::config::Settings;

pub async fn build_store(settings: &Settings) -> anyhow::Result<ProductStore> {
    if !settings.use_persistent_stores {
        tracing::info!("USE_PERSISTENT_STORES=false; products are kept in memory");
        return Ok(ProductStore::in_memory());
    }

    let store = ProductStore::connect(&settings.db_config())
        .await
        .with_context(|| format!("failed to open database at {}", settings.database_url))?;
    Ok(store)
}
