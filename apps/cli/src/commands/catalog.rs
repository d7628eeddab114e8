//! Catalog commands: `init`, `catalog`, `search`.

use fairbill_audit::render::render_catalog_text;
use fairbill_audit::Gateway;
use fairbill_core::validation::validate_search_query;
use fairbill_core::{ItemType, SEARCH_LIMIT};
use fairbill_db::Database;
use tracing::info;

use super::Context;

/// Seeds the sample catalog into empty tables. Migrations already ran when
/// the database was opened.
pub async fn init(db: &Database) -> anyhow::Result<String> {
    let (medicines, procedures) = db.catalog().seed_defaults().await?;
    info!(medicines, procedures, "Database initialized");

    if medicines == 0 && procedures == 0 {
        Ok("Database ready (catalog already loaded)".to_string())
    } else {
        Ok(format!(
            "Database ready: seeded {medicines} medicines and {procedures} procedures"
        ))
    }
}

/// Full catalog for one item type, ordered by name.
pub async fn list<G: Gateway + Clone>(ctx: &Context<G>, item_type: ItemType) -> anyhow::Result<String> {
    let items = ctx.gateway.list_catalog(item_type).await?;
    ctx.output(&items, |items| render_catalog_text(item_type, items, &ctx.format))
}

/// Up to [`SEARCH_LIMIT`] partial, case-insensitive name matches.
pub async fn search<G: Gateway + Clone>(
    ctx: &Context<G>,
    item_type: ItemType,
    query: &str,
) -> anyhow::Result<String> {
    let query = validate_search_query(query)?;
    let items = ctx
        .gateway
        .search_catalog(item_type, &query, SEARCH_LIMIT)
        .await?;
    ctx.output(&items, |items| render_catalog_text(item_type, items, &ctx.format))
}
