//! Bill history and dashboard commands: `bills`, `bill`, `stats`.

use anyhow::anyhow;
use fairbill_audit::render::{render_bill_details_text, render_bills_text, render_stats_text};
use fairbill_audit::Gateway;

use super::Context;

pub async fn list<G: Gateway + Clone>(ctx: &Context<G>) -> anyhow::Result<String> {
    let bills = ctx.gateway.list_bills().await?;
    ctx.output(&bills, |bills| render_bills_text(bills, &ctx.format))
}

/// One bill with its stored items. An unknown id is an error here since
/// the user asked for it by number.
pub async fn show<G: Gateway + Clone>(ctx: &Context<G>, id: i64) -> anyhow::Result<String> {
    let details = ctx
        .gateway
        .bill_details(id)
        .await?
        .ok_or_else(|| anyhow!("Bill #{id} not found"))?;
    ctx.output(&details, |details| render_bill_details_text(details, &ctx.format))
}

pub async fn stats<G: Gateway + Clone>(ctx: &Context<G>) -> anyhow::Result<String> {
    let stats = ctx.gateway.stats().await?;
    ctx.output(&stats, render_stats_text)
}
