//! Price commands: `check` (one item) and `verify` (a whole bill).

use chrono::{NaiveDate, Utc};
use fairbill_audit::render::{
    render_check_html, render_check_text, render_verification_html, render_verification_text,
};
use fairbill_audit::{BillVerifier, Gateway};
use fairbill_core::{BillLineItem, ItemType, Money};

use super::Context;

/// Parses a `type:name:price` bill line.
///
/// The name may itself contain colons; the type is taken from the first
/// field and the price from the last.
pub fn parse_line_item(arg: &str) -> Result<BillLineItem, String> {
    let (item_type, rest) = arg
        .split_once(':')
        .ok_or_else(|| format!("expected type:name:price, got '{arg}'"))?;
    let (name, price) = rest
        .rsplit_once(':')
        .ok_or_else(|| format!("expected type:name:price, got '{arg}'"))?;

    let item_type: ItemType = item_type.parse().map_err(|e| format!("{e}"))?;
    let price: Money = price.parse().map_err(|e| format!("{e}"))?;
    Ok(BillLineItem::new(name.trim(), item_type, price))
}

/// Checks one charged price, optionally recording it as a quick-check bill.
pub async fn check<G: Gateway + Clone>(
    ctx: &Context<G>,
    item_type: ItemType,
    name: &str,
    price: Money,
    save: bool,
    html: bool,
) -> anyhow::Result<String> {
    let outcome = ctx.checker().check_price(name, item_type, price, save).await?;

    if html {
        return Ok(render_check_html(&outcome.check, &ctx.format));
    }
    ctx.output(&outcome, |outcome| render_check_text(outcome, &ctx.format))
}

/// Bill header for `verify --save`.
#[derive(Debug, Clone)]
pub struct SaveTarget {
    pub patient: String,
    pub hospital: String,
    pub date: Option<NaiveDate>,
}

/// Verifies every line; with a save target the bill and its matched items
/// are stored.
pub async fn verify<G: Gateway + Clone>(
    ctx: &Context<G>,
    lines: Vec<BillLineItem>,
    save: Option<SaveTarget>,
    html: bool,
) -> anyhow::Result<String> {
    let mut verifier = BillVerifier::from_checker(ctx.checker());
    for line in lines {
        verifier.add_item(line)?;
    }

    let Some(target) = save else {
        let verification = verifier.verify_bill().await?;
        if html {
            return Ok(render_verification_html(&verification, &ctx.format));
        }
        return ctx.output(&verification, |v| render_verification_text(v, &ctx.format));
    };

    let date = target.date.unwrap_or_else(|| Utc::now().date_naive());
    let saved = verifier
        .save_bill(&target.patient, &target.hospital, date)
        .await?;

    if html {
        return Ok(render_verification_html(&saved.verification, &ctx.format));
    }
    ctx.output(&saved, |saved| {
        let mut text = render_verification_text(&saved.verification, &ctx.format);
        text.push_str(&format!(
            "Saved bill #{} ({} item(s), total {})\n",
            saved.bill_id,
            saved.items.len(),
            ctx.format.format(saved.bill.total_amount)
        ));
        text
    })
}
