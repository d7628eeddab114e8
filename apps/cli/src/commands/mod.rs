//! # CLI Commands
//!
//! Every command takes a [`Context`] and returns the text to print, so the
//! handlers can be exercised against any [`Gateway`].
//!
//! ```text
//! commands/
//! ├── mod.rs        ◄─── Context + output helpers
//! ├── catalog.rs    ◄─── init, catalog, search
//! ├── check.rs      ◄─── check, verify
//! ├── bill.rs       ◄─── bills, bill, stats
//! └── complaint.rs  ◄─── complain, complaints
//! ```

pub mod bill;
pub mod catalog;
pub mod check;
pub mod complaint;

use fairbill_audit::{Gateway, PriceChecker};
use fairbill_core::CurrencyFormat;
use serde::Serialize;

/// Everything a command handler needs.
#[derive(Debug, Clone)]
pub struct Context<G> {
    pub gateway: G,
    pub format: CurrencyFormat,
    /// Print JSON instead of text.
    pub json: bool,
}

impl<G: Gateway + Clone> Context<G> {
    pub fn new(gateway: G, format: CurrencyFormat, json: bool) -> Self {
        Context {
            gateway,
            format,
            json,
        }
    }

    pub(crate) fn checker(&self) -> PriceChecker<G> {
        PriceChecker::new(self.gateway.clone()).with_format(self.format.clone())
    }

    /// JSON when `--json` was given, otherwise the text rendering.
    pub(crate) fn output<T: Serialize>(
        &self,
        value: &T,
        text: impl FnOnce(&T) -> String,
    ) -> anyhow::Result<String> {
        if self.json {
            Ok(serde_json::to_string_pretty(value)?)
        } else {
            Ok(text(value))
        }
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use fairbill_audit::MemoryGateway;

    pub async fn context() -> Context<MemoryGateway> {
        Context::new(
            MemoryGateway::with_sample_catalog().await,
            CurrencyFormat::default(),
            false,
        )
    }
}
