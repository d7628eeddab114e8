//! Complaint commands: `complain`, `complaints`.

use fairbill_audit::render::render_complaints_text;
use fairbill_audit::{file_complaint, Gateway};
use fairbill_core::NewComplaint;

use super::Context;

pub async fn file<G: Gateway + Clone>(
    ctx: &Context<G>,
    complaint: NewComplaint,
) -> anyhow::Result<String> {
    let saved = file_complaint(&ctx.gateway, complaint).await?;
    ctx.output(&saved, |saved| {
        format!(
            "Complaint #{} filed against {} (status: {})",
            saved.id, saved.hospital_name, saved.status
        )
    })
}

pub async fn list<G: Gateway + Clone>(ctx: &Context<G>) -> anyhow::Result<String> {
    let complaints = ctx.gateway.list_complaints().await?;
    ctx.output(&complaints, |complaints| {
        render_complaints_text(complaints, &ctx.format)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::context;
    use fairbill_core::Money;

    fn complaint() -> NewComplaint {
        NewComplaint {
            bill_id: None,
            patient_name: "Asha Rao".to_string(),
            patient_email: "asha@example.in".to_string(),
            patient_phone: "9876543210".to_string(),
            hospital_name: "City Hospital".to_string(),
            complaint_details: "Charged above ceiling for ECG".to_string(),
            overcharge_amount: Money::from_minor(5_000),
        }
    }

    #[tokio::test]
    async fn test_file_and_list() {
        let ctx = context().await;
        assert_eq!(list(&ctx).await.unwrap(), "No complaints filed\n");

        let text = file(&ctx, complaint()).await.unwrap();
        assert_eq!(text, "Complaint #1 filed against City Hospital (status: Pending)");

        let text = list(&ctx).await.unwrap();
        assert!(text.contains("[Pending] Asha Rao vs City Hospital (no bill), overcharge ₹50.00"));
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let ctx = context().await;
        let mut bad = complaint();
        bad.patient_email = "not-an-email".to_string();
        assert!(file(&ctx, bad).await.is_err());
    }
}
