//! Complaint filing.
//!
//! Every field is validated and trimmed before the insert. A `bill_id` is
//! accepted as given, even when no such bill exists.

use fairbill_core::validation::{
    validate_complaint_details, validate_email, validate_hospital_name, validate_person_name,
    validate_phone,
};
use fairbill_core::{Complaint, NewComplaint, ValidationError};
use tracing::info;

use crate::error::AuditResult;
use crate::gateway::Gateway;

/// Checks a complaint form and returns the cleaned payload.
pub fn validate_complaint(complaint: NewComplaint) -> AuditResult<NewComplaint> {
    if complaint.overcharge_amount.is_negative() {
        return Err(ValidationError::Negative {
            field: "overcharge amount".to_string(),
        }
        .into());
    }

    Ok(NewComplaint {
        bill_id: complaint.bill_id,
        patient_name: validate_person_name(&complaint.patient_name)?,
        patient_email: validate_email(&complaint.patient_email)?,
        patient_phone: validate_phone(&complaint.patient_phone)?,
        hospital_name: validate_hospital_name(&complaint.hospital_name)?,
        complaint_details: validate_complaint_details(&complaint.complaint_details)?,
        overcharge_amount: complaint.overcharge_amount,
    })
}

/// Validates and stores a complaint. New complaints start as `Pending`.
pub async fn file_complaint<G: Gateway>(
    gateway: &G,
    complaint: NewComplaint,
) -> AuditResult<Complaint> {
    let complaint = validate_complaint(complaint)?;
    let saved = gateway.insert_complaint(complaint).await?;

    info!(complaint_id = saved.id, bill_id = ?saved.bill_id, "Complaint filed");
    Ok(saved)
}
