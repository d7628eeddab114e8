//! # Complaint Repository
//!
//! Complaints are filed independently of bills. `bill_id` is an optional
//! soft link with no foreign key, so a complaint may name a bill that was
//! never saved here.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::DbResult;
use fairbill_core::{Complaint, NewComplaint, DEFAULT_COMPLAINT_STATUS};

/// Repository for complaint database operations.
#[derive(Debug, Clone)]
pub struct ComplaintRepository {
    pool: SqlitePool,
}

impl ComplaintRepository {
    /// Creates a new ComplaintRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ComplaintRepository { pool }
    }

    /// Files a complaint with the default status.
    pub async fn insert(&self, complaint: &NewComplaint) -> DbResult<Complaint> {
        debug!(
            hospital = %complaint.hospital_name,
            bill_id = ?complaint.bill_id,
            "Inserting complaint"
        );

        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO complaints (
                bill_id, patient_name, patient_email, patient_phone,
                hospital_name, complaint_details, overcharge_amount,
                status, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(complaint.bill_id)
        .bind(&complaint.patient_name)
        .bind(&complaint.patient_email)
        .bind(&complaint.patient_phone)
        .bind(&complaint.hospital_name)
        .bind(&complaint.complaint_details)
        .bind(complaint.overcharge_amount)
        .bind(DEFAULT_COMPLAINT_STATUS)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let id = result.last_insert_rowid();
        info!(complaint_id = id, "Complaint filed");

        Ok(complaint.clone().into_complaint(id, now))
    }

    /// Lists all complaints, newest first.
    pub async fn list(&self) -> DbResult<Vec<Complaint>> {
        let complaints = sqlx::query_as::<_, Complaint>(
            r#"
            SELECT
                id, bill_id, patient_name, patient_email, patient_phone,
                hospital_name, complaint_details, overcharge_amount,
                status, created_at
            FROM complaints
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(complaints)
    }

    /// Counts filed complaints.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM complaints")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}
