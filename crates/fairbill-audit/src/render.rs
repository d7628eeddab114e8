//! # Presentation
//!
//! Turns check and verification results into markup for a web view, and
//! into plain text for the terminal.
//!
//! ## Markup Classes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  .result-card.valid | .result-card.overcharged                          │
//! │     └── .price-comparison > .price-item > .price.valid | .price.invalid │
//! │     └── .badge.badge-success | .badge.badge-danger                      │
//! │                                                                         │
//! │  .alert.alert-warning   item not found                                  │
//! │  .alert.alert-danger    total overcharge of a bill                      │
//! │  .alert.alert-success   every matched line within limits                │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every interpolated string is escaped; catalog names and user input
//! never reach the markup raw.

use std::fmt::Write;

use fairbill_core::{
    Bill, BillDetails, BillVerification, CatalogItem, Complaint, CurrencyFormat, DashboardStats,
    ItemType, PriceAssessment,
};

use crate::checker::{PriceCheck, PriceCheckOutcome};

/// Alert shown when every matched line is within its ceiling.
pub const ALL_VALID_MESSAGE: &str = "All prices are within government limits!";

// =============================================================================
// Escaping
// =============================================================================

/// Escapes text for use in element content and quoted attributes.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn validity_class(is_valid: bool) -> (&'static str, &'static str, &'static str) {
    if is_valid {
        ("valid", "valid", "badge-success")
    } else {
        ("overcharged", "invalid", "badge-danger")
    }
}

// =============================================================================
// HTML
// =============================================================================

/// Result card for a single price check, or a warning alert when the item
/// was not found.
pub fn render_check_html(check: &PriceCheck, format: &CurrencyFormat) -> String {
    match check {
        PriceCheck::NotFound { message } => {
            format!(
                r#"<div class="alert alert-warning">{}</div>"#,
                escape_html(message)
            )
        }
        PriceCheck::Found(assessment) => assessment_card(assessment, format),
    }
}

fn assessment_card(assessment: &PriceAssessment, format: &CurrencyFormat) -> String {
    let item = &assessment.catalog_item;
    let (card, price, badge) = validity_class(assessment.is_valid);

    let mut html = String::new();
    let _ = write!(html, r#"<div class="result-card {card}">"#);
    let _ = write!(html, "<h3>{}</h3>", escape_html(&item.name));
    if let Some(category) = &item.category {
        let _ = write!(
            html,
            "<p><strong>Category:</strong> {}</p>",
            escape_html(category)
        );
    }
    html.push_str(r#"<div class="price-comparison">"#);
    price_item(&mut html, "Charged Price", Some(price), &format.format(assessment.charged_price));
    price_item(&mut html, "Govt Min Price", None, &format.format(item.govt_min_price));
    price_item(&mut html, "Govt Max Price", None, &format.format(item.govt_max_price));
    html.push_str("</div>");
    let _ = write!(
        html,
        r#"<div class="verdict"><span class="badge {badge}">{}</span></div>"#,
        escape_html(&assessment.message)
    );
    html.push_str("</div>");
    html
}

fn price_item(html: &mut String, label: &str, class: Option<&str>, amount: &str) {
    let class = match class {
        Some(class) => format!("price {class}"),
        None => "price".to_string(),
    };
    let _ = write!(
        html,
        r#"<div class="price-item"><label>{}</label><div class="{class}">{}</div></div>"#,
        escape_html(label),
        escape_html(amount)
    );
}

/// One card per matched line, then a total-overcharge or all-clear alert.
pub fn render_verification_html(verification: &BillVerification, format: &CurrencyFormat) -> String {
    let mut html = String::from(r#"<div class="card"><h3>Bill Verification Results</h3>"#);

    for item in &verification.items {
        let (card, price, badge) = validity_class(item.is_valid);
        let _ = write!(html, r#"<div class="result-card {card}">"#);
        let _ = write!(html, "<h4>{}</h4>", escape_html(&item.line.name));
        html.push_str(r#"<div class="price-comparison">"#);
        price_item(&mut html, "Charged", Some(price), &format.format(item.line.price));
        price_item(
            &mut html,
            "Max Allowed",
            None,
            &format.format(item.catalog_item.govt_max_price),
        );
        html.push_str("</div>");
        let _ = write!(
            html,
            r#"<span class="badge {badge}">{}</span>"#,
            escape_html(&item.message)
        );
        html.push_str("</div>");
    }

    if verification.has_overcharge {
        let _ = write!(
            html,
            r#"<div class="alert alert-danger"><strong>Total Overcharge: {}</strong></div>"#,
            escape_html(&format.format(verification.total_overcharge))
        );
    } else {
        let _ = write!(
            html,
            r#"<div class="alert alert-success">{}</div>"#,
            escape_html(ALL_VALID_MESSAGE)
        );
    }

    html.push_str("</div>");
    html
}

// =============================================================================
// Plain Text
// =============================================================================

/// Terminal summary of one price check.
pub fn render_check_text(outcome: &PriceCheckOutcome, format: &CurrencyFormat) -> String {
    let mut out = String::new();

    match &outcome.check {
        PriceCheck::NotFound { message } => {
            let _ = writeln!(out, "! {message}");
        }
        PriceCheck::Found(assessment) => {
            let item = &assessment.catalog_item;
            let mark = if assessment.is_valid {
                "OK"
            } else if assessment.is_below_minimum() {
                "BELOW MINIMUM"
            } else {
                "OVERCHARGED"
            };
            let _ = writeln!(out, "{} [{}]", item.name, mark);
            if let Some(category) = &item.category {
                let _ = writeln!(out, "  Category:       {category}");
            }
            let _ = writeln!(out, "  Charged price:  {}", format.format(assessment.charged_price));
            let _ = writeln!(out, "  Govt min price: {}", format.format(item.govt_min_price));
            let _ = writeln!(out, "  Govt max price: {}", format.format(item.govt_max_price));
            let _ = writeln!(out, "  {}", assessment.message);
        }
    }

    if let Some(id) = outcome.saved_bill_id {
        let _ = writeln!(out, "Recorded as bill #{id}");
    }
    if let Some(error) = &outcome.save_error {
        let _ = writeln!(out, "! Could not record check: {error}");
    }
    out
}

/// Terminal summary of a bill verification.
///
/// Lines with no catalog match are listed separately; they are excluded
/// from the overcharge total.
pub fn render_verification_text(verification: &BillVerification, format: &CurrencyFormat) -> String {
    let mut out = String::from("Bill Verification Results\n");

    for item in &verification.items {
        let mark = if item.is_valid { "OK " } else { "!! " };
        let _ = writeln!(
            out,
            "{mark}{} ({}): charged {}, max {} - {}",
            item.line.name,
            item.line.item_type,
            format.format(item.line.price),
            format.format(item.catalog_item.govt_max_price),
            item.message
        );
    }

    if !verification.unmatched.is_empty() {
        let _ = writeln!(
            out,
            "Not in government database ({} line(s), not checked):",
            verification.unmatched.len()
        );
        for line in &verification.unmatched {
            let _ = writeln!(
                out,
                "  ?  {} ({}): charged {}",
                line.name,
                line.item_type,
                format.format(line.price)
            );
        }
    }

    if verification.has_overcharge {
        let _ = writeln!(
            out,
            "Total Overcharge: {} ({} line(s) outside limits)",
            format.format(verification.total_overcharge),
            verification.invalid_count()
        );
    } else {
        let _ = writeln!(out, "{ALL_VALID_MESSAGE}");
    }
    out
}

/// One line per catalog entry.
pub fn render_catalog_text(
    item_type: ItemType,
    items: &[CatalogItem],
    format: &CurrencyFormat,
) -> String {
    if items.is_empty() {
        return format!("No {} found\n", item_type.table_name());
    }

    let mut out = String::new();
    for item in items {
        let _ = write!(
            out,
            "#{:<4} {:<40} {} - {}",
            item.id,
            item.name,
            format.format(item.govt_min_price),
            format.format(item.govt_max_price)
        );
        if let Some(unit) = &item.unit {
            let _ = write!(out, " per {unit}");
        }
        if let Some(category) = &item.category {
            let _ = write!(out, " [{category}]");
        }
        out.push('\n');
    }
    out
}

fn bill_line(out: &mut String, bill: &Bill, format: &CurrencyFormat) {
    let status = if bill.overcharged { "OVERCHARGED" } else { "OK" };
    let _ = writeln!(
        out,
        "#{:<4} {} {:<24} {:<24} {:>12} {}",
        bill.id,
        bill.bill_date,
        bill.patient_name,
        bill.hospital_name,
        format.format(bill.total_amount),
        status
    );
}

/// Bill history, newest first as given.
pub fn render_bills_text(bills: &[Bill], format: &CurrencyFormat) -> String {
    if bills.is_empty() {
        return "No bills recorded\n".to_string();
    }

    let mut out = String::new();
    for bill in bills {
        bill_line(&mut out, bill, format);
    }
    out
}

/// A bill header followed by its stored items.
pub fn render_bill_details_text(details: &BillDetails, format: &CurrencyFormat) -> String {
    let mut out = String::new();
    bill_line(&mut out, &details.bill, format);

    if details.items.is_empty() {
        out.push_str("  (no items)\n");
    }
    for item in &details.items {
        let mark = if item.is_overcharged { "!!" } else { "OK" };
        let _ = writeln!(
            out,
            "  {mark} {} ({}): charged {}, max {}",
            item.item_name,
            item.item_type,
            format.format(item.charged_price),
            format.format(item.govt_max_price)
        );
    }
    out
}

/// Complaint list, newest first as given.
pub fn render_complaints_text(complaints: &[Complaint], format: &CurrencyFormat) -> String {
    if complaints.is_empty() {
        return "No complaints filed\n".to_string();
    }

    let mut out = String::new();
    for complaint in complaints {
        let bill = complaint
            .bill_id
            .map(|id| format!("bill #{id}"))
            .unwrap_or_else(|| "no bill".to_string());
        let _ = writeln!(
            out,
            "#{:<4} [{}] {} vs {} ({}), overcharge {}",
            complaint.id,
            complaint.status,
            complaint.patient_name,
            complaint.hospital_name,
            bill,
            format.format(complaint.overcharge_amount)
        );
    }
    out
}

pub fn render_stats_text(stats: &DashboardStats) -> String {
    format!(
        "Total bills:       {}\nOvercharged bills: {}\nValid bills:       {}\nComplaints:        {}\n",
        stats.total_bills, stats.overcharged_bills, stats.valid_bills, stats.total_complaints
    )
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Utc};
    use fairbill_core::{BillLineItem, Money};

    fn paracetamol() -> CatalogItem {
        CatalogItem {
            id: 1,
            name: "Paracetamol 500mg".to_string(),
            category: Some("Pain Relief".to_string()),
            unit: Some("tablet".to_string()),
            govt_min_price: Money::from_minor(200),
            govt_max_price: Money::from_minor(500),
            created_at: Utc::now(),
        }
    }

    fn check(charged: i64) -> PriceCheck {
        PriceCheck::Found(PriceAssessment::assess(
            paracetamol(),
            Money::from_minor(charged),
            &CurrencyFormat::default(),
        ))
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<b>"Tom" & 'Jerry'</b>"#),
            "&lt;b&gt;&quot;Tom&quot; &amp; &#39;Jerry&#39;&lt;/b&gt;"
        );
    }

    #[test]
    fn test_check_card_classes() {
        let format = CurrencyFormat::default();

        let html = render_check_html(&check(300), &format);
        assert!(html.contains(r#"class="result-card valid""#));
        assert!(html.contains("badge-success"));
        assert!(html.contains("₹3.00"));
        assert!(html.contains("₹5.00"));

        let html = render_check_html(&check(750), &format);
        assert!(html.contains(r#"class="result-card overcharged""#));
        assert!(html.contains(r#"class="price invalid""#));
        assert!(html.contains("Overcharged by ₹2.50"));
    }

    #[test]
    fn test_not_found_is_warning() {
        let html = render_check_html(
            &PriceCheck::NotFound {
                message: "Item not found in government database".to_string(),
            },
            &CurrencyFormat::default(),
        );
        assert!(html.starts_with(r#"<div class="alert alert-warning">"#));
    }

    #[test]
    fn test_names_are_escaped() {
        let mut item = paracetamol();
        item.name = "<script>alert(1)</script>".to_string();
        let check = PriceCheck::Found(PriceAssessment::assess(
            item,
            Money::from_minor(300),
            &CurrencyFormat::default(),
        ));

        let html = render_check_html(&check, &CurrencyFormat::default());
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    fn verification(charged: i64) -> BillVerification {
        let line = BillLineItem::new("Paracetamol", ItemType::Medicine, Money::from_minor(charged));
        let assessment =
            PriceAssessment::assess(paracetamol(), line.price, &CurrencyFormat::default());
        let unmatched = BillLineItem::new("Mystery Syrup", ItemType::Medicine, Money::from_minor(900));
        BillVerification::collect(vec![(line, Some(assessment)), (unmatched, None)]).unwrap()
    }

    #[test]
    fn test_verification_alerts() {
        let format = CurrencyFormat::default();

        let html = render_verification_html(&verification(750), &format);
        assert!(html.contains("alert-danger"));
        assert!(html.contains("Total Overcharge: ₹2.50"));

        let html = render_verification_html(&verification(300), &format);
        assert!(html.contains("alert-success"));
        assert!(html.contains(ALL_VALID_MESSAGE));
    }

    #[test]
    fn test_verification_text_lists_unmatched() {
        let text = render_verification_text(&verification(300), &CurrencyFormat::default());
        assert!(text.contains("Mystery Syrup"));
        assert!(text.contains("not checked"));
    }

    #[test]
    fn test_check_text_with_custom_symbol() {
        let outcome = PriceCheckOutcome {
            check: check(750),
            saved_bill_id: Some(4),
            save_error: None,
        };
        let text = render_check_text(&outcome, &CurrencyFormat::new("Rs "));
        assert!(text.contains("[OVERCHARGED]"));
        assert!(text.contains("Rs 7.50"));
        assert!(text.contains("bill #4"));
    }

    #[test]
    fn test_check_text_marks_below_minimum() {
        let outcome = PriceCheckOutcome {
            check: check(100),
            saved_bill_id: None,
            save_error: None,
        };
        let text = render_check_text(&outcome, &CurrencyFormat::default());
        assert!(text.contains("[BELOW MINIMUM]"));
        assert!(text.contains("Price is below government minimum"));
    }

    #[test]
    fn test_verification_text_counts_failed_lines() {
        let text = render_verification_text(&verification(750), &CurrencyFormat::default());
        assert!(text.contains("Total Overcharge: ₹2.50 (1 line(s) outside limits)"));
    }

    #[test]
    fn test_empty_lists() {
        let format = CurrencyFormat::default();
        assert_eq!(render_bills_text(&[], &format), "No bills recorded\n");
        assert_eq!(render_complaints_text(&[], &format), "No complaints filed\n");
        assert_eq!(
            render_catalog_text(ItemType::Procedure, &[], &format),
            "No procedures found\n"
        );
    }

    #[test]
    fn test_bills_and_stats_text() {
        let bill = Bill {
            id: 7,
            patient_name: "Asha Rao".to_string(),
            hospital_name: "City Hospital".to_string(),
            bill_date: NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
            total_amount: Money::from_minor(1300),
            verified: true,
            overcharged: true,
            created_at: Utc::now(),
        };
        let text = render_bills_text(&[bill], &CurrencyFormat::default());
        assert!(text.contains("#7"));
        assert!(text.contains("2024-03-01"));
        assert!(text.contains("₹13.00"));
        assert!(text.contains("OVERCHARGED"));

        let stats = DashboardStats::from_counts(3, 2, 1);
        let text = render_stats_text(&stats);
        assert!(text.contains("Valid bills:       1"));
    }
}
