//! # Validation Module
//!
//! The government price ceiling rules, plus input validation for everything
//! a patient types into a check, a bill or a complaint.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI / web form                                               │
//! │  ├── Parsing (Money, ItemType, dates)                                  │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: PriceChecker / BillVerifier                                  │
//! │  └── THIS MODULE: input rules + price ceiling rules                    │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  ├── CHECK (govt_min_price <= govt_max_price)                          │
//! │  └── Foreign key bill_items.bill_id → bills.id                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use fairbill_core::money::Money;
//! use fairbill_core::validation::{is_price_valid, validate_item_name};
//!
//! validate_item_name("Paracetamol 500mg").unwrap();
//!
//! let (min, max) = (Money::from_minor(200), Money::from_minor(500));
//! assert!(is_price_valid(Money::from_minor(300), min, max));
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::BillLineItem;
use crate::MAX_BILL_ITEMS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Highest charge accepted for a single line: ₹100 crore.
///
/// Keeps the sum of a full bill (`MAX_BILL_ITEMS` lines) far inside `i64`.
pub const MAX_CHARGED_PRICE: Money = Money::from_minor(100_000_000_000);

// =============================================================================
// Price Ceiling Rules
// =============================================================================

/// True iff `min <= charged <= max`.
///
/// ```rust
/// use fairbill_core::money::Money;
/// use fairbill_core::validation::is_price_valid;
///
/// let (min, max) = (Money::from_minor(200), Money::from_minor(500));
/// assert!(is_price_valid(Money::from_minor(200), min, max));
/// assert!(is_price_valid(Money::from_minor(500), min, max));
/// assert!(!is_price_valid(Money::from_minor(750), min, max));
/// assert!(!is_price_valid(Money::from_minor(150), min, max));
/// ```
pub fn is_price_valid(charged: Money, min: Money, max: Money) -> bool {
    charged >= min && charged <= max
}

/// Amount charged above the ceiling, never negative.
pub fn overcharge_amount(charged: Money, max: Money) -> Money {
    charged.excess_over(max)
}

// =============================================================================
// String Validators
// =============================================================================

fn require_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Validates a medicine or procedure name as typed on a bill.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
///
/// ## Returns
/// The trimmed name.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    require_text("item name", name, 200)
}

/// Validates a catalog search query.
///
/// ## Rules
/// - Must not be empty (an empty query would match the whole catalog)
/// - Maximum 100 characters
///
/// ## Returns
/// The trimmed query string.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    require_text("query", query, 100)
}

pub fn validate_person_name(name: &str) -> ValidationResult<String> {
    require_text("patient name", name, 200)
}

pub fn validate_hospital_name(name: &str) -> ValidationResult<String> {
    require_text("hospital name", name, 200)
}

/// Validates complaint free text. Up to 5000 characters.
pub fn validate_complaint_details(details: &str) -> ValidationResult<String> {
    require_text("complaint details", details, 5000)
}

/// Validates an email address.
///
/// Only the shape is checked: one `@`, a non-empty local part, and a domain
/// containing a dot that is neither first nor last.
///
/// ```rust
/// use fairbill_core::validation::validate_email;
///
/// assert!(validate_email("asha@example.in").is_ok());
/// assert!(validate_email("asha@localhost").is_err());
/// assert!(validate_email("").is_err());
/// ```
pub fn validate_email(email: &str) -> ValidationResult<String> {
    let email = require_text("email", email, 254)?;

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email
        .split_once('@')
        .ok_or_else(|| invalid("missing '@'"))?;

    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid("not an email address"));
    }

    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("domain must contain a dot"));
    }

    Ok(email)
}

/// Validates a phone number.
///
/// ## Rules
/// - Digits, spaces, `+`, `-`, `(` and `)` only
/// - Between 7 and 15 digits
pub fn validate_phone(phone: &str) -> ValidationResult<String> {
    let phone = require_text("phone", phone, 32)?;

    if !phone
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, ' ' | '+' | '-' | '(' | ')'))
    {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits, spaces, '+', '-' and parentheses".to_string(),
        });
    }

    let digits = phone.chars().filter(char::is_ascii_digit).count();
    if !(7..=15).contains(&digits) {
        return Err(ValidationError::OutOfRange {
            field: "phone digit count".to_string(),
            min: 7,
            max: 15,
        });
    }

    Ok(phone)
}

// =============================================================================
// Money Validators
// =============================================================================

/// Validates a charged price. Zero is allowed (free items); anything above
/// [`MAX_CHARGED_PRICE`] is rejected.
///
/// ```rust
/// use fairbill_core::money::Money;
/// use fairbill_core::validation::{validate_charged_price, MAX_CHARGED_PRICE};
///
/// assert!(validate_charged_price(Money::from_minor(750)).is_ok());
/// assert!(validate_charged_price(Money::zero()).is_ok());
/// assert!(validate_charged_price(MAX_CHARGED_PRICE).is_ok());
/// assert!(validate_charged_price(Money::from_minor(-1)).is_err());
/// ```
pub fn validate_charged_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: "price".to_string(),
        });
    }

    if price > MAX_CHARGED_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_CHARGED_PRICE.minor(),
        });
    }

    Ok(())
}

/// Validates a catalog price range: both bounds non-negative and `min <= max`.
pub fn validate_price_range(min: Money, max: Money) -> ValidationResult<()> {
    if min.is_negative() {
        return Err(ValidationError::Negative {
            field: "govt_min_price".to_string(),
        });
    }

    if max.is_negative() {
        return Err(ValidationError::Negative {
            field: "govt_max_price".to_string(),
        });
    }

    if min > max {
        return Err(ValidationError::InvalidRange {
            min: min.minor(),
            max: max.minor(),
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Validates the line items of a bill about to be saved.
///
/// ## Rules
/// - At least one item
/// - No more than `MAX_BILL_ITEMS`
/// - Every item has a name and a non-negative price
pub fn validate_line_items(items: &[BillLineItem]) -> ValidationResult<()> {
    if items.is_empty() {
        return Err(ValidationError::Required {
            field: "bill items".to_string(),
        });
    }

    if items.len() > MAX_BILL_ITEMS {
        return Err(ValidationError::TooManyItems {
            max: MAX_BILL_ITEMS,
        });
    }

    for item in items {
        validate_item_name(&item.name)?;
        validate_charged_price(item.price)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
