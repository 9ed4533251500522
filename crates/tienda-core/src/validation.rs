//! # Validation Module
//!
//! Input validation utilities for Tienda.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: CLI (clap)                                                   │
//! │  └── Type validation (numbers parse, dates parse)                      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Field rules (positive quantity, name length, email shape)         │
//! │  └── Runs before the workflow performs any write                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── NOT NULL / CHECK constraints                                      │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use tienda_core::validation::{validate_email, validate_quantity};
//!
//! assert!(validate_quantity(5).is_ok());
//! assert!(validate_email("ana@example.com").is_ok());
//! ```

use crate::error::ValidationError;
use crate::types::{Client, NewSale, Product};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

const PERSON_NAME_MIN: usize = 2;
const PERSON_NAME_MAX: usize = 50;
const PRODUCT_NAME_MAX: usize = 200;
const PHONE_MIN_DIGITS: usize = 10;
const PHONE_MAX_DIGITS: usize = 15;
const MAX_AGE: i64 = 120;

// =============================================================================
// String Validators
// =============================================================================

/// Validates that a reference to another record is present.
pub fn validate_reference(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a first or last name.
///
/// ## Rules
/// - 2 to 50 characters after trimming
/// - Letters and spaces only (accented letters allowed)
///
/// ## Example
/// ```rust
/// use tienda_core::validation::validate_person_name;
///
/// assert!(validate_person_name("first_name", "María José").is_ok());
/// assert!(validate_person_name("first_name", "A").is_err());
/// assert!(validate_person_name("first_name", "R2D2").is_err());
/// ```
pub fn validate_person_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    let len = name.chars().count();
    if len < PERSON_NAME_MIN {
        return Err(ValidationError::TooShort {
            field: field.to_string(),
            min: PERSON_NAME_MIN,
        });
    }
    if len > PERSON_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: PERSON_NAME_MAX,
        });
    }

    if !name.chars().all(|c| c.is_alphabetic() || c == ' ') {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must contain only letters and spaces".to_string(),
        });
    }

    Ok(())
}

/// Validates an email address.
///
/// ## Rules
/// - Local part: letters, digits and `+ _ . -`, at least one character
/// - Exactly one `@` followed by a non-empty domain
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }

    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;

    if local.is_empty()
        || !local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '.' | '-'))
    {
        return Err(invalid("invalid characters before @"));
    }

    if domain.is_empty() || domain.contains('@') || domain.chars().any(char::is_whitespace) {
        return Err(invalid("invalid domain"));
    }

    Ok(())
}

/// Validates a phone number: an optional leading `+` then 10 to 15 digits.
///
/// ## Example
/// ```rust
/// use tienda_core::validation::validate_phone;
///
/// assert!(validate_phone("+541145678901").is_ok());
/// assert!(validate_phone("12345").is_err());
/// ```
pub fn validate_phone(phone: &str) -> ValidationResult<()> {
    let phone = phone.trim();

    if phone.is_empty() {
        return Err(ValidationError::Required {
            field: "phone".to_string(),
        });
    }

    let digits = phone.strip_prefix('+').unwrap_or(phone);
    if !digits.chars().all(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidFormat {
            field: "phone".to_string(),
            reason: "must contain only digits and an optional leading +".to_string(),
        });
    }

    if digits.len() < PHONE_MIN_DIGITS || digits.len() > PHONE_MAX_DIGITS {
        return Err(ValidationError::OutOfRange {
            field: "phone digits".to_string(),
            min: PHONE_MIN_DIGITS as i64,
            max: PHONE_MAX_DIGITS as i64,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: "name".to_string(),
        });
    }

    if name.chars().count() > PRODUCT_NAME_MAX {
        return Err(ValidationError::TooLong {
            field: "name".to_string(),
            max: PRODUCT_NAME_MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  sell --quantity 3                                                      │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(3) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       └── OK → stock check                                             │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Validates a catalog price in cents. Zero is not a valid price.
///
/// ## Example
/// ```rust
/// use tienda_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if cents <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "price".to_string(),
        });
    }

    Ok(())
}

/// Validates a stock level. Zero is allowed, negative is not.
pub fn validate_stock(stock: i64) -> ValidationResult<()> {
    if stock < 0 {
        return Err(ValidationError::OutOfRange {
            field: "stock".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

pub fn validate_payment_method_id(id: i64) -> ValidationResult<()> {
    if id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "payment_method_id".to_string(),
        });
    }

    Ok(())
}

pub fn validate_age(age: i64) -> ValidationResult<()> {
    if !(0..=MAX_AGE).contains(&age) {
        return Err(ValidationError::OutOfRange {
            field: "age".to_string(),
            min: 0,
            max: MAX_AGE,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Checks every precondition of a new sale, in field order, stopping at the
/// first failure.
///
/// Existence of the client and product is checked by the workflow, not here.
pub fn validate_new_sale(sale: &NewSale) -> ValidationResult<()> {
    validate_reference("client_id", &sale.client_id)?;
    validate_reference("product_id", &sale.product_id)?;
    validate_quantity(sale.line.quantity())?;

    if !sale.line.unit_price().is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "unit_price".to_string(),
        });
    }

    validate_payment_method_id(sale.payment_method_id)?;

    if sale
        .line
        .unit_price()
        .checked_multiply_quantity(sale.line.quantity())
        .is_none()
    {
        return Err(ValidationError::InvalidFormat {
            field: "total".to_string(),
            reason: "quantity times unit price overflows".to_string(),
        });
    }

    if !sale.line.total().is_positive() {
        return Err(ValidationError::MustBePositive {
            field: "total".to_string(),
        });
    }

    Ok(())
}

pub fn validate_product(product: &Product) -> ValidationResult<()> {
    validate_product_name(&product.name)?;
    validate_reference("category_id", &product.category_id)?;
    validate_price_cents(product.price_cents)?;
    validate_stock(product.stock)?;
    Ok(())
}

pub fn validate_client(client: &Client) -> ValidationResult<()> {
    validate_person_name("first_name", &client.first_name)?;
    validate_person_name("last_name", &client.last_name)?;
    if let Some(phone) = client.phone.as_deref() {
        validate_phone(phone)?;
    }
    if let Some(email) = client.email.as_deref() {
        validate_email(email)?;
    }
    validate_age(client.age)?;
    validate_reference("zone_id", &client.zone_id)?;
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Utc;

    fn new_sale(quantity: i64, price_cents: i64, method: i64) -> NewSale {
        NewSale::new(
            Utc::now(),
            "c-1",
            "p-1",
            quantity,
            Money::from_cents(price_cents),
            method,
        )
    }

    #[test]
    fn test_validate_person_name() {
        assert!(validate_person_name("first_name", "Ana").is_ok());
        assert!(validate_person_name("first_name", "Núñez").is_ok());
        assert!(validate_person_name("first_name", "").is_err());
        assert!(validate_person_name("first_name", "A").is_err());
        assert!(validate_person_name("first_name", &"a".repeat(51)).is_err());
        assert!(validate_person_name("first_name", "Ana-1").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("ana.perez+shop@example.com").is_ok());
        assert!(validate_email("").is_err());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("ana@").is_err());
        assert!(validate_email("an a@example.com").is_err());
    }

    #[test]
    fn test_validate_phone() {
        assert!(validate_phone("1145678901").is_ok());
        assert!(validate_phone("+541145678901").is_ok());
        assert!(validate_phone("123456789").is_err());
        assert!(validate_phone("1234567890123456").is_err());
        assert!(validate_phone("11-4567-8901").is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Shampoo 400ml").is_ok());
        assert!(validate_product_name("  ").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(5000).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock_and_age() {
        assert!(validate_stock(0).is_ok());
        assert!(validate_stock(-1).is_err());
        assert!(validate_age(30).is_ok());
        assert!(validate_age(-1).is_err());
        assert!(validate_age(121).is_err());
    }

    #[test]
    fn test_validate_new_sale_ok() {
        assert!(validate_new_sale(&new_sale(2, 100, 1)).is_ok());
    }

    #[test]
    fn test_validate_new_sale_names_failing_field() {
        let err = validate_new_sale(&new_sale(0, 100, 1)).unwrap_err();
        assert_eq!(err.field(), "quantity");

        let err = validate_new_sale(&new_sale(1, 0, 1)).unwrap_err();
        assert_eq!(err.field(), "unit_price");

        let err = validate_new_sale(&new_sale(1, 100, 0)).unwrap_err();
        assert_eq!(err.field(), "payment_method_id");

        let mut sale = new_sale(1, 100, 1);
        sale.client_id = " ".to_string();
        let err = validate_new_sale(&sale).unwrap_err();
        assert_eq!(err.field(), "client_id");

        let mut sale = new_sale(1, 100, 1);
        sale.product_id.clear();
        let err = validate_new_sale(&sale).unwrap_err();
        assert_eq!(err.field(), "product_id");
    }

    #[test]
    fn test_validate_new_sale_rejects_overflowing_total() {
        let sale = new_sale(2, i64::MAX / 2 + 1, 1);
        let err = validate_new_sale(&sale).unwrap_err();
        assert_eq!(err.field(), "total");

        let err = validate_new_sale(&new_sale(i64::MAX, 100, 1)).unwrap_err();
        assert_eq!(err.field(), "total");
    }
}
