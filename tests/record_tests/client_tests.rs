//! Tests for client form validation and partial updates

use clientkeeper::record::{ClientForm, ClientUpdate, Fields, Value};
use clientkeeper::KeeperError;

// =============================================================================
// Helper Functions
// =============================================================================

fn valid_form() -> ClientForm {
    ClientForm::new("Ann", "Lee", "ann.lee@example.com", "555-0100")
}

fn update(first: Option<&str>, last: Option<&str>, email: Option<&str>) -> ClientUpdate {
    ClientUpdate {
        first_name: first.map(Value::from),
        last_name: last.map(Value::from),
        email: email.map(Value::from),
    }
}

// =============================================================================
// Create Form Tests
// =============================================================================

#[test]
fn test_valid_form_passes() {
    assert!(valid_form().validate().is_ok());
}

#[test]
fn test_missing_phone_fails() {
    let mut form = valid_form();
    form.phone = "  ".to_string();

    assert!(matches!(form.validate(), Err(KeeperError::Validation(_))));
}

#[test]
fn test_email_pattern() {
    let accepted = [
        "ann@example.com",
        "ann.lee@example.com",
        "ann-lee@mail.example.co.uk",
        "a_b@example.io",
    ];
    let rejected = [
        "not-an-email",
        "ann@example",
        "ann@example.c",
        "ann@example.comma",
        "ann lee@example.com",
        "@example.com",
    ];

    for email in accepted {
        let mut form = valid_form();
        form.email = email.to_string();
        assert!(form.validate().is_ok(), "expected {} to be accepted", email);
    }
    for email in rejected {
        let mut form = valid_form();
        form.email = email.to_string();
        assert!(form.validate().is_err(), "expected {} to be rejected", email);
    }
}

#[test]
fn test_form_from_fields_round_trip() {
    let form = valid_form();
    let fields = form.clone().into_fields();

    assert_eq!(fields.len(), 4);
    assert_eq!(ClientForm::from_fields(&fields), form);
}

#[test]
fn test_form_from_fields_ignores_non_text() {
    let mut fields = valid_form().into_fields();
    fields.insert("phone".to_string(), Value::Number(5550100.0));

    let form = ClientForm::from_fields(&fields);
    assert_eq!(form.phone, "");
    assert!(form.validate().is_err());
}

// =============================================================================
// Update Tests
// =============================================================================

#[test]
fn test_update_keeps_only_mutable_fields() {
    let mut fields = Fields::new();
    fields.insert("first_name".to_string(), Value::from("Bea"));
    fields.insert("phone".to_string(), Value::from("555-0199"));
    fields.insert("_id".to_string(), Value::from("000000000000000000000009"));

    let update = ClientUpdate::from_fields(fields);
    let out = update.to_fields();

    assert_eq!(out.len(), 1);
    assert_eq!(out.get("first_name"), Some(&Value::from("Bea")));
}

#[test]
fn test_empty_update() {
    assert!(ClientUpdate::from_fields(Fields::new()).to_fields().is_empty());
    assert_eq!(update(None, Some("Lee"), None).to_fields().len(), 1);
}

#[test]
fn test_update_validation() {
    assert!(update(Some("Bea"), Some("Kim"), Some("bea@example.com"))
        .validate()
        .is_ok());

    // Every field is required by the edit form
    assert!(update(Some("Bea"), None, Some("bea@example.com"))
        .validate()
        .is_err());
    assert!(update(Some("Bea"), Some("Kim"), Some("bea"))
        .validate()
        .is_err());

    let numeric = ClientUpdate {
        first_name: Some(Value::Number(1.0)),
        ..update(None, Some("Kim"), Some("bea@example.com"))
    };
    assert!(numeric.validate().is_err());
}
