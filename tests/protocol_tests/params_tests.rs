//! Tests for query parameters, ids and body decoding

use clientkeeper::protocol::{form_fields, json_fields, parse_id, ListParams};
use clientkeeper::query::{SortDirection, SortKey};
use clientkeeper::record::{RecordId, Value};
use clientkeeper::{KeeperError, PageRequest};

// =============================================================================
// Helper Functions
// =============================================================================

fn params(pairs: &[(&str, &str)]) -> ListParams {
    let mut params = ListParams::default();
    for (name, value) in pairs {
        let value = Some(value.to_string());
        match *name {
            "filter" => params.filter = value,
            "sortField" => params.sort_field = value,
            "sortOrder" => params.sort_order = value,
            "pageNumber" => params.page_number = value,
            "pageSize" => params.page_size = value,
            other => panic!("unknown parameter {}", other),
        }
    }
    params
}

// =============================================================================
// List Page Tests
// =============================================================================

#[test]
fn test_list_page_parameters() {
    let page = params(&[
        ("filter", "an+"),
        ("sortField", "last_name"),
        ("sortOrder", "asc"),
        ("pageNumber", "2"),
        ("pageSize", "5"),
    ])
    .into_page_request()
    .unwrap();

    let expected = PageRequest::new(5)
        .with_filter("an+")
        .with_sort(SortKey::ascending("last_name"))
        .with_page(2);
    assert_eq!(page, expected);
}

#[test]
fn test_list_page_defaults() {
    let page = params(&[("pageSize", "10")]).into_page_request().unwrap();

    assert_eq!(page.filter, "");
    assert_eq!(page.sort.field, "first_name");
    assert_eq!(page.sort.direction, SortDirection::Descending);
    assert_eq!(page.page_index, 0);
}

#[test]
fn test_empty_sort_field_uses_default() {
    let page = params(&[("sortField", ""), ("sortOrder", "ASC"), ("pageSize", "1")])
        .into_page_request()
        .unwrap();

    assert_eq!(page.sort.field, "first_name");
    assert_eq!(page.sort.direction, SortDirection::Descending);
}

#[test]
fn test_unparsable_page_number_is_first_page() {
    let page = params(&[("pageNumber", "two"), ("pageSize", "3")])
        .into_page_request()
        .unwrap();
    assert_eq!(page.page_index, 0);
    assert_eq!(page.page_size, 3);
}

#[test]
fn test_page_size_required() {
    for bad in [params(&[]), params(&[("pageSize", "-1")]), params(&[("pageSize", "ten")])] {
        assert!(matches!(bad.into_page_request(), Err(KeeperError::Protocol(_))));
    }
}

// =============================================================================
// Id Tests
// =============================================================================

#[test]
fn test_parse_id() {
    assert_eq!(parse_id("00000000000000000000001f").unwrap(), RecordId::new(31));
    assert_eq!(parse_id("2a").unwrap(), RecordId::new(42));
    assert!(matches!(parse_id("not-an-id"), Err(KeeperError::Protocol(_))));
}

// =============================================================================
// Body Tests
// =============================================================================

#[test]
fn test_json_body_drops_client_id() {
    let fields =
        json_fields(br#"{"_id":"00000000000000000000000a","first_name":"Ann","age":30}"#).unwrap();

    assert_eq!(fields.len(), 2);
    assert_eq!(fields.get("age"), Some(&Value::Number(30.0)));
}

#[test]
fn test_blank_json_body_is_empty() {
    assert!(json_fields(b"").unwrap().is_empty());
    assert!(json_fields(b"  \r\n").unwrap().is_empty());
}

#[test]
fn test_bad_json_bodies() {
    assert!(matches!(json_fields(b"{not json"), Err(KeeperError::Protocol(_))));
    assert!(matches!(json_fields(b"[1,2]"), Err(KeeperError::Protocol(_))));
}

#[test]
fn test_form_body_fields() {
    let fields = form_fields(vec![
        ("_id".to_string(), "ff".to_string()),
        ("first_name".to_string(), "Ann".to_string()),
        ("email".to_string(), "ann@x.com".to_string()),
    ]);

    assert_eq!(fields.len(), 2);
    assert_eq!(fields.get("email"), Some(&Value::from("ann@x.com")));
}
