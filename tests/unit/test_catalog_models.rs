//! Unit tests for catalog, product and field models

use chrono::NaiveDate;
use sage_catalog::models::{
    CatalogDraft, CatalogRecord, CatalogStatus, DateFormat, FieldDefinition, FieldRecord,
    FieldType, Frequency, Mandatory, ProductSchema, ValidationRule,
};
use sage_catalog::services::{FieldSchemaBuilder, encode};
use serde_json::json;

fn record() -> CatalogRecord {
    serde_json::from_value(json!({
        "id": 12,
        "name": "Beverages",
        "icon": "/media/catalog_icons/12.png",
        "tags": ["drinks", " cold ", ""],
        "corporate": "ACME",
        "responsible_user": {"id": 3, "username": "jdoe", "email": "jdoe@acme.com", "full_name": "J Doe"},
        "menu": "Retail",
        "status": "Delayed",
        "product": {"id": 4, "schema_name": "beverages_v1", "domain": "retail", "description": "Drinks"},
        "mandatory": "Not Mandatory",
        "frequency": "Monthly",
        "deadline": "2030-06-30",
        "api_key": "k-123",
        "submission_email": "data@acme.com",
        "authorized_emails_list": ["a@acme.com", "b@acme.com"],
        "sftp_folder": "/in/beverages",
        "created_at": "2025-01-02T03:04:05Z"
    }))
    .unwrap()
}

#[test]
fn test_new_draft_is_empty() {
    let draft = CatalogDraft::new();
    assert!(draft.is_new());
    assert!(draft.product_id.is_none());
    assert!(draft.tags.is_empty());
    assert_eq!(draft.mandatory, Mandatory::IsMandatory);
    assert_eq!(draft.frequency, Frequency::Daily);
    assert_eq!(draft.deadline_text(), "");
}

#[test]
fn test_from_record_hydrates_edit_mode() {
    let draft = CatalogDraft::from_record(&record());
    assert_eq!(draft.catalog_id, Some(12));
    assert_eq!(draft.product_id, Some(4));
    assert!(!draft.is_new());
    assert_eq!(draft.schema.schema_name, "beverages_v1");
    assert_eq!(draft.schema.description, "Drinks");
    assert_eq!(draft.responsible_user_id, Some(3));
    assert_eq!(draft.tags_text(), "cold,drinks");
    assert_eq!(draft.authorized_emails, "a@acme.com\nb@acme.com");
    assert_eq!(draft.deadline, NaiveDate::from_ymd_opt(2030, 6, 30));
    assert_eq!(draft.frequency, Frequency::Monthly);
    assert_eq!(draft.mandatory, Mandatory::NotMandatory);
    assert!(draft.icon.is_none());
}

#[test]
fn test_record_status() {
    assert_eq!(record().status, Some(CatalogStatus::Delayed));
}

#[test]
fn test_reset_returns_to_new() {
    let mut draft = CatalogDraft::from_record(&record());
    draft.reset();
    assert_eq!(draft, CatalogDraft::new());
}

#[test]
fn test_payload_shape() {
    let mut draft = CatalogDraft::new();
    draft.name = "Beverages".to_string();
    draft.set_tags_from_text("drinks, cold,, drinks");
    draft.authorized_emails = "a@acme.com\n\n b@acme.com \n".to_string();
    draft.deadline = NaiveDate::from_ymd_opt(2030, 1, 5);
    draft.icon = Some("data:image/png;base64,AAAA".to_string());

    let payload = serde_json::to_value(draft.payload(9)).unwrap();
    assert_eq!(payload["product_id"], 9);
    assert_eq!(payload["tags"], json!(["cold", "drinks"]));
    assert_eq!(payload["authorized_emails_list"], json!(["a@acme.com", "b@acme.com"]));
    assert_eq!(payload["deadline"], "2030-01-05");
    assert_eq!(payload["mandatory"], "Is Mandatory");
    assert_eq!(payload["frequency"], "Daily");
    assert_eq!(payload["icon"], "data:image/png;base64,AAAA");
}

#[test]
fn test_payload_without_deadline_sends_empty_string() {
    let payload = serde_json::to_value(CatalogDraft::new().payload(1)).unwrap();
    assert_eq!(payload["deadline"], "");
    assert!(payload.get("icon").is_none());
}

#[test]
fn test_product_schema_wire_form() {
    let schema = ProductSchema::new("beverages_v1", "retail");
    assert_eq!(
        serde_json::to_value(&schema).unwrap(),
        json!({"schema_name": "beverages_v1", "domain": "retail", "description": ""})
    );
}

#[test]
fn test_field_type_names() {
    for field_type in FieldType::ALL {
        assert_eq!(FieldType::from_wire(field_type.as_wire()), Some(field_type));
        assert_eq!(field_type.to_string(), field_type.as_str());
    }
    assert_eq!(FieldType::from_wire("float"), Some(FieldType::Decimal));
    assert_eq!(FieldType::from_wire("datetime"), Some(FieldType::Date));
    assert_eq!(FieldType::from_wire("blob"), None);
    assert_eq!("int".parse::<FieldType>(), Ok(FieldType::Int));
}

#[test]
fn test_date_format_tokens() {
    assert_eq!("MM-DD-YYYY".parse::<DateFormat>(), Ok(DateFormat::MonthDayYearDash));
    assert_eq!(DateFormat::Iso.as_str(), "YYYY-MM-DD");
    assert!("YYYY/MM/DD".parse::<DateFormat>().is_err());
}

#[test]
fn test_field_from_record_with_unknown_type() {
    let record: FieldRecord = serde_json::from_value(json!({
        "id": 8,
        "name": "blob",
        "field_type": "binary",
        "is_null": true
    }))
    .unwrap();
    let field = FieldDefinition::from_record(&record);
    assert_eq!(field.field_type, FieldType::Varchar);
    assert_eq!(field.persisted_id, Some(8));
    assert!(!field.is_required);
    assert_eq!(field.validation_rule_id, None);
}

#[test]
fn test_field_definition_yaml_defaults() {
    let field: FieldDefinition = serde_yaml::from_str("name: qty\ntype: INT\n").unwrap();
    assert_eq!(field.field_type, FieldType::Int);
    assert_eq!(field.length, Some(50));
    assert!(field.is_nullable());
    assert!(!field.is_persisted());
}

fn stored_field(field_type: &str, length: Option<u32>) -> FieldRecord {
    serde_json::from_value(json!({
        "id": 21,
        "name": "col",
        "field_type": field_type,
        "length": length,
        "is_null": true
    }))
    .unwrap()
}

#[test]
fn test_hydrated_payload_keeps_stored_type_and_length() {
    for (stored, editor_type) in [
        ("text", FieldType::Varchar),
        ("float", FieldType::Decimal),
        ("datetime", FieldType::Date),
        ("binary", FieldType::Varchar),
        ("int", FieldType::Int),
    ] {
        let field = FieldDefinition::from_record(&stored_field(stored, None));
        assert_eq!(field.field_type, editor_type);

        let payload = field.payload();
        assert_eq!(payload.field_type, stored);
        assert_eq!(payload.length, None);
    }

    let field = FieldDefinition::from_record(&stored_field("varchar", Some(120)));
    assert_eq!(field.payload().length, Some(120));
}

#[test]
fn test_changed_type_sends_new_wire_type() {
    let mut builder = FieldSchemaBuilder::from_records(&[stored_field("text", None)]);
    let local_id = builder.fields()[0].local_id;

    let mut editor = builder.define(local_id).unwrap();
    editor.set_type(FieldType::Varchar);
    assert!(editor.save(&mut builder));
    assert_eq!(builder.get(local_id).unwrap().payload().field_type, "text");

    let mut editor = builder.define(local_id).unwrap();
    editor.set_type(FieldType::Int);
    assert!(editor.save(&mut builder));
    let payload = builder.get(local_id).unwrap().payload();
    assert_eq!(payload.field_type, "int");
    assert_eq!(payload.length, None);
}

#[test]
fn test_unknown_date_format_survives_reencoding() {
    let mut record = stored_field("date", None);
    record.validation_rule = Some(ValidationRule {
        id: Some(5),
        has_date_format: true,
        date_format: "YYYY/MM/DD".to_string(),
        ..Default::default()
    });

    let field = FieldDefinition::from_record(&record);
    assert_eq!(field.date_format, None);
    let rule = encode(&field);
    assert!(rule.has_date_format);
    assert_eq!(rule.date_format, "YYYY/MM/DD");
}

#[test]
fn test_missing_length_round_trips_through_yaml() {
    let field = FieldDefinition::from_record(&stored_field("float", None));
    let yaml = serde_yaml::to_string(&field).unwrap();
    let reloaded: FieldDefinition = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(reloaded.length, None);
    assert_eq!(reloaded.payload().field_type, "float");
}
