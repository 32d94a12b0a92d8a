//! End-to-end tests of the catalog submit workflow against an in-process
//! fake of the REST API.
//!
//! These tests verify:
//! 1. The write order: schema, fields, rules, catalog
//! 2. Local validation failures never reach the network
//! 3. Field failures are reported without failing the catalog
//! 4. Retries and edit mode update records instead of duplicating them

#[path = "../common/fake_api.rs"]
mod fake_api;

use axum::http::{Method, StatusCode};
use chrono::{Days, Local};
use fake_api::{FakeApi, TOKEN};
use sage_catalog::session::StaticSession;
use sage_catalog::{
    ApiError, CatalogDraft, CatalogOrchestrator, ClientConfig, FieldDefinition, FieldType,
    HttpCatalogApi, ProductSchema, WorkflowError,
};
use serde_json::{Value, json};
use std::sync::Arc;

async fn setup_with_token(token: &str) -> (FakeApi, CatalogOrchestrator) {
    let (fake, base_url) = FakeApi::start().await;
    let config = ClientConfig::new(&base_url).unwrap();
    let api = Arc::new(HttpCatalogApi::new(&config).unwrap());
    let orchestrator = CatalogOrchestrator::new(api, Arc::new(StaticSession::new(token)));
    (fake, orchestrator)
}

async fn setup() -> (FakeApi, CatalogOrchestrator) {
    setup_with_token(TOKEN).await
}

fn new_draft() -> CatalogDraft {
    let mut draft = CatalogDraft::new();
    draft.name = "Beverages".to_string();
    draft.schema = ProductSchema::new("beverages_v1", "retail");
    draft.corporate = "ACME".to_string();
    draft.set_tags_from_text("drinks, cold");
    draft.deadline = Local::now().date_naive().checked_add_days(Days::new(30));
    draft.submission_email = "data@acme.com".to_string();
    draft.authorized_emails = "a@acme.com\nb@acme.com".to_string();
    draft
}

fn sku_field() -> FieldDefinition {
    let mut sku = FieldDefinition::new("sku");
    sku.is_required = true;
    sku.is_unique = true;
    sku
}

#[tokio::test]
async fn test_new_catalog_writes_in_order() {
    let (fake, orchestrator) = setup().await;
    let mut draft = new_draft();
    let mut price = FieldDefinition::new("price").with_type(FieldType::Decimal);
    price.min_value = Some(0.0);
    price.decimal_places = Some(2);
    let mut fields = vec![sku_field(), price];

    let outcome = orchestrator.submit(&mut draft, &mut fields).await.unwrap();

    assert!(outcome.success, "errors: {:?}", outcome.errors);
    assert!(outcome.is_complete());
    assert_eq!(
        fake.call_log(),
        vec![
            "POST /api/products/",
            "POST /api/product/1/field/",
            "POST /api/product/1/field/",
            "POST /api/product/1/field/2/validation-rule/",
            "POST /api/product/1/field/3/validation-rule/",
            "POST /api/catalogs/",
        ]
    );
    assert_eq!(outcome.product_id, Some(1));
    assert_eq!(outcome.catalog_id, Some(6));
    assert_eq!(draft.catalog_id, Some(6));
    assert_eq!(fields[0].persisted_id, Some(2));
    assert_eq!(fields[1].validation_rule_id, Some(5));

    let calls = fake.calls();
    let sku_body = &calls[1].body;
    assert_eq!(sku_body["field_type"], "varchar");
    assert_eq!(sku_body["is_null"], false);
    let price_body = &calls[2].body;
    assert_eq!(price_body["field_type"], "decimal");
    assert_eq!(price_body["is_null"], true);

    let price_rule = &calls[4].body;
    assert_eq!(price_rule["has_min_max"], true);
    assert_eq!(price_rule["has_max_decimal"], true);
    assert_eq!(price_rule["max_decimal_places"], 2);
    assert_eq!(price_rule["is_picklist"], false);

    let catalog_body = &calls[5].body;
    assert_eq!(catalog_body["product_id"], 1);
    assert_eq!(catalog_body["tags"], json!(["cold", "drinks"]));
    assert_eq!(
        catalog_body["authorized_emails_list"],
        json!(["a@acme.com", "b@acme.com"])
    );
    assert_eq!(catalog_body["deadline"], draft.deadline_text());
    assert!(catalog_body.get("icon").is_none());
}

#[tokio::test]
async fn test_duplicate_field_names_abort_without_calls() {
    let (fake, orchestrator) = setup().await;
    let mut fields = vec![FieldDefinition::new("sku"), FieldDefinition::new("sku")];

    let outcome = orchestrator
        .submit(&mut new_draft(), &mut fields)
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.errors.iter().any(|e| e.contains("sku") && e.contains("unique")));
    assert!(fake.calls().is_empty());
    assert!(fake.products().is_empty());
    assert!(fake.catalogs().is_empty());
}

#[tokio::test]
async fn test_invalid_authorized_email_aborts_without_calls() {
    let (fake, orchestrator) = setup().await;
    let mut draft = new_draft();
    draft.authorized_emails = "a@b.com\nnot-an-email".to_string();

    let outcome = orchestrator
        .submit(&mut draft, &mut [sku_field()])
        .await
        .unwrap();

    assert!(!outcome.success);
    assert!(outcome.errors.iter().any(|e| e.contains("not-an-email")));
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_deadline_not_in_future_aborts_without_calls() {
    let (fake, orchestrator) = setup().await;
    let mut draft = new_draft();
    draft.deadline = Some(Local::now().date_naive());

    let outcome = orchestrator.submit(&mut draft, &mut []).await.unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.errors, vec!["Deadline must be a future date"]);
    assert!(fake.calls().is_empty());
}

#[tokio::test]
async fn test_field_failure_keeps_overall_success() {
    let (fake, orchestrator) = setup().await;
    fake.fail(
        Method::POST,
        "/field/",
        StatusCode::INTERNAL_SERVER_ERROR,
        r#"{"error": "database unavailable"}"#,
    );

    let mut fields = vec![sku_field()];
    let outcome = orchestrator
        .submit(&mut new_draft(), &mut fields)
        .await
        .unwrap();

    assert!(outcome.success);
    assert!(!outcome.is_complete());
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("sku"));
    assert!(outcome.errors[0].contains("database unavailable"));
    assert_eq!(fake.products().len(), 1);
    assert_eq!(fake.catalogs().len(), 1);
    assert!(
        !fake
            .call_log()
            .iter()
            .any(|c| c.contains("validation-rule"))
    );
}

#[tokio::test]
async fn test_schema_failure_aborts_remaining_steps() {
    let (fake, orchestrator) = setup().await;
    fake.fail(
        Method::POST,
        "/products/",
        StatusCode::BAD_REQUEST,
        r#"{"schema_name": ["product with this schema name already exists."]}"#,
    );

    let outcome = orchestrator
        .submit(&mut new_draft(), &mut [sku_field()])
        .await
        .unwrap();

    assert!(!outcome.success);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].contains("already exists"));
    assert_eq!(fake.call_log(), vec!["POST /api/products/"]);
}

#[tokio::test]
async fn test_retry_updates_instead_of_duplicating() {
    let (fake, orchestrator) = setup().await;
    fake.fail(
        Method::POST,
        "/field/",
        StatusCode::INTERNAL_SERVER_ERROR,
        "temporary failure",
    );

    let mut draft = new_draft();
    let mut fields = vec![sku_field()];
    let first = orchestrator.submit(&mut draft, &mut fields).await.unwrap();
    assert_eq!(first.errors.len(), 1);

    fake.clear_failures();
    let second = orchestrator.submit(&mut draft, &mut fields).await.unwrap();

    assert!(second.is_complete());
    assert_eq!(second.catalog_id, first.catalog_id);
    assert_eq!(fake.products().len(), 1);
    assert_eq!(fake.catalogs().len(), 1);
    assert_eq!(fake.fields().len(), 1);

    let log = fake.call_log();
    assert!(log.contains(&"PUT /api/products/1/".to_string()));
    let catalog_id = second.catalog_id.unwrap();
    assert!(log.contains(&format!("PUT /api/catalogs/{}/", catalog_id)));
}

#[tokio::test]
async fn test_edit_existing_catalog() {
    let (fake, orchestrator) = setup().await;
    let catalog_id = fake.seed_catalog("Snacks", &["sku", "name"]);

    let (mut draft, mut builder) = orchestrator.load_for_edit(catalog_id).await.unwrap();
    assert!(!draft.is_new());
    assert_eq!(draft.name, "Snacks");
    assert_eq!(builder.len(), 2);
    assert!(builder.fields()[0].validation_rule_id.is_some());

    draft.name = "Snacks & Sweets".to_string();
    let mut editor = builder.add_field();
    editor.set_name("weight").set_type(FieldType::Decimal);
    assert!(editor.save(&mut builder));

    let outcome = orchestrator
        .submit(&mut draft, builder.fields_mut())
        .await
        .unwrap();
    assert!(outcome.is_complete(), "errors: {:?}", outcome.errors);
    assert_eq!(outcome.catalog_id, Some(catalog_id));

    let log = fake.call_log();
    let writes: Vec<&String> = log.iter().filter(|c| !c.starts_with("GET")).collect();
    assert!(writes[0].starts_with("PUT /api/products/"));
    assert!(writes[1].starts_with("PUT /api/product/"));
    assert!(writes[2].starts_with("PUT /api/product/"));
    assert!(writes[3].starts_with("POST /api/product/"));
    assert!(writes[4].contains("/validation-rule/") && writes[4].starts_with("PUT"));
    assert!(writes[5].contains("/validation-rule/") && writes[5].starts_with("PUT"));
    assert!(writes[6].ends_with("/validation-rule/") && writes[6].starts_with("POST"));
    assert_eq!(*writes[7], format!("PUT /api/catalogs/{}/", catalog_id));

    assert_eq!(fake.catalogs().len(), 1);
    assert_eq!(fake.catalogs()[0]["name"], "Snacks & Sweets");
    assert_eq!(fake.fields().len(), 3);
}

#[tokio::test]
async fn test_edit_keeps_stored_column_types_and_lengths() {
    let (fake, orchestrator) = setup().await;
    let catalog_id = fake.seed_catalog_with_columns(
        "Ledger",
        &[
            ("notes", "text", None),
            ("ratio", "float", None),
            ("seen_at", "datetime", None),
            ("code", "binary", Some(8)),
        ],
    );

    let (mut draft, mut builder) = orchestrator.load_for_edit(catalog_id).await.unwrap();
    let outcome = orchestrator
        .submit(&mut draft, builder.fields_mut())
        .await
        .unwrap();
    assert!(outcome.is_complete(), "errors: {:?}", outcome.errors);

    let field_writes: Vec<Value> = fake
        .calls()
        .into_iter()
        .filter(|c| c.method == "PUT" && c.path.contains("/field/") && !c.path.contains("validation-rule"))
        .map(|c| c.body)
        .collect();
    assert_eq!(field_writes.len(), 4);
    for body in &field_writes {
        let expected = match body["name"].as_str().unwrap() {
            "notes" => ("text", Value::Null),
            "ratio" => ("float", Value::Null),
            "seen_at" => ("datetime", Value::Null),
            "code" => ("binary", json!(8)),
            other => panic!("unexpected field {}", other),
        };
        assert_eq!(body["field_type"], expected.0);
        assert_eq!(body["length"], expected.1);
    }
}

#[tokio::test]
async fn test_rejected_token_is_not_authenticated() {
    let (fake, orchestrator) = setup_with_token("stale-token").await;

    let result = orchestrator
        .submit(&mut new_draft(), &mut [sku_field()])
        .await;

    assert_eq!(result, Err(WorkflowError::NotAuthenticated));
    assert_eq!(fake.call_log(), vec!["POST /api/products/"]);
}

#[tokio::test]
async fn test_delete_requires_staff() {
    let (fake, orchestrator) = setup().await;
    let catalog_id = fake.seed_catalog("Snacks", &[]);
    fake.fail(
        Method::DELETE,
        "/catalogs/",
        StatusCode::FORBIDDEN,
        r#"{"error": "Only staff members can delete catalogs"}"#,
    );

    let err = orchestrator.delete_catalog(catalog_id).await.unwrap_err();
    assert_eq!(
        err,
        WorkflowError::Api(ApiError::Status {
            status: 403,
            message: "Only staff members can delete catalogs".to_string()
        })
    );

    fake.clear_failures();
    orchestrator.delete_catalog(catalog_id).await.unwrap();
    assert!(fake.catalogs().is_empty());
}

#[tokio::test]
async fn test_list_catalogs_by_product() {
    let (fake, orchestrator) = setup().await;
    fake.seed_catalog("Snacks", &[]);
    let second = fake.seed_catalog("Drinks", &[]);
    let product_id = orchestrator
        .get_catalog(second)
        .await
        .unwrap()
        .product
        .id;

    assert_eq!(orchestrator.list_catalogs(None).await.unwrap().len(), 2);
    let filtered = orchestrator.list_catalogs(Some(product_id)).await.unwrap();
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].name, "Drinks");
}
