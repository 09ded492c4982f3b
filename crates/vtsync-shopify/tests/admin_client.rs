//! Integration tests for `AdminClient` and `Syncer` against a wiremock
//! Admin API.
//!
//! GraphQL requests all hit the same endpoint, so mocks are told apart by the
//! operation name in the request body.

use rust_decimal_macros::dec;
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vtsync_core::{
    ImagePayload, ProductPayload, ProductStatus, ShopifyConfig, SyncApi, VariantPayload,
};
use vtsync_shopify::{AdminClient, ShopifyError, SyncOptions, SyncReport, Syncer};

const GRAPHQL_PATH: &str = "/admin/api/2025-07/graphql.json";
const LOCATION: &str = "gid://shopify/Location/77";

fn config(location_id: Option<&str>, max_retries: u32) -> ShopifyConfig {
    ShopifyConfig {
        store_url: "https://unused.myshopify.com".to_owned(),
        access_token: "shpat_test".to_owned(),
        location_id: location_id.map(str::to_owned),
        api_version: "2025-07".to_owned(),
        sync_api: SyncApi::GraphQl,
        request_timeout_secs: 5,
        user_agent: "vtsync-test/0.1".to_owned(),
        request_delay_ms: 0,
        max_retries,
        retry_backoff_base_ms: 0,
    }
}

fn test_client(server: &MockServer, location_id: Option<&str>) -> AdminClient {
    AdminClient::with_base_url(&config(location_id, 0), &server.uri())
        .expect("failed to build test AdminClient")
}

fn syncer(client: AdminClient, api: SyncApi, dry_run: bool) -> Syncer {
    Syncer::new(client, SyncOptions { api, dry_run })
}

fn product(sku: &str) -> ProductPayload {
    ProductPayload {
        handle: sku.to_lowercase(),
        title: "Câmara bullet 4MP".to_owned(),
        body_html: "<p>IP67</p>".to_owned(),
        vendor: "Hikvision".to_owned(),
        product_type: "Câmaras de Vigilância".to_owned(),
        tags: vec!["Hikvision".to_owned()],
        status: ProductStatus::Active,
        published: true,
        variants: vec![VariantPayload {
            sku: sku.to_owned(),
            price: dec!(61.50),
            compare_at_price: Some(dec!(86.10)),
            cost: Some(dec!(40.00)),
            barcode: Some("6941264088880".to_owned()),
            inventory_quantity: 100,
            weight_grams: Some(450),
            requires_shipping: true,
            taxable: true,
        }],
        images: vec![
            ImagePayload {
                src: "https://img/1.jpg".to_owned(),
                alt: Some("Câmara bullet 4MP".to_owned()),
                position: 1,
            },
            ImagePayload {
                src: "https://img/2.jpg".to_owned(),
                alt: Some("Câmara bullet 4MP".to_owned()),
                position: 2,
            },
        ],
    }
}

fn gql(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

fn variant_node(n: u32, sku: &str) -> Value {
    json!({
        "id": format!("gid://shopify/ProductVariant/{n}"),
        "sku": sku,
        "inventoryItem": { "id": format!("gid://shopify/InventoryItem/{n}") },
        "product": { "id": format!("gid://shopify/Product/{n}"), "handle": sku.to_lowercase() }
    })
}

fn variants_page(nodes: Vec<Value>, next: Option<&str>) -> ResponseTemplate {
    gql(json!({
        "productVariants": {
            "pageInfo": { "hasNextPage": next.is_some(), "endCursor": next },
            "nodes": nodes
        }
    }))
}

fn created_product() -> ResponseTemplate {
    gql(json!({
        "productCreate": {
            "product": {
                "id": "gid://shopify/Product/500",
                "handle": "ds-1",
                "variants": { "nodes": [{
                    "id": "gid://shopify/ProductVariant/501",
                    "inventoryItem": { "id": "gid://shopify/InventoryItem/502" }
                }] }
            },
            "userErrors": []
        }
    }))
}

/// `{ "<mutation>": { "userErrors": [] } }`
fn no_user_errors(mutation: &str) -> ResponseTemplate {
    let mut data = serde_json::Map::new();
    data.insert(mutation.to_owned(), json!({ "userErrors": [] }));
    gql(Value::Object(data))
}

async fn mount_graphql(
    server: &MockServer,
    operation: &str,
    response: ResponseTemplate,
    times: u64,
) {
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains(operation))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

// ---------------------------------------------------------------------------
// SKU index
// ---------------------------------------------------------------------------

#[tokio::test]
async fn sku_index_follows_cursor_and_skips_blank_and_duplicate_skus() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": null } })))
        .respond_with(variants_page(
            vec![variant_node(1, "DS-1"), variant_node(2, "  ")],
            Some("cursor-1"),
        ))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_partial_json(json!({ "variables": { "after": "cursor-1" } })))
        .respond_with(variants_page(
            vec![variant_node(3, "DS-3"), variant_node(4, "DS-1")],
            None,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let index = test_client(&server, None).fetch_sku_index().await.unwrap();

    assert_eq!(index.len(), 2);
    let first = index.get("DS-1").unwrap();
    assert_eq!(first.product_id, "gid://shopify/Product/1");
    assert_eq!(first.inventory_item_id.as_deref(), Some("gid://shopify/InventoryItem/1"));
    assert_eq!(index.get("DS-3").unwrap().handle, "ds-3");
}

#[tokio::test]
async fn sku_index_sends_access_token_and_page_size() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(wiremock::matchers::header("X-Shopify-Access-Token", "shpat_test"))
        .and(body_partial_json(json!({ "variables": { "first": 250 } })))
        .respond_with(variants_page(vec![], None))
        .expect(1)
        .mount(&server)
        .await;

    let index = test_client(&server, None).fetch_sku_index().await.unwrap();
    assert!(index.is_empty());
}

#[tokio::test]
async fn sku_index_stops_at_pagination_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(variants_page(vec![], Some("same-cursor")))
        .mount(&server)
        .await;

    let err = test_client(&server, None).fetch_sku_index().await.unwrap_err();
    assert!(matches!(err, ShopifyError::PaginationLimit { max_pages: 400 }));
}

#[tokio::test]
async fn throttled_query_is_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(variants_page(vec![variant_node(1, "DS-1")], None))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(&config(None, 2), &server.uri()).unwrap();
    let index = client.fetch_sku_index().await.unwrap();
    assert_eq!(index.len(), 1);
}

#[tokio::test]
async fn throttling_without_retries_surfaces_typed_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Throttled", "extensions": { "code": "THROTTLED" } }]
        })))
        .mount(&server)
        .await;

    let err = test_client(&server, None).fetch_sku_index().await.unwrap_err();
    assert!(matches!(err, ShopifyError::Throttled));
}

#[tokio::test]
async fn http_429_is_retried_after_retry_after() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "0"))
        .up_to_n_times(1)
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(variants_page(vec![], None))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(&config(None, 1), &server.uri()).unwrap();
    assert!(client.fetch_sku_index().await.is_ok());
}

#[tokio::test]
async fn unauthorized_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_string("Invalid API key"))
        .expect(1)
        .mount(&server)
        .await;

    let client = AdminClient::with_base_url(&config(None, 3), &server.uri()).unwrap();
    let err = client.fetch_sku_index().await.unwrap_err();
    assert!(matches!(err, ShopifyError::UnexpectedStatus { status: 401, .. }));
}

// ---------------------------------------------------------------------------
// GraphQL sync
// ---------------------------------------------------------------------------

#[tokio::test]
async fn new_product_is_created_in_three_steps() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![], None), 1).await;
    mount_graphql(&server, "ProductCreate", created_product(), 1).await;
    mount_graphql(
        &server,
        "VariantsBulkUpdate",
        no_user_errors("productVariantsBulkUpdate"),
        1,
    )
    .await;
    mount_graphql(
        &server,
        "InventorySetQuantities",
        no_user_errors("inventorySetQuantities"),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ProductUpdate"))
        .and(body_string_contains("originalSource"))
        .and(body_string_contains("https://img/2.jpg"))
        .respond_with(no_user_errors("productUpdate"))
        .expect(1)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, Some(LOCATION)), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();

    assert_eq!(
        report,
        SyncReport {
            created: 1,
            ..SyncReport::default()
        }
    );
}

#[tokio::test]
async fn inventory_is_set_at_configured_location() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![], None), 1).await;
    mount_graphql(&server, "ProductCreate", created_product(), 1).await;
    mount_graphql(
        &server,
        "VariantsBulkUpdate",
        no_user_errors("productVariantsBulkUpdate"),
        1,
    )
    .await;
    mount_graphql(&server, "ProductUpdate", no_user_errors("productUpdate"), 1).await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("InventorySetQuantities"))
        .and(body_partial_json(json!({ "variables": { "input": { "quantities": [{
            "inventoryItemId": "gid://shopify/InventoryItem/502",
            "locationId": LOCATION,
            "quantity": 100
        }] } } })))
        .respond_with(no_user_errors("inventorySetQuantities"))
        .expect(1)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, Some(LOCATION)), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn existing_sku_is_updated_without_reattaching_images() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![variant_node(9, "DS-1")], None), 1).await;
    mount_graphql(&server, "ProductCreate", created_product(), 0).await;
    mount_graphql(
        &server,
        "InventorySetQuantities",
        no_user_errors("inventorySetQuantities"),
        0,
    )
    .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("originalSource"))
        .respond_with(no_user_errors("productUpdate"))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ProductUpdate"))
        .and(body_partial_json(json!({
            "variables": { "product": { "id": "gid://shopify/Product/9" } }
        })))
        .respond_with(no_user_errors("productUpdate"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("VariantsBulkUpdate"))
        .and(body_partial_json(json!({ "variables": {
            "productId": "gid://shopify/Product/9",
            "variants": [{ "id": "gid://shopify/ProductVariant/9", "price": "61.50" }]
        } })))
        .respond_with(no_user_errors("productVariantsBulkUpdate"))
        .expect(1)
        .mount(&server)
        .await;

    // No location configured: stock is not touched.
    let report = syncer(test_client(&server, None), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();

    assert_eq!(
        report,
        SyncReport {
            updated: 1,
            ..SyncReport::default()
        }
    );
}

#[tokio::test]
async fn variant_failure_after_create_is_partial() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![], None), 1).await;
    mount_graphql(&server, "ProductCreate", created_product(), 1).await;
    mount_graphql(
        &server,
        "VariantsBulkUpdate",
        gql(json!({ "productVariantsBulkUpdate": { "userErrors": [
            {
                "field": ["variants", "0", "price"],
                "message": "Price is invalid",
                "code": "INVALID"
            }
        ] } })),
        1,
    )
    .await;
    mount_graphql(&server, "ProductUpdate", no_user_errors("productUpdate"), 0).await;

    let report = syncer(test_client(&server, None), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();

    assert_eq!(report.partial, 1);
    assert_eq!(report.created, 0);
    assert_eq!(report.failed, 0);
}

#[tokio::test]
async fn media_failure_after_create_is_partial() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![], None), 1).await;
    mount_graphql(&server, "ProductCreate", created_product(), 1).await;
    mount_graphql(
        &server,
        "VariantsBulkUpdate",
        no_user_errors("productVariantsBulkUpdate"),
        1,
    )
    .await;
    mount_graphql(
        &server,
        "ProductUpdate",
        gql(json!({ "productUpdate": { "product": null, "userErrors": [
            { "field": ["media", "0", "originalSource"], "message": "Image URL is invalid" }
        ] } })),
        1,
    )
    .await;

    let report = syncer(test_client(&server, None), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();
    assert_eq!(report.partial, 1);
}

#[tokio::test]
async fn handle_collision_falls_back_to_update() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![], None), 1).await;
    mount_graphql(
        &server,
        "ProductCreate",
        gql(json!({ "productCreate": { "product": null, "userErrors": [
            { "field": ["handle"], "message": "Handle 'ds-1' already in use" }
        ] } })),
        1,
    )
    .await;
    mount_graphql(
        &server,
        "ProductByHandle",
        gql(json!({ "productByIdentifier": {
            "id": "gid://shopify/Product/31",
            "handle": "ds-1",
            "variants": { "nodes": [
                { "id": "gid://shopify/ProductVariant/32", "inventoryItem": null }
            ] }
        } })),
        1,
    )
    .await;
    mount_graphql(&server, "ProductUpdate", no_user_errors("productUpdate"), 1).await;
    mount_graphql(
        &server,
        "VariantsBulkUpdate",
        no_user_errors("productVariantsBulkUpdate"),
        1,
    )
    .await;

    let report = syncer(test_client(&server, None), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();
    assert_eq!(report.updated, 1);
}

#[tokio::test]
async fn failed_create_is_counted_and_batch_continues() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![variant_node(2, "DS-2")], None), 1).await;
    mount_graphql(
        &server,
        "ProductCreate",
        gql(json!({ "productCreate": { "product": null, "userErrors": [
            { "field": ["title"], "message": "Title can't be blank" }
        ] } })),
        1,
    )
    .await;
    mount_graphql(&server, "ProductUpdate", no_user_errors("productUpdate"), 1).await;
    mount_graphql(
        &server,
        "VariantsBulkUpdate",
        no_user_errors("productVariantsBulkUpdate"),
        1,
    )
    .await;

    let report = syncer(test_client(&server, None), SyncApi::GraphQl, false)
        .sync(&[product("DS-1"), product("DS-2")])
        .await
        .unwrap();
    assert_eq!(report.failed, 1);
    assert_eq!(report.updated, 1);
}

#[tokio::test]
async fn dry_run_reports_actions_without_mutating() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![variant_node(2, "DS-2")], None), 1).await;
    mount_graphql(
        &server,
        "ProductByHandle",
        gql(json!({ "productByIdentifier": null })),
        1,
    )
    .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("mutation"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, Some(LOCATION)), SyncApi::GraphQl, true)
        .sync(&[product("DS-1"), product("DS-2")])
        .await
        .unwrap();

    assert_eq!(
        report,
        SyncReport {
            created: 1,
            updated: 1,
            dry_run: true,
            ..SyncReport::default()
        }
    );
}

#[tokio::test]
async fn dry_run_plans_update_when_handle_already_exists() {
    let server = MockServer::start().await;
    mount_graphql(&server, "SkuIndex", variants_page(vec![], None), 1).await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("ProductByHandle"))
        .and(body_partial_json(json!({ "variables": { "handle": "ds-1" } })))
        .respond_with(gql(json!({ "productByIdentifier": {
            "id": "gid://shopify/Product/31",
            "handle": "ds-1",
            "variants": { "nodes": [
                { "id": "gid://shopify/ProductVariant/32", "inventoryItem": null }
            ] }
        } })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .and(body_string_contains("mutation"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, None), SyncApi::GraphQl, true)
        .sync(&[product("DS-1")])
        .await
        .unwrap();

    assert_eq!(
        report,
        SyncReport {
            updated: 1,
            dry_run: true,
            ..SyncReport::default()
        }
    );
}

#[tokio::test]
async fn index_failure_aborts_sync() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(GRAPHQL_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "errors": [{ "message": "Field 'productVariants' doesn't exist" }]
        })))
        .mount(&server)
        .await;

    let err = syncer(test_client(&server, None), SyncApi::GraphQl, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap_err();
    assert!(matches!(err, ShopifyError::GraphQl(_)));
}

// ---------------------------------------------------------------------------
// REST sync
// ---------------------------------------------------------------------------

fn rest_product(id: u64) -> Value {
    json!({ "product": {
        "id": id,
        "handle": "ds-1",
        "variants": [{ "id": id + 1, "sku": "DS-1", "inventory_item_id": id + 2 }]
    } })
}

#[tokio::test]
async fn rest_creates_missing_product_and_sets_stock() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2025-07/products.json"))
        .and(query_param("handle", "ds-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/api/2025-07/products.json"))
        .and(body_partial_json(json!({ "product": {
            "handle": "ds-1",
            "tags": "Hikvision",
            "images": [{ "src": "https://img/1.jpg" }, { "src": "https://img/2.jpg" }]
        } })))
        .respond_with(ResponseTemplate::new(201).set_body_json(rest_product(100)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/api/2025-07/inventory_levels/set.json"))
        .and(body_partial_json(json!({
            "location_id": 77,
            "inventory_item_id": 102,
            "available": 100
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "inventory_level": {} })))
        .expect(1)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, Some(LOCATION)), SyncApi::Rest, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();
    assert_eq!(report.created, 1);
}

#[tokio::test]
async fn rest_updates_product_found_by_handle() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2025-07/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "products": [rest_product(42)["product"].clone()]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/admin/api/2025-07/products/42.json"))
        .and(body_partial_json(json!({ "product": { "id": 42, "variants": [{ "id": 43 }] } })))
        .respond_with(ResponseTemplate::new(200).set_body_json(rest_product(42)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/api/2025-07/products.json"))
        .respond_with(ResponseTemplate::new(201).set_body_json(rest_product(1)))
        .expect(0)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, None), SyncApi::Rest, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();
    assert_eq!(report.updated, 1);
}

#[tokio::test]
async fn rest_validation_error_counts_as_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/api/2025-07/products.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "products": [] })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/admin/api/2025-07/products.json"))
        .respond_with(ResponseTemplate::new(422).set_body_json(json!({
            "errors": { "title": ["can't be blank"] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let report = syncer(test_client(&server, None), SyncApi::Rest, false)
        .sync(&[product("DS-1")])
        .await
        .unwrap();
    assert_eq!(report.failed, 1);
}
