mod common;

use axum::http::{Method, StatusCode};
use common::{LOGIN_PATH, MockApi, signed_in, staff};
use serde_json::json;
use shop_admin::{
    AdminApp, AppConfig, AppError,
    client::{MultipartForm, RequestBody},
    config::{ApiConfig, ListingConfig, SessionConfig},
    models::{Brand, UserRole},
    services::{
        ListParams, auth_service, brand_service, category_service, discount_service,
        product_image_service, product_service, product_specification_service, stats_service,
        tag_service, user_service,
    },
    session::SessionStore,
};
use std::time::Duration;

fn app(mock: &MockApi, session: SessionStore) -> AdminApp {
    let config = AppConfig {
        api: ApiConfig::new(mock.base_url.clone()),
        session: SessionConfig {
            file: "unused.json".into(),
        },
        listing: ListingConfig {
            page_size: 10,
            cache_ttl: Duration::from_secs(60),
        },
    };
    AdminApp::with_session(&config, session).unwrap()
}

#[tokio::test]
async fn list_sends_page_limit_and_search() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    let params = ListParams::new().search("can").page(2).limit(10);
    brand_service::list(&client, &params).await.unwrap();

    let request = mock.last_request();
    assert_eq!(request.method, Method::GET);
    assert_eq!(request.path, "/api/brands/get.php");
    assert_eq!(request.query.as_deref(), Some("page=2&limit=10&q=can"));
    assert_eq!(request.authorization.as_deref(), Some("Bearer t"));
}

#[tokio::test]
async fn resource_verbs_send_their_filters() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));
    let query = |mock: &MockApi| {
        let request = mock.last_request();
        format!("{}?{}", request.path, request.query.unwrap_or_default())
    };

    discount_service::search(&client, "spring").await.unwrap();
    assert_eq!(query(&mock), "/api/discounts/get.php?q=spring");

    product_service::search(&client, "lens", &ListParams::new().page(3))
        .await
        .unwrap();
    assert_eq!(query(&mock), "/api/products/get.php?page=1&search=lens");

    category_service::active(&client).await.unwrap();
    assert_eq!(query(&mock), "/api/categories/get.php?is_active=1");

    user_service::by_role(&client, UserRole::Admin, &ListParams::new())
        .await
        .unwrap();
    assert_eq!(query(&mock), "/api/users/get.php?role=admin");

    product_specification_service::by_group(&client, 12, "Optics")
        .await
        .unwrap();
    assert_eq!(
        query(&mock),
        "/api/product_specifications/get.php?product_id=12&spec_group=Optics"
    );

    tag_service::by_name(&client, "macro").await.unwrap();
    assert_eq!(query(&mock), "/api/tags/get.php?name=macro");

    tag_service::popular(&client, 5).await.unwrap();
    assert_eq!(query(&mock), "/api/tags/get.php?limit=5&order_by=usage_count");

    product_service::with_discounts(&client, &ListParams::new().page(2))
        .await
        .unwrap();
    assert_eq!(query(&mock), "/api/products/list_with_discounts.php?page=2");
}

#[tokio::test]
async fn find_by_id_takes_first_record() {
    let mock = MockApi::start("t").await;
    mock.respond(
        "/api/brands/get.php",
        json!({ "data": [{ "id": "12", "name": "Canon", "is_active": "1" }] }),
    );
    let client = mock.client(signed_in("t", None));

    let brand = brand_service::find_by_id(&client, 12).await.unwrap();
    assert_eq!(brand.id, 12);
    assert_eq!(brand.name, "Canon");
    assert_eq!(mock.last_request().query.as_deref(), Some("id=12"));
}

#[tokio::test]
async fn find_by_id_reports_missing_record() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    let err = brand_service::find_by_id(&client, 99).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Brand 99 not found"));
}

#[tokio::test]
async fn product_update_puts_id_in_body() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    product_service::update(&client, 9, RequestBody::Json(json!({ "name": "EOS R6" })))
        .await
        .unwrap();

    let request = mock.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.path, "/api/products/update.php");
    assert_eq!(request.query, None);
    assert_eq!(request.json(), json!({ "id": 9, "name": "EOS R6" }));
}

#[tokio::test]
async fn category_update_puts_id_in_query() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    let form = MultipartForm::new().text("name", "Lenses");
    category_service::update(&client, 4, RequestBody::Multipart(form))
        .await
        .unwrap();

    let request = mock.last_request();
    assert_eq!(request.method, Method::POST);
    assert_eq!(request.query.as_deref(), Some("id=4"));
    assert!(
        request
            .content_type
            .as_deref()
            .unwrap()
            .starts_with("multipart/form-data")
    );
    assert!(request.body_text().contains("Lenses"));
}

#[tokio::test]
async fn discount_and_image_deletes() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    discount_service::delete(&client, 5).await.unwrap();
    let request = mock.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/api/discounts/delete.php");
    assert_eq!(request.query.as_deref(), Some("id=5"));

    product_image_service::delete(&client, 3).await.unwrap();
    let request = mock.last_request();
    assert_eq!(request.method, Method::DELETE);
    assert_eq!(request.path, "/api/product_images/delete.php");
    assert_eq!(request.query, None);
    assert_eq!(request.json(), json!({ "id": 3 }));
}

#[tokio::test]
async fn reorder_stops_at_the_first_failure() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));
    mock.fail("/api/product_images/update.php", StatusCode::CONFLICT, 1);

    let err = product_image_service::reorder(&client, &[4, 2, 9])
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    let sent = mock.requests_to("/api/product_images/update.php");
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].json(), json!({ "id": 4, "display_order": 0 }));
}

#[tokio::test]
async fn reorder_sends_positions_in_order() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    let results = product_image_service::reorder(&client, &[4, 2]).await.unwrap();

    assert_eq!(results.len(), 2);
    let sent = mock.requests_to("/api/product_images/update.php");
    assert_eq!(sent[0].json(), json!({ "id": 4, "display_order": 0 }));
    assert_eq!(sent[1].json(), json!({ "id": 2, "display_order": 1 }));
}

#[tokio::test]
async fn user_delete_and_restore_flags() {
    let mock = MockApi::start("t").await;
    let client = mock.client(signed_in("t", None));

    user_service::delete(&client, 8).await.unwrap();
    user_service::restore(&client, 8).await.unwrap();

    let requests = mock.requests_to("/api/users/delete.php");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query.as_deref(), Some("id=8"));
    assert_eq!(requests[0].json(), json!({ "restore": 0 }));
    assert_eq!(requests[1].json(), json!({ "restore": 1 }));
}

#[tokio::test]
async fn unsuccessful_mutation_is_an_error() {
    let mock = MockApi::start("t").await;
    mock.respond(
        "/api/tags/create.php",
        json!({ "success": false, "error": "Slug already exists" }),
    );
    let client = mock.client(signed_in("t", None));

    let err = tag_service::create(&client, RequestBody::Json(json!({ "name": "Macro" })))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::BadRequest(ref m) if m == "Slug already exists"));
}

#[tokio::test]
async fn app_caches_lists_until_a_mutation() {
    let mock = MockApi::start("t").await;
    mock.respond(
        "/api/brands/get.php",
        json!({ "data": [{ "id": 1, "name": "Sigma" }], "total": 1 }),
    );
    let app = app(&mock, signed_in("t", None));
    let params = app.list_params();

    app.list::<Brand>(&params).await.unwrap();
    let page = app.list::<Brand>(&params).await.unwrap();
    assert_eq!(page.data[0].name, "Sigma");
    assert_eq!(mock.requests_to("/api/brands/get.php").len(), 1);

    app.create::<Brand>(RequestBody::Json(json!({ "name": "Tamron" })))
        .await
        .unwrap();
    assert!(app.cache().is_empty());

    app.list::<Brand>(&params).await.unwrap();
    assert_eq!(mock.requests_to("/api/brands/get.php").len(), 2);
}

#[tokio::test]
async fn app_cache_keeps_escaped_queries_apart() {
    let mock = MockApi::start("t").await;
    let app = app(&mock, signed_in("t", None));
    let filtered = ListParams::new().search("lens").filter("is_active", 1);
    let smuggled = ListParams::new().search("lens&is_active=1");

    app.list::<Brand>(&filtered).await.unwrap();
    app.list::<Brand>(&smuggled).await.unwrap();

    let requests = mock.requests_to("/api/brands/get.php");
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].query.as_deref(), Some("q=lens&is_active=1"));
    assert_eq!(requests[1].query.as_deref(), Some("q=lens%26is_active%3D1"));
}

#[tokio::test]
async fn app_retries_server_errors_once() {
    let mock = MockApi::start("t").await;
    mock.fail("/api/brands/get.php", StatusCode::INTERNAL_SERVER_ERROR, 1);
    let app = app(&mock, signed_in("t", None));

    app.list::<Brand>(&app.list_params()).await.unwrap();
    assert_eq!(mock.requests_to("/api/brands/get.php").len(), 2);
}

#[tokio::test]
async fn app_does_not_retry_client_errors() {
    let mock = MockApi::start("t").await;
    mock.fail("/api/brands/get.php", StatusCode::NOT_FOUND, 2);
    let app = app(&mock, signed_in("t", None));

    let err = app.get::<Brand>(1).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(mock.requests_to("/api/brands/get.php").len(), 1);
}

#[tokio::test]
async fn failed_mutation_keeps_cache() {
    let mock = MockApi::start("t").await;
    mock.fail("/api/brands/create.php", StatusCode::CONFLICT, 1);
    let app = app(&mock, signed_in("t", None));
    let params = app.list_params();

    app.list::<Brand>(&params).await.unwrap();
    let err = app
        .create::<Brand>(RequestBody::Json(json!({ "name": "Sigma" })))
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Conflict(_)));
    assert_eq!(app.cache().len(), 1);
}

#[tokio::test]
async fn login_stores_the_session() {
    let mock = MockApi::start("t").await;
    mock.respond(
        LOGIN_PATH,
        json!({
            "user": staff(UserRole::Employee),
            "access_token": "t",
            "refresh_token": "r",
        }),
    );
    let session = SessionStore::in_memory();
    let client = mock.client(session.clone());

    let user = auth_service::login(&client, " dana@shop.test ", "secret")
        .await
        .unwrap();

    assert_eq!(user.role, UserRole::Employee);
    assert!(session.is_authenticated());
    assert_eq!(session.refresh_token().as_deref(), Some("r"));
    assert_eq!(
        mock.last_request().json(),
        json!({ "email": "dana@shop.test", "password": "secret" })
    );

    auth_service::logout(&client).unwrap();
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn customers_cannot_sign_in() {
    let mock = MockApi::start("t").await;
    mock.respond(
        LOGIN_PATH,
        json!({
            "user": staff(UserRole::Customer),
            "access_token": "t",
            "refresh_token": "r",
        }),
    );
    let session = SessionStore::in_memory();
    let client = mock.client(session.clone());

    let err = auth_service::login(&client, "c@shop.test", "secret")
        .await
        .unwrap_err();

    assert!(matches!(err, AppError::Forbidden(_)));
    assert!(!session.is_authenticated());
}

#[tokio::test]
async fn blank_credentials_are_not_sent() {
    let mock = MockApi::start("t").await;
    let client = mock.client(SessionStore::in_memory());

    let err = auth_service::login(&client, "  ", "secret").await.unwrap_err();
    assert!(matches!(err, AppError::BadRequest(_)));
    assert!(mock.requests().is_empty());
}

#[tokio::test]
async fn stats_decode_string_counts() {
    let mock = MockApi::start("t").await;
    mock.respond(
        "/api/admin/stats.php",
        json!({
            "counts": { "products_active": "12", "products_total": 15, "brands": "4" },
            "latest_products": [
                { "id": "3", "name": "EOS R6", "brand": "Canon", "price": "2499.00" }
            ],
        }),
    );
    let client = mock.client(signed_in("t", None));

    let stats = stats_service::get_stats(&client).await.unwrap();
    assert_eq!(stats.counts.products_active, Some(12));
    assert_eq!(stats.counts.products_total, Some(15));
    assert_eq!(stats.counts.tags, None);
    assert_eq!(stats.latest_products[0].id, 3);
    assert_eq!(stats.latest_products[0].brand.as_deref(), Some("Canon"));
}
