use http::Method;
use serde::Deserialize;
use serde_json::{Value, json};

use crate::{
    client::{ApiClient, ApiRequest, RequestBody},
    error::{AppError, Result},
    models::{ApiMessage, Page, ProductTag, Tag},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
    utils::de,
};

impl Resource for ProductTag {
    const NAME: &'static str = "product_tags";
    const LABEL: &'static str = "Product tag";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "product_tags",
        update_method: Method::POST,
        update_id: IdPlacement::Query,
        delete_method: Method::POST,
        delete_id: IdPlacement::Query,
    };
}

#[derive(Debug, Deserialize)]
struct ExistsResponse {
    #[serde(default, deserialize_with = "de::flag")]
    exists: bool,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    #[serde(default, deserialize_with = "de::int")]
    count: i64,
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<ProductTag>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<ProductTag> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<ProductTag>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<ProductTag>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<ProductTag>(client, id).await
}

pub async fn by_product(client: &ApiClient, product_id: i64) -> Result<Page<ProductTag>> {
    list(client, &ListParams::new().filter("product_id", product_id)).await
}

pub async fn by_tag(client: &ApiClient, tag_id: i64) -> Result<Page<ProductTag>> {
    list(client, &ListParams::new().filter("tag_id", tag_id)).await
}

/// Links with product and tag names joined in.
pub async fn with_details(client: &ApiClient, params: &ListParams) -> Result<Page<ProductTag>> {
    list(client, &params.clone().filter("with_details", 1)).await
}

/// Links every `(product_id, tag_id)` pair in one call.
pub async fn bulk_create(client: &ApiClient, pairs: &[(i64, i64)]) -> Result<ApiMessage> {
    if pairs.is_empty() {
        return Err(AppError::BadRequest("No product tags to create".to_string()));
    }

    let data: Vec<Value> = pairs
        .iter()
        .map(|(product_id, tag_id)| json!({ "product_id": product_id, "tag_id": tag_id }))
        .collect();
    create(client, RequestBody::Json(json!({ "bulk": true, "data": data }))).await
}

pub async fn bulk_delete(client: &ApiClient, ids: &[i64]) -> Result<ApiMessage> {
    if ids.is_empty() {
        return Err(AppError::BadRequest("No product tags to delete".to_string()));
    }
    delete_matching(client, json!({ "bulk": true, "ids": ids })).await
}

/// Removes every tag from a product.
pub async fn delete_by_product(client: &ApiClient, product_id: i64) -> Result<ApiMessage> {
    delete_matching(client, json!({ "product_id": product_id })).await
}

/// Removes a tag from every product.
pub async fn delete_by_tag(client: &ApiClient, tag_id: i64) -> Result<ApiMessage> {
    delete_matching(client, json!({ "tag_id": tag_id })).await
}

pub async fn exists(client: &ApiClient, product_id: i64, tag_id: i64) -> Result<bool> {
    let request = ApiRequest::get(ProductTag::ENDPOINTS.path("get"))
        .query("product_id", product_id)
        .query("tag_id", tag_id)
        .query("check_exists", 1);
    let response: ExistsResponse = client.send(&request).await?;
    Ok(response.exists)
}

/// Number of links, optionally narrowed by filters such as `product_id`.
pub async fn count(client: &ApiClient, params: &ListParams) -> Result<i64> {
    let request = ApiRequest::get(ProductTag::ENDPOINTS.path("get"))
        .query_pairs(params.to_pairs())
        .query("count_only", 1);
    let response: CountResponse = client.send(&request).await?;
    Ok(response.count)
}

pub async fn most_used(client: &ApiClient, limit: u32) -> Result<Page<Tag>> {
    let request = ApiRequest::get(ProductTag::ENDPOINTS.path("get"))
        .query("most_used", 1)
        .query("limit", limit.max(1));
    resource::decode_page(client.send_value(&request).await?)
}

async fn delete_matching(client: &ApiClient, body: Value) -> Result<ApiMessage> {
    let request = ApiRequest::post(ProductTag::ENDPOINTS.path("delete")).json(body);
    resource::mutate(client, &request).await
}
