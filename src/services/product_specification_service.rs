use http::Method;
use serde_json::{Value, json};

use crate::{
    client::{ApiClient, ApiRequest, RequestBody},
    error::{AppError, Result},
    models::{ApiMessage, GroupedSpecifications, Page, ProductSpecification},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for ProductSpecification {
    const NAME: &'static str = "product_specifications";
    const LABEL: &'static str = "Specification";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "product_specifications",
        update_method: Method::PUT,
        update_id: IdPlacement::Body,
        delete_method: Method::DELETE,
        delete_id: IdPlacement::Body,
    };
}

/// One row of a bulk create.
#[derive(Debug, Clone, PartialEq)]
pub struct SpecInput {
    pub spec_name: String,
    pub spec_value: String,
    pub spec_group: Option<String>,
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<ProductSpecification>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<ProductSpecification> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<ProductSpecification>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<ProductSpecification>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<ProductSpecification>(client, id).await
}

pub async fn by_product(
    client: &ApiClient,
    product_id: i64,
) -> Result<Page<ProductSpecification>> {
    list(client, &ListParams::new().filter("product_id", product_id)).await
}

pub async fn by_group(
    client: &ApiClient,
    product_id: i64,
    group: &str,
) -> Result<Page<ProductSpecification>> {
    let params = ListParams::new()
        .filter("product_id", product_id)
        .filter("spec_group", group);
    list(client, &params).await
}

/// Specifications of a product keyed by group, as grouped by the server.
pub async fn grouped(client: &ApiClient, product_id: i64) -> Result<GroupedSpecifications> {
    let request = ApiRequest::get(ProductSpecification::ENDPOINTS.path("get"))
        .query("product_id", product_id)
        .query("grouped", 1);
    client.send(&request).await
}

pub async fn bulk_create(
    client: &ApiClient,
    product_id: i64,
    specs: &[SpecInput],
    start_order: Option<i64>,
) -> Result<ApiMessage> {
    if specs.is_empty() {
        return Err(AppError::BadRequest("No specifications to create".to_string()));
    }

    let specs: Vec<Value> = specs
        .iter()
        .map(|spec| {
            json!({
                "spec_name": spec.spec_name,
                "spec_value": spec.spec_value,
                "spec_group": spec.spec_group,
            })
        })
        .collect();

    let mut body = json!({ "product_id": product_id, "specs": specs });
    if let Some(start) = start_order {
        body["start_order"] = Value::from(start);
    }
    create(client, RequestBody::Json(body)).await
}

/// Assigns `display_order` 0, 1, 2... following the order of `ids`.
///
/// The updates go out one at a time. On the first failure the error is
/// returned, the updates before it stay applied and the rest are not sent.
pub async fn reorder(client: &ApiClient, ids: &[i64]) -> Result<Vec<ApiMessage>> {
    let mut results = Vec::with_capacity(ids.len());
    for (order, id) in ids.iter().enumerate() {
        let request = ApiRequest::put(ProductSpecification::ENDPOINTS.path("update"))
            .json(json!({ "id": id, "display_order": order }));
        results.push(resource::mutate(client, &request).await?);
    }
    Ok(results)
}
