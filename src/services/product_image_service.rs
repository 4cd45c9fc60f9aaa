use http::Method;
use serde_json::json;

use crate::{
    client::{ApiClient, ApiRequest, RequestBody},
    error::Result,
    models::{ApiMessage, Page, ProductImage},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for ProductImage {
    const NAME: &'static str = "product_images";
    const LABEL: &'static str = "Image";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "product_images",
        update_method: Method::PUT,
        update_id: IdPlacement::Body,
        delete_method: Method::DELETE,
        delete_id: IdPlacement::Body,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<ProductImage>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<ProductImage> {
    resource::find_by_id(client, id).await
}

/// Multipart with an `image` file, or JSON with an `image_url`.
pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<ProductImage>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<ProductImage>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<ProductImage>(client, id).await
}

pub async fn by_product(client: &ApiClient, product_id: i64) -> Result<Page<ProductImage>> {
    list(client, &ListParams::new().filter("product_id", product_id)).await
}

pub async fn set_primary(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    update(client, id, RequestBody::Json(json!({ "is_primary": 1 }))).await
}

/// Assigns `display_order` 0, 1, 2... following the order of `ids`.
///
/// The updates go out one at a time. On the first failure the error is
/// returned, the updates before it stay applied and the rest are not sent.
pub async fn reorder(client: &ApiClient, ids: &[i64]) -> Result<Vec<ApiMessage>> {
    let mut results = Vec::with_capacity(ids.len());
    for (order, id) in ids.iter().enumerate() {
        let request = ApiRequest::put(ProductImage::ENDPOINTS.path("update"))
            .json(json!({ "id": id, "display_order": order }));
        results.push(resource::mutate(client, &request).await?);
    }
    Ok(results)
}
