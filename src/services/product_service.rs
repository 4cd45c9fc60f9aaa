use http::Method;

use crate::{
    client::{ApiClient, ApiRequest, RequestBody},
    error::Result,
    models::{ApiMessage, DiscountedProduct, Page, Product},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for Product {
    const NAME: &'static str = "products";
    const LABEL: &'static str = "Product";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "products",
        update_method: Method::POST,
        update_id: IdPlacement::Body,
        delete_method: Method::POST,
        delete_id: IdPlacement::Body,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<Product>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<Product> {
    resource::find_by_id(client, id).await
}

/// Accepts a JSON body or a multipart form carrying an `image` file.
pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<Product>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<Product>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<Product>(client, id).await
}

pub async fn search(client: &ApiClient, term: &str, params: &ListParams) -> Result<Page<Product>> {
    list(client, &params.clone().filter("search", term)).await
}

pub async fn by_category(
    client: &ApiClient,
    category_id: i64,
    params: &ListParams,
) -> Result<Page<Product>> {
    list(client, &params.clone().filter("category_id", category_id)).await
}

pub async fn by_subcategory(
    client: &ApiClient,
    subcategory_id: i64,
    params: &ListParams,
) -> Result<Page<Product>> {
    list(client, &params.clone().filter("subcategory_id", subcategory_id)).await
}

pub async fn featured(client: &ApiClient, params: &ListParams) -> Result<Page<Product>> {
    list(client, &params.clone().filter("is_featured", 1)).await
}

pub async fn active(client: &ApiClient, params: &ListParams) -> Result<Page<Product>> {
    list(client, &params.clone().filter("is_active", 1)).await
}

/// Products with the server's discounted price attached.
pub async fn with_discounts(
    client: &ApiClient,
    params: &ListParams,
) -> Result<Page<DiscountedProduct>> {
    let request =
        ApiRequest::get(Product::ENDPOINTS.path("list_with_discounts")).query_pairs(params.to_pairs());
    resource::decode_page(client.send_value(&request).await?)
}
