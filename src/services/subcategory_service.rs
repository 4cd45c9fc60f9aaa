use http::Method;

use crate::{
    client::{ApiClient, RequestBody},
    error::Result,
    models::{ApiMessage, Page, Subcategory},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for Subcategory {
    const NAME: &'static str = "subcategories";
    const LABEL: &'static str = "Subcategory";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "subcategories",
        update_method: Method::POST,
        update_id: IdPlacement::Query,
        delete_method: Method::POST,
        delete_id: IdPlacement::Query,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<Subcategory>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<Subcategory> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<Subcategory>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<Subcategory>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<Subcategory>(client, id).await
}

pub async fn search(client: &ApiClient, term: &str) -> Result<Page<Subcategory>> {
    list(client, &ListParams::new().filter("search", term)).await
}

pub async fn by_category(client: &ApiClient, category_id: i64) -> Result<Page<Subcategory>> {
    list(client, &ListParams::new().filter("category_id", category_id)).await
}

pub async fn active(client: &ApiClient) -> Result<Page<Subcategory>> {
    list(client, &ListParams::new().filter("is_active", 1)).await
}
