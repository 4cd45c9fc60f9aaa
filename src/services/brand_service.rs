use http::Method;

use crate::{
    client::{ApiClient, RequestBody},
    error::Result,
    models::{ApiMessage, Brand, Page},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for Brand {
    const NAME: &'static str = "brands";
    const LABEL: &'static str = "Brand";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "brands",
        update_method: Method::POST,
        update_id: IdPlacement::Query,
        delete_method: Method::POST,
        delete_id: IdPlacement::Query,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<Brand>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<Brand> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<Brand>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<Brand>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<Brand>(client, id).await
}

pub async fn search(client: &ApiClient, term: &str) -> Result<Page<Brand>> {
    list(client, &ListParams::new().filter("search", term)).await
}

pub async fn active(client: &ApiClient) -> Result<Page<Brand>> {
    list(client, &ListParams::new().filter("is_active", 1)).await
}

pub async fn featured(client: &ApiClient) -> Result<Page<Brand>> {
    list(client, &ListParams::new().filter("is_featured", 1)).await
}
