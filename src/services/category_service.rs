use http::Method;

use crate::{
    client::{ApiClient, RequestBody},
    error::Result,
    models::{ApiMessage, Category, Page},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for Category {
    const NAME: &'static str = "categories";
    const LABEL: &'static str = "Category";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "categories",
        update_method: Method::POST,
        update_id: IdPlacement::Query,
        delete_method: Method::POST,
        delete_id: IdPlacement::Query,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<Category>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<Category> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<Category>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<Category>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<Category>(client, id).await
}

pub async fn search(client: &ApiClient, term: &str) -> Result<Page<Category>> {
    list(client, &ListParams::new().filter("search", term)).await
}

pub async fn active(client: &ApiClient) -> Result<Page<Category>> {
    list(client, &ListParams::new().filter("is_active", 1)).await
}
