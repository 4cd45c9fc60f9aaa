use http::Method;

use crate::{
    client::{ApiClient, RequestBody},
    error::Result,
    models::{ApiMessage, Page, Tag},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for Tag {
    const NAME: &'static str = "tags";
    const LABEL: &'static str = "Tag";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "tags",
        update_method: Method::POST,
        update_id: IdPlacement::Query,
        delete_method: Method::POST,
        delete_id: IdPlacement::Query,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<Tag>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<Tag> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<Tag>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<Tag>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<Tag>(client, id).await
}

pub async fn search(client: &ApiClient, term: &str) -> Result<Page<Tag>> {
    list(client, &ListParams::new().filter("search", term)).await
}

pub async fn active(client: &ApiClient) -> Result<Page<Tag>> {
    list(client, &ListParams::new().filter("is_active", 1)).await
}

pub async fn by_name(client: &ApiClient, name: &str) -> Result<Page<Tag>> {
    list(client, &ListParams::new().filter("name", name)).await
}

/// Most used tags first.
pub async fn popular(client: &ApiClient, limit: u32) -> Result<Page<Tag>> {
    let params = ListParams::new()
        .limit(limit)
        .filter("order_by", "usage_count");
    list(client, &params).await
}
