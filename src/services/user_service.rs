use http::Method;
use serde_json::json;

use crate::{
    client::{ApiClient, RequestBody},
    error::Result,
    models::{ApiMessage, Page, User, UserRole},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for User {
    const NAME: &'static str = "users";
    const LABEL: &'static str = "User";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "users",
        update_method: Method::POST,
        update_id: IdPlacement::Query,
        delete_method: Method::POST,
        delete_id: IdPlacement::Query,
    };
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<User>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<User> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<User>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<User>(client, id, body).await
}

/// Soft delete; the account can be restored.
pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete_with::<User>(client, id, RequestBody::Json(json!({ "restore": 0 }))).await
}

pub async fn restore(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete_with::<User>(client, id, RequestBody::Json(json!({ "restore": 1 }))).await
}

pub async fn by_role(client: &ApiClient, role: UserRole, params: &ListParams) -> Result<Page<User>> {
    list(client, &params.clone().filter("role", role)).await
}

pub async fn active(client: &ApiClient, params: &ListParams) -> Result<Page<User>> {
    list(client, &params.clone().filter("is_active", 1)).await
}

/// Soft-deleted accounts.
pub async fn deleted(client: &ApiClient, params: &ListParams) -> Result<Page<User>> {
    list(client, &params.clone().filter("deleted", 1)).await
}

pub async fn search(client: &ApiClient, term: &str, params: &ListParams) -> Result<Page<User>> {
    list(client, &params.clone().filter("search", term)).await
}
