//! Endpoint table and CRUD calls shared by every resource.

use http::Method;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::form_urlencoded;

use crate::{
    client::{ApiClient, ApiRequest, RequestBody},
    error::{AppError, Result},
    models::{ApiMessage, Page},
};

/// Where a record id goes on update/delete calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdPlacement {
    /// `?id=<id>`
    Query,
    /// `{"id": <id>, ...}` or an `id` form field.
    Body,
}

#[derive(Debug, Clone)]
pub struct Endpoints {
    pub base: &'static str,
    pub update_method: Method,
    pub update_id: IdPlacement,
    pub delete_method: Method,
    pub delete_id: IdPlacement,
}

impl Endpoints {
    pub fn path(&self, action: &str) -> String {
        format!("{}/{}.php", self.base, action)
    }
}

/// A REST-managed entity.
pub trait Resource: DeserializeOwned + Send + 'static {
    /// Collection name, also used as the cache key prefix.
    const NAME: &'static str;
    /// Singular label for messages, e.g. `Brand`.
    const LABEL: &'static str;
    const ENDPOINTS: Endpoints;
}

/// Page, page size, search text and filters for a list call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct ListParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub filters: BTreeMap<String, String>,
}

impl ListParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, page: u32) -> Self {
        self.page = Some(page.max(1));
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit.max(1));
        self
    }

    /// Sets the search text and goes back to the first page.
    pub fn search(mut self, term: impl Into<String>) -> Self {
        let term = term.into();
        let term = term.trim();
        self.search = (!term.is_empty()).then(|| term.to_string());
        self.reset_page();
        self
    }

    /// Adds a filter and goes back to the first page. Empty values clear it.
    pub fn filter(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        let key = key.into();
        let value = value.to_string();
        if value.trim().is_empty() {
            self.filters.remove(&key);
        } else {
            self.filters.insert(key, value);
        }
        self.reset_page();
        self
    }

    pub fn filter_opt(self, key: impl Into<String>, value: Option<impl ToString>) -> Self {
        match value {
            Some(value) => self.filter(key, value),
            None => self,
        }
    }

    pub fn current_page(&self) -> u32 {
        self.page.unwrap_or(1)
    }

    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::with_capacity(self.filters.len() + 3);
        if let Some(page) = self.page {
            pairs.push(("page".to_string(), page.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("q".to_string(), search.clone()));
        }
        pairs.extend(self.filters.iter().map(|(k, v)| (k.clone(), v.clone())));
        pairs
    }

    /// URL-encoded query string, used as the cache key.
    pub fn cache_key(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.to_pairs())
            .finish()
    }

    fn reset_page(&mut self) {
        if self.page.is_some() {
            self.page = Some(1);
        }
    }
}

pub async fn list<R: Resource>(client: &ApiClient, params: &ListParams) -> Result<Page<R>> {
    let value = list_value(client, &R::ENDPOINTS, params).await?;
    decode_page(value)
}

pub async fn list_value(
    client: &ApiClient,
    endpoints: &Endpoints,
    params: &ListParams,
) -> Result<Value> {
    let request = ApiRequest::get(endpoints.path("get")).query_pairs(params.to_pairs());
    client.send_value(&request).await
}

pub fn decode_page<R: DeserializeOwned>(value: Value) -> Result<Page<R>> {
    serde_json::from_value(value)
        .map_err(|e| AppError::InternalError(format!("Unexpected list response: {}", e)))
}

pub async fn find_by_id<R: Resource>(client: &ApiClient, id: i64) -> Result<R> {
    let request = ApiRequest::get(R::ENDPOINTS.path("get")).query("id", id);
    let body = client.send_value(&request).await?;

    let record = single_record(body)
        .ok_or_else(|| AppError::NotFound(format!("{} {} not found", R::LABEL, id)))?;
    serde_json::from_value(record)
        .map_err(|e| AppError::InternalError(format!("Unexpected {} record: {}", R::LABEL, e)))
}

pub async fn create<R: Resource>(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    let request = ApiRequest::post(R::ENDPOINTS.path("create")).body(body);
    mutate(client, &request).await
}

pub async fn update<R: Resource>(
    client: &ApiClient,
    id: i64,
    body: RequestBody,
) -> Result<ApiMessage> {
    let endpoints = R::ENDPOINTS;
    let request = ApiRequest::new(endpoints.update_method.clone(), endpoints.path("update"));
    let request = place_id(request, endpoints.update_id, id, body);
    mutate(client, &request).await
}

pub async fn delete<R: Resource>(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    delete_with::<R>(client, id, RequestBody::Empty).await
}

/// Delete call with extra body fields, e.g. the users' `restore` flag.
pub async fn delete_with<R: Resource>(
    client: &ApiClient,
    id: i64,
    body: RequestBody,
) -> Result<ApiMessage> {
    let endpoints = R::ENDPOINTS;
    let request = ApiRequest::new(endpoints.delete_method.clone(), endpoints.path("delete"));
    let request = place_id(request, endpoints.delete_id, id, body);
    mutate(client, &request).await
}

/// Sends a mutation and treats `{"success": false, "error": ...}` as a failure.
pub async fn mutate(client: &ApiClient, request: &ApiRequest) -> Result<ApiMessage> {
    let message: ApiMessage = client.send(request).await?;
    match &message.error {
        Some(error) if !message.success => Err(AppError::BadRequest(error.clone())),
        _ => Ok(message),
    }
}

fn place_id(request: ApiRequest, placement: IdPlacement, id: i64, body: RequestBody) -> ApiRequest {
    match placement {
        IdPlacement::Query => request.query("id", id).body(body),
        IdPlacement::Body => {
            let body = match body {
                RequestBody::Empty => RequestBody::Json(serde_json::json!({ "id": id })),
                RequestBody::Json(Value::Object(fields)) => {
                    let mut with_id = Map::with_capacity(fields.len() + 1);
                    with_id.insert("id".to_string(), Value::from(id));
                    with_id.extend(fields.into_iter().filter(|(k, _)| k != "id"));
                    RequestBody::Json(Value::Object(with_id))
                }
                RequestBody::Json(other) => RequestBody::Json(other),
                RequestBody::Multipart(mut form) => {
                    form.push_text("id", id);
                    RequestBody::Multipart(form)
                }
            };
            request.body(body)
        }
    }
}

/// `data` may be an object or a one-element array depending on the endpoint.
fn single_record(body: Value) -> Option<Value> {
    let data = match body {
        Value::Object(mut fields) => match fields.remove("data") {
            Some(data) => data,
            None if fields.contains_key("id") => Value::Object(fields),
            None => return None,
        },
        other => other,
    };

    match data {
        Value::Array(items) => items.into_iter().next(),
        Value::Object(fields) if !fields.is_empty() => Some(Value::Object(fields)),
        _ => None,
    }
}
