use http::Method;
use serde::Deserialize;
use serde_json::Value;

use crate::{
    client::{ApiClient, ApiRequest, RequestBody},
    error::{AppError, Result},
    models::{ApiMessage, Discount, Page, PriceQuote},
    services::resource::{self, Endpoints, IdPlacement, ListParams, Resource},
};

impl Resource for Discount {
    const NAME: &'static str = "discounts";
    const LABEL: &'static str = "Discount";
    const ENDPOINTS: Endpoints = Endpoints {
        base: "discounts",
        update_method: Method::PUT,
        update_id: IdPlacement::Body,
        delete_method: Method::DELETE,
        delete_id: IdPlacement::Query,
    };
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuoteResponse {
    Wrapped { data: QuoteData },
    Bare(QuoteData),
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuoteData {
    Many(Vec<PriceQuote>),
    One(PriceQuote),
}

impl QuoteResponse {
    fn into_quotes(self) -> Vec<PriceQuote> {
        let data = match self {
            QuoteResponse::Wrapped { data } => data,
            QuoteResponse::Bare(data) => data,
        };
        match data {
            QuoteData::Many(quotes) => quotes,
            QuoteData::One(quote) => vec![quote],
        }
    }
}

pub async fn list(client: &ApiClient, params: &ListParams) -> Result<Page<Discount>> {
    resource::list(client, params).await
}

pub async fn find_by_id(client: &ApiClient, id: i64) -> Result<Discount> {
    resource::find_by_id(client, id).await
}

pub async fn create(client: &ApiClient, body: RequestBody) -> Result<ApiMessage> {
    resource::create::<Discount>(client, body).await
}

pub async fn update(client: &ApiClient, id: i64, body: RequestBody) -> Result<ApiMessage> {
    resource::update::<Discount>(client, id, body).await
}

pub async fn delete(client: &ApiClient, id: i64) -> Result<ApiMessage> {
    resource::delete::<Discount>(client, id).await
}

pub async fn search(client: &ApiClient, term: &str) -> Result<Page<Discount>> {
    list(client, &ListParams::new().search(term)).await
}

pub async fn active(client: &ApiClient) -> Result<Page<Discount>> {
    list(client, &ListParams::new().filter("is_active", 1)).await
}

/// Discounts applying to a product, best first.
pub async fn for_product(client: &ApiClient, product_id: i64) -> Result<Vec<Discount>> {
    let request = ApiRequest::get(Discount::ENDPOINTS.path("get")).query("product_id", product_id);
    let body = client.send_value(&request).await?;
    let page: Page<Discount> = resource::decode_page(wrap_list(body))?;
    Ok(page.data)
}

/// Server-side price calculation for one product.
pub async fn calculate(client: &ApiClient, product_id: i64) -> Result<PriceQuote> {
    let request =
        ApiRequest::get(Discount::ENDPOINTS.path("calculate")).query("product_id", product_id);
    let response: QuoteResponse = client.send(&request).await?;
    response
        .into_quotes()
        .into_iter()
        .next()
        .ok_or_else(|| AppError::NotFound(format!("No price for product {}", product_id)))
}

pub async fn calculate_many(client: &ApiClient, product_ids: &[i64]) -> Result<Vec<PriceQuote>> {
    if product_ids.is_empty() {
        return Ok(Vec::new());
    }

    let ids = product_ids
        .iter()
        .map(i64::to_string)
        .collect::<Vec<_>>()
        .join(",");
    let request = ApiRequest::get(Discount::ENDPOINTS.path("calculate")).query("product_ids", ids);
    let response: QuoteResponse = client.send(&request).await?;
    Ok(response.into_quotes())
}

/// The lookup endpoint returns either a page or a bare array.
fn wrap_list(body: Value) -> Value {
    match body {
        Value::Array(items) => serde_json::json!({ "data": items }),
        other => other,
    }
}
