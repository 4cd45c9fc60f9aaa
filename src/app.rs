use std::{future::Future, sync::Arc};

use crate::{
    cache::QueryCache,
    client::{ApiClient, RequestBody},
    config::AppConfig,
    error::Result,
    models::{ApiMessage, Page, Stats},
    services::{
        resource::{self, ListParams, Resource},
        stats_service,
    },
    session::SessionStore,
};

/// Client, session and query cache wired together from configuration.
#[derive(Debug, Clone)]
pub struct AdminApp {
    client: ApiClient,
    cache: Arc<QueryCache>,
    page_size: u32,
}

impl AdminApp {
    pub fn build(config: &AppConfig) -> Result<Self> {
        let session = SessionStore::load(&config.session.file)?;
        Self::with_session(config, session)
    }

    pub fn with_session(config: &AppConfig, session: SessionStore) -> Result<Self> {
        let client = ApiClient::new(&config.api, session)?;
        Ok(Self {
            client,
            cache: Arc::new(QueryCache::new(config.listing.cache_ttl)),
            page_size: config.listing.page_size.max(1),
        })
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &SessionStore {
        self.client.session()
    }

    pub fn cache(&self) -> &QueryCache {
        &self.cache
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// First page at the configured page size.
    pub fn list_params(&self) -> ListParams {
        ListParams::new().page(1).limit(self.page_size)
    }

    pub async fn list<R: Resource>(&self, params: &ListParams) -> Result<Page<R>> {
        let key = params.cache_key();
        if let Some(cached) = self.cache.get(R::NAME, &key) {
            tracing::debug!(resource = R::NAME, query = %key, "Serving list from cache");
            return resource::decode_page(cached);
        }

        let endpoints = R::ENDPOINTS;
        let value = self
            .with_retry(|| resource::list_value(&self.client, &endpoints, params))
            .await?;
        self.cache.insert(R::NAME, &key, value.clone());
        resource::decode_page(value)
    }

    pub async fn get<R: Resource>(&self, id: i64) -> Result<R> {
        self.with_retry(|| resource::find_by_id::<R>(&self.client, id))
            .await
    }

    pub async fn stats(&self) -> Result<Stats> {
        self.with_retry(|| stats_service::get_stats(&self.client))
            .await
    }

    pub async fn create<R: Resource>(&self, body: RequestBody) -> Result<ApiMessage> {
        self.mutate::<R, _>(resource::create::<R>(&self.client, body))
            .await
    }

    pub async fn update<R: Resource>(&self, id: i64, body: RequestBody) -> Result<ApiMessage> {
        self.mutate::<R, _>(resource::update::<R>(&self.client, id, body))
            .await
    }

    pub async fn delete<R: Resource>(&self, id: i64) -> Result<ApiMessage> {
        self.mutate::<R, _>(resource::delete::<R>(&self.client, id))
            .await
    }

    /// Runs any mutation of `R` and drops its cached lists when it succeeds.
    pub async fn mutate<R, F>(&self, mutation: F) -> Result<ApiMessage>
    where
        R: Resource,
        F: Future<Output = Result<ApiMessage>>,
    {
        let message = mutation.await?;
        self.invalidate::<R>();
        Ok(message)
    }

    pub fn invalidate<R: Resource>(&self) {
        let removed = self.cache.invalidate(R::NAME);
        tracing::info!(resource = R::NAME, removed, "Invalidated cached lists");
    }

    /// Retries once when the failure is transient.
    async fn with_retry<T, F, Fut>(&self, mut query: F) -> Result<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        match query().await {
            Err(e) if e.is_transient() => {
                tracing::warn!("Query failed, retrying once: {}", e);
                query().await
            }
            other => other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::{ApiConfig, ListingConfig, SessionConfig},
        models::Brand,
    };
    use serde_json::json;
    use std::time::Duration;

    fn config() -> AppConfig {
        AppConfig {
            api: ApiConfig::new("http://shop.test/api"),
            session: SessionConfig {
                file: "unused.json".into(),
            },
            listing: ListingConfig {
                page_size: 15,
                cache_ttl: Duration::from_secs(60),
            },
        }
    }

    #[tokio::test]
    async fn list_is_served_from_cache() {
        let app = AdminApp::with_session(&config(), SessionStore::in_memory()).unwrap();
        let params = app.list_params();
        assert_eq!(params.cache_key(), "page=1&limit=15");

        app.cache().insert(
            Brand::NAME,
            &params.cache_key(),
            json!({ "data": [{ "id": 4, "name": "Sigma", "is_active": 1 }], "total": 1 }),
        );

        let page = app.list::<Brand>(&params).await.unwrap();
        assert_eq!(page.data[0].name, "Sigma");
        assert_eq!(page.total(), 1);

        app.invalidate::<Brand>();
        assert!(app.cache().is_empty());
    }
}
