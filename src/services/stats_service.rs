use crate::{
    client::{ApiClient, ApiRequest},
    error::Result,
    models::Stats,
};

pub const STATS_PATH: &str = "admin/stats.php";

/// Dashboard counters and the latest products.
pub async fn get_stats(client: &ApiClient) -> Result<Stats> {
    client.send(&ApiRequest::get(STATS_PATH)).await
}
