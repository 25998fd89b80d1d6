use anyhow::Result;
use megasena::{Config, DrawSeries, LatestDraw, TicketBook, TtlCache, fetch_draw_series, fetch_latest_draw};
use reqwest::Client;
use std::sync::Arc;
use tokio::sync::Mutex;

/// State owned by one client connection: fetch caches and the entered tickets.
pub struct Session {
    client: Client,
    config: Config,
    latest: Mutex<TtlCache<LatestDraw>>,
    history: Mutex<TtlCache<DrawSeries>>,
    pub tickets: Mutex<TicketBook>,
}

impl Session {
    pub fn new(config: Config) -> Self {
        Self {
            client: Client::new(),
            latest: Mutex::new(TtlCache::new(config.current_draw.ttl)),
            history: Mutex::new(TtlCache::new(config.history.ttl)),
            tickets: Mutex::new(TicketBook::new()),
            config,
        }
    }

    pub async fn latest_draw(&self) -> Result<Arc<LatestDraw>> {
        let endpoint = &self.config.current_draw;
        let mut cache = self.latest.lock().await;
        let draw = cache
            .get_or_try_insert_with(&endpoint.url, || fetch_latest_draw(&self.client, endpoint))
            .await?;
        Ok(draw)
    }

    pub async fn history(&self) -> Result<Arc<DrawSeries>> {
        let endpoint = &self.config.history;
        let mut cache = self.history.lock().await;
        let series = cache
            .get_or_try_insert_with(&endpoint.url, || fetch_draw_series(&self.client, endpoint))
            .await?;
        Ok(series)
    }
}
