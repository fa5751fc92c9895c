use std::sync::Arc;

use super::{config::Config, store::RedisStore};

pub struct AppState {
    pub config: Config,
    pub store: RedisStore,
}

impl AppState {
    pub async fn new() -> Arc<Self> {
        let config = Config::load();

        let store = RedisStore::connect(&config.redis_url).await;

        Arc::new(Self { config, store })
    }
}
