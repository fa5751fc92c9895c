//! Clears the zones collection and reseeds it from the default dataset.
//! Run once after the monitored campus list changes; live zone edits are
//! discarded.
use earlyshield::{
    config::Config,
    models::Zone,
    seed,
    store::{Collection, DocumentStore, RedisStore},
};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let config = Config::load();
    let store = RedisStore::connect(&config.redis_url).await;

    info!("Deleting existing zones...");
    let documents = store
        .list(Collection::Zones)
        .await
        .expect("Store unavailable!");

    let mut deleted = 0;
    for document in documents {
        let zone: Zone = serde_json::from_value(document).expect("Malformed zone document!");
        store
            .delete(Collection::Zones, &zone.id)
            .await
            .expect("Store unavailable!");
        deleted += 1;
    }
    info!("Deleted {deleted} zones");

    info!("Adding updated zones...");
    for zone in seed::default_zones() {
        store
            .set(
                Collection::Zones,
                &zone.id,
                &serde_json::to_value(&zone).expect("Unserializable zone!"),
            )
            .await
            .expect("Store unavailable!");
        info!("Added: {}", zone.name);
    }

    info!("Done, zones collection reset");
}
