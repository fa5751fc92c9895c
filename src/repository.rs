//! Typed per-entity accessors over the document store.
//!
//! Id allocation is scan-then-increment over a snapshot of the collection:
//! two allocations racing from stale snapshots can collide. The store has no
//! atomic counter, and the dataset is small enough that this is accepted
//! rather than serialized.
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, to_value};

use crate::error::AppError;
use crate::models::{
    Notification, Signal, SignalCreate, SignalStatus, Stats, User, Zone,
};
use crate::stats;
use crate::store::{Collection, DocumentStore};

pub const SIGNAL_ID_PREFIX: &str = "s";

/// Number of title characters carried into a companion notification.
const NOTIFICATION_TITLE_CHARS: usize = 30;

/// Flattens a partial-update payload into the field map the store merges.
/// Unset optional fields are skipped entirely rather than written as null.
pub fn to_fields<T: Serialize>(payload: &T) -> Result<Map<String, Value>, AppError> {
    match to_value(payload)? {
        Value::Object(fields) => Ok(fields),
        _ => Ok(Map::new()),
    }
}

/// Next signal id under the `"s" + integer` scheme. A stored id that does
/// not parse under the scheme is rejected loudly instead of being skipped,
/// since skipping could silently re-issue a live id.
pub fn next_signal_id(signals: &[Signal]) -> Result<String, AppError> {
    let mut max_id = 0u64;

    for signal in signals {
        let numeric = signal
            .id
            .strip_prefix(SIGNAL_ID_PREFIX)
            .and_then(|rest| rest.parse::<u64>().ok())
            .ok_or_else(|| AppError::IdScheme {
                collection: Collection::Signals.name(),
                id: signal.id.clone(),
            })?;

        max_id = max_id.max(numeric);
    }

    Ok(format!("{SIGNAL_ID_PREFIX}{}", max_id + 1))
}

pub fn next_notification_id(notifications: &[Notification]) -> i64 {
    notifications
        .iter()
        .map(|notification| notification.id)
        .max()
        .unwrap_or(0)
        + 1
}

async fn list_documents<S: DocumentStore, T: DeserializeOwned>(
    store: &S,
    collection: Collection,
) -> Result<Vec<T>, AppError> {
    let documents = store.list(collection).await?;

    documents
        .into_iter()
        .map(|document| Ok(serde_json::from_value(document)?))
        .collect()
}

async fn get_document<S: DocumentStore, T: DeserializeOwned>(
    store: &S,
    collection: Collection,
    id: &str,
) -> Result<Option<T>, AppError> {
    match store.get(collection, id).await? {
        Some(document) => Ok(Some(serde_json::from_value(document)?)),
        None => Ok(None),
    }
}

async fn update_document<S: DocumentStore, T: DeserializeOwned>(
    store: &S,
    collection: Collection,
    id: &str,
    entity: &'static str,
    fields: &Map<String, Value>,
) -> Result<T, AppError> {
    match store.update(collection, id, fields).await? {
        Some(document) => Ok(serde_json::from_value(document)?),
        None => Err(AppError::NotFound(entity)),
    }
}

pub async fn get_all_signals<S: DocumentStore>(store: &S) -> Result<Vec<Signal>, AppError> {
    list_documents(store, Collection::Signals).await
}

pub async fn get_signal_by_id<S: DocumentStore>(
    store: &S,
    id: &str,
) -> Result<Option<Signal>, AppError> {
    get_document(store, Collection::Signals, id).await
}

/// Persists a new signal and, as a best-effort side effect, a companion
/// notification. The two writes are not transactional: a failed notification
/// write leaves the signal in place.
pub async fn create_signal<S: DocumentStore>(
    store: &S,
    payload: SignalCreate,
) -> Result<Signal, AppError> {
    let signals = get_all_signals(store).await?;
    let id = next_signal_id(&signals)?;

    let signal = Signal {
        id: id.clone(),
        title: payload.title,
        category: payload.category,
        location: payload.location,
        timestamp: "Just now".to_string(),
        risk_level: payload.risk_level,
        description: payload.description,
        status: SignalStatus::Open,
    };

    store
        .set(Collection::Signals, &id, &to_value(&signal)?)
        .await?;

    let headline: String = signal.title.chars().take(NOTIFICATION_TITLE_CHARS).collect();
    create_notification(store, format!("New Signal: {headline}...")).await?;

    Ok(signal)
}

pub async fn update_signal<S: DocumentStore>(
    store: &S,
    id: &str,
    fields: &Map<String, Value>,
) -> Result<Signal, AppError> {
    update_document(store, Collection::Signals, id, "Signal", fields).await
}

pub async fn delete_signal<S: DocumentStore>(store: &S, id: &str) -> Result<(), AppError> {
    if store.delete(Collection::Signals, id).await? {
        Ok(())
    } else {
        Err(AppError::NotFound("Signal"))
    }
}

pub async fn get_all_zones<S: DocumentStore>(store: &S) -> Result<Vec<Zone>, AppError> {
    list_documents(store, Collection::Zones).await
}

pub async fn get_zone_by_id<S: DocumentStore>(
    store: &S,
    id: &str,
) -> Result<Option<Zone>, AppError> {
    get_document(store, Collection::Zones, id).await
}

pub async fn update_zone<S: DocumentStore>(
    store: &S,
    id: &str,
    fields: &Map<String, Value>,
) -> Result<Zone, AppError> {
    update_document(store, Collection::Zones, id, "Zone", fields).await
}

pub async fn get_user_by_type<S: DocumentStore>(
    store: &S,
    user_type: &str,
) -> Result<Option<User>, AppError> {
    get_document(store, Collection::Users, user_type).await
}

pub async fn update_user<S: DocumentStore>(
    store: &S,
    user_type: &str,
    fields: &Map<String, Value>,
) -> Result<User, AppError> {
    update_document(store, Collection::Users, user_type, "User type", fields).await
}

pub async fn get_all_notifications<S: DocumentStore>(
    store: &S,
) -> Result<Vec<Notification>, AppError> {
    list_documents(store, Collection::Notifications).await
}

pub async fn create_notification<S: DocumentStore>(
    store: &S,
    title: String,
) -> Result<Notification, AppError> {
    let notifications = get_all_notifications(store).await?;
    let id = next_notification_id(&notifications);

    let notification = Notification {
        id,
        title,
        time: "Just now".to_string(),
        read: false,
    };

    store
        .set(
            Collection::Notifications,
            &id.to_string(),
            &to_value(&notification)?,
        )
        .await?;

    Ok(notification)
}

pub async fn update_notification<S: DocumentStore>(
    store: &S,
    id: i64,
    fields: &Map<String, Value>,
) -> Result<Notification, AppError> {
    update_document(
        store,
        Collection::Notifications,
        &id.to_string(),
        "Notification",
        fields,
    )
    .await
}

pub async fn mark_all_notifications_read<S: DocumentStore>(store: &S) -> Result<(), AppError> {
    let mut fields = Map::new();
    fields.insert("read".to_string(), Value::Bool(true));

    for notification in get_all_notifications(store).await? {
        store
            .update(Collection::Notifications, &notification.id.to_string(), &fields)
            .await?;
    }

    Ok(())
}

pub async fn get_stats<S: DocumentStore>(store: &S) -> Result<Stats, AppError> {
    let signals = get_all_signals(store).await?;

    Ok(stats::compute(&signals))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{RiskLevel, SignalStatusUpdate, UserUpdate, ZoneUpdate};
    use crate::seed;
    use crate::store::memory::MemoryStore;

    fn sample_signal(id: &str) -> Signal {
        Signal {
            id: id.to_string(),
            title: "Chemical Storage Variance".to_string(),
            category: "Safety".to_string(),
            location: "Science Dept".to_string(),
            timestamp: "45m ago".to_string(),
            risk_level: RiskLevel::Moderate,
            description: "Pressure sensor deviation in Lab 4.".to_string(),
            status: SignalStatus::Investigating,
        }
    }

    fn leak_payload() -> SignalCreate {
        SignalCreate {
            title: "Leak".to_string(),
            category: "Facilities".to_string(),
            location: "B2".to_string(),
            risk_level: RiskLevel::Moderate,
            description: "Water pooling near the stairwell.".to_string(),
        }
    }

    #[test]
    fn signal_ids_increment_past_the_maximum() {
        let signals = vec![sample_signal("s1"), sample_signal("s3"), sample_signal("s2")];

        assert_eq!(next_signal_id(&signals).unwrap(), "s4");
        assert_eq!(next_signal_id(&[]).unwrap(), "s1");
    }

    #[test]
    fn malformed_signal_id_is_rejected() {
        let signals = vec![sample_signal("s1"), sample_signal("sig9")];

        let err = next_signal_id(&signals).unwrap_err();
        assert!(matches!(err, AppError::IdScheme { ref id, .. } if id == "sig9"));
    }

    #[test]
    fn notification_ids_increment_past_the_maximum() {
        let notifications = seed::default_notifications();

        assert_eq!(next_notification_id(&notifications), 5);
        assert_eq!(next_notification_id(&[]), 1);
    }

    #[tokio::test]
    async fn creating_a_signal_on_an_empty_store_starts_at_s1() {
        let store = MemoryStore::default();

        let signal = create_signal(&store, leak_payload()).await.unwrap();

        assert_eq!(signal.id, "s1");
        assert_eq!(signal.status, SignalStatus::Open);
        assert_eq!(signal.timestamp, "Just now");

        let notifications = get_all_notifications(&store).await.unwrap();
        assert_eq!(notifications.len(), 1);
        assert_eq!(notifications[0].id, 1);
        assert_eq!(notifications[0].title, "New Signal: Leak...");
        assert_eq!(notifications[0].time, "Just now");
        assert!(!notifications[0].read);
    }

    #[tokio::test]
    async fn companion_notification_truncates_long_titles() {
        let store = MemoryStore::default();
        let mut payload = leak_payload();
        payload.title = "Water main rupture flooding the entire basement level".to_string();

        create_signal(&store, payload).await.unwrap();

        let notifications = get_all_notifications(&store).await.unwrap();
        assert_eq!(
            notifications[0].title,
            "New Signal: Water main rupture flooding th..."
        );
    }

    #[tokio::test]
    async fn updates_on_missing_ids_return_not_found_uniformly() {
        let store = MemoryStore::default();
        let fields = to_fields(&SignalStatusUpdate {
            status: SignalStatus::Resolved,
        })
        .unwrap();

        assert!(matches!(
            update_signal(&store, "s9", &fields).await.unwrap_err(),
            AppError::NotFound("Signal")
        ));
        assert!(matches!(
            update_zone(&store, "z9", &fields).await.unwrap_err(),
            AppError::NotFound("Zone")
        ));
        assert!(matches!(
            update_user(&store, "Admin", &fields).await.unwrap_err(),
            AppError::NotFound("User type")
        ));
        assert!(matches!(
            update_notification(&store, 9, &fields).await.unwrap_err(),
            AppError::NotFound("Notification")
        ));
    }

    #[tokio::test]
    async fn update_merges_only_the_supplied_fields() {
        let store = MemoryStore::default();
        seed::initialize(&store).await.unwrap();

        let fields = to_fields(&ZoneUpdate {
            risk_level: None,
            signal_count: Some(7),
            details: None,
        })
        .unwrap();
        let zone = update_zone(&store, "z3", &fields).await.unwrap();

        assert_eq!(zone.signal_count, 7);
        assert_eq!(zone.name, "Mithibai College");
        assert_eq!(zone.risk_level, RiskLevel::Stable);
    }

    #[tokio::test]
    async fn patching_a_user_profile_keeps_unset_fields() {
        let store = MemoryStore::default();
        seed::initialize(&store).await.unwrap();

        let fields = to_fields(&UserUpdate {
            name: None,
            email: Some("elena.reyes@earlyshield.edu".to_string()),
            department: None,
        })
        .unwrap();
        let user = update_user(&store, "Admin", &fields).await.unwrap();

        assert_eq!(user.email, "elena.reyes@earlyshield.edu");
        assert_eq!(user.name, "Elena R.");
        assert_eq!(user.id_string, "CSR-2024-8842");
    }

    #[tokio::test]
    async fn deleting_a_signal_twice_fails_the_second_time() {
        let store = MemoryStore::default();
        seed::initialize(&store).await.unwrap();

        delete_signal(&store, "s2").await.unwrap();

        assert!(matches!(
            delete_signal(&store, "s2").await.unwrap_err(),
            AppError::NotFound("Signal")
        ));
        assert_eq!(get_all_signals(&store).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn mark_all_read_flips_every_notification() {
        let store = MemoryStore::default();
        seed::initialize(&store).await.unwrap();

        mark_all_notifications_read(&store).await.unwrap();

        let notifications = get_all_notifications(&store).await.unwrap();
        assert_eq!(notifications.len(), 4);
        assert!(notifications.iter().all(|notification| notification.read));
    }

    #[tokio::test]
    async fn stats_reflect_the_seeded_signal_set() {
        let store = MemoryStore::default();
        seed::initialize(&store).await.unwrap();

        // 3 active seeds, 1 critical: 100 - 6 - 3
        let stats = get_stats(&store).await.unwrap();

        assert_eq!(stats.active_signals, 3);
        assert_eq!(stats.health_score, 91);
        assert_eq!(stats.trend.len(), 7);
    }
}
