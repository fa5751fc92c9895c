//! Bootstrap datasets and the idempotent startup seeding pass.
//!
//! Each collection is seeded only when it holds zero documents, so restarts
//! never duplicate or overwrite live data.
use serde_json::to_value;
use tracing::info;

use crate::models::{
    Coordinates, Notification, RiskLevel, Signal, SignalStatus, User, UserType, Zone,
    ZoneCategory,
};
use crate::store::{Collection, DocumentStore, StoreError};

pub fn default_signals() -> Vec<Signal> {
    vec![
        Signal {
            id: "s1".to_string(),
            title: "Connectivity Outage: North Dorms".to_string(),
            category: "IT Infrastructure".to_string(),
            location: "North Dorms - Block A".to_string(),
            timestamp: "12m ago".to_string(),
            risk_level: RiskLevel::Critical,
            description: "Structural Infrastructure • 8 nodes affected. Students reporting total loss of connectivity.".to_string(),
            status: SignalStatus::Open,
        },
        Signal {
            id: "s2".to_string(),
            title: "Chemical Storage Variance".to_string(),
            category: "Safety".to_string(),
            location: "Science Dept".to_string(),
            timestamp: "45m ago".to_string(),
            risk_level: RiskLevel::Moderate,
            description: "Pressure sensor deviation in Lab 4. Maintenance team notified.".to_string(),
            status: SignalStatus::Investigating,
        },
        Signal {
            id: "s3".to_string(),
            title: "New SAP Intervention Request".to_string(),
            category: "Administration".to_string(),
            location: "Student Services".to_string(),
            timestamp: "2h ago".to_string(),
            risk_level: RiskLevel::Low,
            description: "Academic Distress Signal triggered by attendance logs.".to_string(),
            status: SignalStatus::Open,
        },
    ]
}

pub fn default_zones() -> Vec<Zone> {
    fn zone(
        id: &str,
        name: &str,
        category: ZoneCategory,
        risk_level: RiskLevel,
        signal_count: u32,
        coordinates: (f64, f64),
        lat_lng: [f64; 2],
        details: &str,
    ) -> Zone {
        Zone {
            id: id.to_string(),
            name: name.to_string(),
            category,
            risk_level,
            signal_count,
            coordinates: Coordinates {
                x: coordinates.0,
                y: coordinates.1,
            },
            lat_lng,
            details: details.to_string(),
        }
    }

    vec![
        zone("z1", "SVKM's NMIMS", ZoneCategory::Safety, RiskLevel::Critical, 12, (50.0, 50.0), [19.1034, 72.8369], "Zone A • Critical Priority"),
        zone("z2", "Narsee Monjee College", ZoneCategory::Facilities, RiskLevel::Moderate, 3, (52.0, 48.0), [19.1028, 72.8365], "Zone B • HVAC Maintenance"),
        zone("z3", "Mithibai College", ZoneCategory::Safety, RiskLevel::Stable, 0, (48.0, 52.0), [19.1025, 72.8360], "Zone C • All Clear"),
        zone("z4", "D. J. Sanghvi Engineering", ZoneCategory::IT, RiskLevel::Critical, 8, (55.0, 45.0), [19.1070, 72.8360], "Zone D • Server Overheat"),
        zone("z5", "Usha Pravin Gandhi College", ZoneCategory::General, RiskLevel::Stable, 0, (51.0, 51.0), [19.1029, 72.8372], "Zone E • Monitoring"),
        zone("z6", "Jitendra Chauhan Law College", ZoneCategory::Facilities, RiskLevel::Stable, 0, (50.0, 53.0), [19.1026, 72.8362], "Zone F"),
        zone("z7", "Pravin Gandhi College of Law", ZoneCategory::IT, RiskLevel::Moderate, 2, (49.0, 50.0), [19.1030, 72.8375], "Zone G • Network Slowdown"),
        zone("z8", "Bhagubhai Mafatlal Polytechnic", ZoneCategory::Facilities, RiskLevel::Critical, 5, (45.0, 55.0), [19.1045, 72.8355], "Zone H • Power Fluctuation"),
        zone("z9", "Acharya A. V. Patel Jr College", ZoneCategory::General, RiskLevel::Stable, 0, (47.0, 53.0), [19.1038, 72.8368], "Zone I"),
        zone("z10", "C. N. M. School", ZoneCategory::General, RiskLevel::Stable, 0, (55.0, 47.0), [19.1060, 72.8348], "Zone J"),
        zone("z11", "Smt. Gokalibai High School", ZoneCategory::General, RiskLevel::Stable, 0, (46.0, 50.0), [19.1015, 72.8380], "Zone K"),
    ]
}

pub fn default_users() -> Vec<(UserType, User)> {
    vec![
        (
            UserType::Admin,
            User {
                name: "Elena R.".to_string(),
                role: "Senior Safety Officer".to_string(),
                avatar: "https://lh3.googleusercontent.com/aida-public/AB6AXuCDsquM8W_8wrc4mSLbXSGzX5Ol8iJZV3n7h3UIQoKQN0cvhsZtHPaO6EgSEKgK1AQL9Vi8Fmel7QH4GApvEQwRjNPbCW6vBxZArxuFfrqUt6UEQYOUHKwqwMJ7txroBdbflF0259u8ctVeFsXx_xN57yaKyWG9aTm0LWN-Js6LJtzh9WJTq18jWCryU6-L0vHzX1GVS2f15SaacTOaVoOVLUvOYWc200qDBqrTjce1HJkgCQ9cc9jdo6pEiEMcQnPoYLz0kqG1cBo".to_string(),
                email: "elena.r@earlyshield.edu".to_string(),
                department: "Campus Security & Risk".to_string(),
                id_string: "CSR-2024-8842".to_string(),
            },
        ),
        (
            UserType::Student,
            User {
                name: "Alex M.".to_string(),
                role: "Computer Science".to_string(),
                avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Felix".to_string(),
                email: "alex.m@student.earlyshield.edu".to_string(),
                department: "Engineering".to_string(),
                id_string: "S-2109923".to_string(),
            },
        ),
        (
            UserType::Management,
            User {
                name: "Dr. Sarah J.".to_string(),
                role: "Dean of Student Affairs".to_string(),
                avatar: "https://api.dicebear.com/7.x/avataaars/svg?seed=Sorelle".to_string(),
                email: "sarah.j@earlyshield.edu".to_string(),
                department: "Administration".to_string(),
                id_string: "ADM-004".to_string(),
            },
        ),
    ]
}

pub fn default_notifications() -> Vec<Notification> {
    vec![
        Notification {
            id: 1,
            title: "High Risk at DJ Sanghvi".to_string(),
            time: "2m ago".to_string(),
            read: false,
        },
        Notification {
            id: 2,
            title: "Network Restore: Library".to_string(),
            time: "15m ago".to_string(),
            read: false,
        },
        Notification {
            id: 3,
            title: "Shift Change Report Ready".to_string(),
            time: "1h ago".to_string(),
            read: true,
        },
        Notification {
            id: 4,
            title: "Maintenance Scheduled: Zone B".to_string(),
            time: "3h ago".to_string(),
            read: true,
        },
    ]
}

/// Populates every empty collection with its default dataset. Non-empty
/// collections are left untouched, so running this on every startup is safe.
pub async fn initialize<S: DocumentStore>(store: &S) -> Result<(), StoreError> {
    if store.count(Collection::Signals).await? == 0 {
        info!("Seeding signals collection...");
        for signal in default_signals() {
            store
                .set(Collection::Signals, &signal.id, &to_value(&signal)?)
                .await?;
        }
    }

    if store.count(Collection::Zones).await? == 0 {
        info!("Seeding zones collection...");
        for zone in default_zones() {
            store
                .set(Collection::Zones, &zone.id, &to_value(&zone)?)
                .await?;
        }
    }

    if store.count(Collection::Users).await? == 0 {
        info!("Seeding users collection...");
        for (user_type, user) in default_users() {
            store
                .set(Collection::Users, user_type.as_str(), &to_value(&user)?)
                .await?;
        }
    }

    if store.count(Collection::Notifications).await? == 0 {
        info!("Seeding notifications collection...");
        for notification in default_notifications() {
            store
                .set(
                    Collection::Notifications,
                    &notification.id.to_string(),
                    &to_value(&notification)?,
                )
                .await?;
        }
    }

    info!("Store initialization complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::memory::MemoryStore;

    #[tokio::test]
    async fn seeds_empty_collections() {
        let store = MemoryStore::default();

        initialize(&store).await.unwrap();

        assert_eq!(store.count(Collection::Signals).await.unwrap(), 3);
        assert_eq!(store.count(Collection::Zones).await.unwrap(), 11);
        assert_eq!(store.count(Collection::Users).await.unwrap(), 3);
        assert_eq!(store.count(Collection::Notifications).await.unwrap(), 4);
    }

    #[tokio::test]
    async fn seeding_twice_changes_nothing() {
        let store = MemoryStore::default();

        initialize(&store).await.unwrap();
        let signals = store.list(Collection::Signals).await.unwrap();
        let zones = store.list(Collection::Zones).await.unwrap();
        let users = store.list(Collection::Users).await.unwrap();
        let notifications = store.list(Collection::Notifications).await.unwrap();

        initialize(&store).await.unwrap();

        assert_eq!(store.list(Collection::Signals).await.unwrap(), signals);
        assert_eq!(store.list(Collection::Zones).await.unwrap(), zones);
        assert_eq!(store.list(Collection::Users).await.unwrap(), users);
        assert_eq!(
            store.list(Collection::Notifications).await.unwrap(),
            notifications
        );
    }

    #[tokio::test]
    async fn skips_non_empty_collections() {
        let store = MemoryStore::default();
        let existing = default_signals().remove(1);
        store
            .set(Collection::Signals, &existing.id, &to_value(&existing).unwrap())
            .await
            .unwrap();

        initialize(&store).await.unwrap();

        assert_eq!(store.count(Collection::Signals).await.unwrap(), 1);
        assert_eq!(store.count(Collection::Zones).await.unwrap(), 11);
    }
}
