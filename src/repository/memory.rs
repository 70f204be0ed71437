//! In-memory repository implementations.
//!
//! Insertion-ordered `Vec` storage behind an `RwLock`, matching the mock
//! arrays these replace. Zone counts are admin-console sized; linear scans
//! are fine.

use std::sync::RwLock;

use crate::models::{CategoryRecord, DeliveryZone};

use super::{CategoryRepository, RepoResult, RepositoryError, ZoneRepository};

#[derive(Default)]
pub struct InMemoryZoneRepository {
    zones: RwLock<Vec<DeliveryZone>>,
}

impl InMemoryZoneRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed with an initial zone set, keeping input order.
    pub fn with_zones(zones: Vec<DeliveryZone>) -> Self {
        Self {
            zones: RwLock::new(zones),
        }
    }
}

impl ZoneRepository for InMemoryZoneRepository {
    fn list(&self) -> Vec<DeliveryZone> {
        self.zones.read().expect("zone store lock poisoned").clone()
    }

    fn get(&self, id: i64) -> RepoResult<DeliveryZone> {
        self.zones
            .read()
            .expect("zone store lock poisoned")
            .iter()
            .find(|z| z.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id })
    }

    fn insert(&self, zone: DeliveryZone) -> RepoResult<()> {
        let mut zones = self.zones.write().expect("zone store lock poisoned");
        if zones.iter().any(|z| z.id == zone.id) {
            return Err(RepositoryError::DuplicateId { id: zone.id });
        }
        zones.push(zone);
        Ok(())
    }

    fn update(&self, zone: DeliveryZone) -> RepoResult<()> {
        let mut zones = self.zones.write().expect("zone store lock poisoned");
        match zones.iter_mut().find(|z| z.id == zone.id) {
            Some(slot) => {
                *slot = zone;
                Ok(())
            }
            None => Err(RepositoryError::NotFound { id: zone.id }),
        }
    }

    fn delete(&self, id: i64) -> RepoResult<DeliveryZone> {
        let mut zones = self.zones.write().expect("zone store lock poisoned");
        match zones.iter().position(|z| z.id == id) {
            Some(pos) => Ok(zones.remove(pos)),
            None => Err(RepositoryError::NotFound { id }),
        }
    }
}

#[derive(Default)]
pub struct InMemoryCategoryRepository {
    records: RwLock<Vec<CategoryRecord>>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<CategoryRecord>) -> Self {
        Self {
            records: RwLock::new(records),
        }
    }
}

impl CategoryRepository for InMemoryCategoryRepository {
    fn list(&self) -> Vec<CategoryRecord> {
        self.records
            .read()
            .expect("category store lock poisoned")
            .clone()
    }

    fn get(&self, id: i64) -> RepoResult<CategoryRecord> {
        self.records
            .read()
            .expect("category store lock poisoned")
            .iter()
            .find(|r| r.id == id)
            .cloned()
            .ok_or(RepositoryError::NotFound { id })
    }

    fn insert(&self, record: CategoryRecord) -> RepoResult<()> {
        let mut records = self.records.write().expect("category store lock poisoned");
        if records.iter().any(|r| r.id == record.id) {
            return Err(RepositoryError::DuplicateId { id: record.id });
        }
        records.push(record);
        Ok(())
    }

    fn update(&self, record: CategoryRecord) -> RepoResult<()> {
        let mut records = self.records.write().expect("category store lock poisoned");
        match records.iter_mut().find(|r| r.id == record.id) {
            Some(slot) => {
                *slot = record;
                Ok(())
            }
            None => Err(RepositoryError::NotFound { id: record.id }),
        }
    }

    fn delete(&self, id: i64) -> RepoResult<CategoryRecord> {
        let mut records = self.records.write().expect("category store lock poisoned");
        match records.iter().position(|r| r.id == id) {
            Some(pos) => Ok(records.remove(pos)),
            None => Err(RepositoryError::NotFound { id }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use geo::Coord;

    fn zone(id: i64) -> DeliveryZone {
        let ring = [(0.0, 0.0), (0.0, 1.0), (1.0, 1.0), (0.0, 0.0)];
        DeliveryZone {
            id,
            name: format!("Zone {id}"),
            active: true,
            boundary: ring.iter().map(|&(x, y)| Coord { x, y }).collect(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn insert_get_delete_roundtrip() {
        let repo = InMemoryZoneRepository::new();
        repo.insert(zone(1)).unwrap();
        assert_eq!(repo.get(1).unwrap().name, "Zone 1");
        assert_eq!(repo.delete(1).unwrap().id, 1);
        assert_eq!(repo.get(1).unwrap_err(), RepositoryError::NotFound { id: 1 });
    }

    #[test]
    fn duplicate_insert_rejected() {
        let repo = InMemoryZoneRepository::new();
        repo.insert(zone(1)).unwrap();
        assert_eq!(
            repo.insert(zone(1)).unwrap_err(),
            RepositoryError::DuplicateId { id: 1 }
        );
    }

    #[test]
    fn update_missing_zone_is_not_found() {
        let repo = InMemoryZoneRepository::new();
        assert_eq!(
            repo.update(zone(9)).unwrap_err(),
            RepositoryError::NotFound { id: 9 }
        );
    }

    #[test]
    fn list_keeps_insertion_order() {
        let repo = InMemoryZoneRepository::new();
        for id in [3, 1, 2] {
            repo.insert(zone(id)).unwrap();
        }
        let ids: Vec<i64> = repo.list().iter().map(|z| z.id).collect();
        assert_eq!(ids, vec![3, 1, 2]);
    }

    #[test]
    fn category_repository_crud() {
        let repo = InMemoryCategoryRepository::new();
        let record = CategoryRecord {
            id: 1,
            parent_id: None,
            name: "Sofas".to_string(),
            slug: "sofas".to_string(),
            sort_order: 1,
            active: true,
        };
        repo.insert(record.clone()).unwrap();
        assert_eq!(repo.get(1).unwrap().slug, "sofas");

        let mut renamed = record;
        renamed.name = "Sofas & Sectionals".to_string();
        repo.update(renamed).unwrap();
        assert_eq!(repo.get(1).unwrap().name, "Sofas & Sectionals");

        repo.delete(1).unwrap();
        assert!(repo.list().is_empty());
    }
}
