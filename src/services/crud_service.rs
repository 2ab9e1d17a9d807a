use std::sync::Arc;

use crate::database::models::Entity;
use crate::database::repository::{Repository, StoreError};

/// Thin pass-through from handlers to one entity's repository.
pub struct CrudService<T: Entity> {
    repository: Arc<dyn Repository<T>>,
}

impl<T: Entity> Clone for CrudService<T> {
    fn clone(&self) -> Self {
        Self {
            repository: self.repository.clone(),
        }
    }
}

impl<T: Entity> CrudService<T> {
    pub fn new(repository: Arc<dyn Repository<T>>) -> Self {
        Self { repository }
    }

    pub async fn find_all(&self) -> Result<Vec<T>, StoreError> {
        self.repository.find_all().await
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<T>, StoreError> {
        self.repository.find_by_id(id).await
    }

    pub async fn exists(&self, id: i64) -> Result<bool, StoreError> {
        Ok(self.repository.find_by_id(id).await?.is_some())
    }

    /// Inserts when `entity` has no id, otherwise overwrites that record.
    pub async fn save(&self, entity: T) -> Result<T, StoreError> {
        self.repository.save(entity).await
    }

    /// Always inserts; any client-supplied id is discarded.
    pub async fn create(&self, mut entity: T) -> Result<T, StoreError> {
        entity.set_id(None);
        self.save(entity).await
    }

    /// Overwrites the record at `id`, keeping that id.
    pub async fn update(&self, id: i64, mut entity: T) -> Result<T, StoreError> {
        entity.set_id(Some(id));
        self.save(entity).await
    }

    pub async fn delete_by_id(&self, id: i64) -> Result<(), StoreError> {
        self.repository.delete_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::Coach;
    use crate::database::MemoryStore;

    fn service() -> CrudService<Coach> {
        CrudService::new(Arc::new(MemoryStore::new()))
    }

    fn coach(name: &str) -> Coach {
        Coach {
            id: Some(500),
            name: name.to_string(),
            experience: Some(15),
            nationality: Some("Española".to_string()),
        }
    }

    #[tokio::test]
    async fn create_ignores_client_id() {
        let coaches = service();
        let created = coaches.create(coach("Pep Guardiola")).await.unwrap();
        assert_ne!(created.id, Some(500));
        assert!(coaches.exists(created.id.unwrap()).await.unwrap());
    }

    #[tokio::test]
    async fn update_preserves_id_and_persists_fields() {
        let coaches = service();
        let created = coaches.create(coach("Pep Guardiola")).await.unwrap();
        let id = created.id.unwrap();

        let mut changes = coach("Pep Guardiola");
        changes.experience = Some(16);
        let updated = coaches.update(id, changes).await.unwrap();

        assert_eq!(updated.id, Some(id));
        let reloaded = coaches.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(reloaded.experience, Some(16));
        assert_eq!(coaches.find_all().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn save_inserts_or_overwrites_by_id() {
        let coaches = service();

        let mut fresh = coach("Ancelotti");
        fresh.id = None;
        let inserted = coaches.save(fresh).await.unwrap();
        let id = inserted.id.unwrap();

        let mut changes = inserted.clone();
        changes.nationality = Some("Italiana".to_string());
        let saved = coaches.save(changes).await.unwrap();
        assert_eq!(saved.id, Some(id));
        assert_eq!(coaches.find_all().await.unwrap().len(), 1);

        let ghost = coach("Nadie");
        assert!(matches!(coaches.save(ghost).await, Err(StoreError::NotFound)));
    }

    #[tokio::test]
    async fn delete_then_absent() {
        let coaches = service();
        let id = coaches.create(coach("Klopp")).await.unwrap().id.unwrap();
        coaches.delete_by_id(id).await.unwrap();
        assert!(!coaches.exists(id).await.unwrap());
        assert!(matches!(coaches.delete_by_id(id).await, Err(StoreError::NotFound)));
    }
}
