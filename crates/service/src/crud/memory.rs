//! Process-local [`OwnedCollection`], for tests and doc examples.

use std::sync::Mutex;

use async_trait::async_trait;

use super::collection::OwnedCollection;
use super::resource::{FieldValue, OwnerId, Resource};
use crate::errors::ServiceError;

/// Builds a stored row from its assigned id, its owner and the create fields.
pub type BuildFn<R> = fn(i32, OwnerId, <R as Resource>::Fields) -> R;

pub struct MemoryCollection<R: Resource> {
    rows: Mutex<Vec<R>>,
    next_id: Mutex<i32>,
    build: BuildFn<R>,
}

impl<R: Resource> MemoryCollection<R> {
    pub fn new(build: BuildFn<R>) -> Self {
        Self { rows: Mutex::new(Vec::new()), next_id: Mutex::new(1), build }
    }

    /// Rows of every owner.
    pub fn len(&self) -> usize {
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl<R: Resource> OwnedCollection<R> for MemoryCollection<R> {
    async fn list(&self, owner: OwnerId) -> Result<Vec<R>, ServiceError> {
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rows.iter().filter(|r| r.owner() == owner).cloned().collect())
    }

    async fn find_by(&self, owner: OwnerId, field: R::Field, value: &FieldValue) -> Result<Option<R>, ServiceError> {
        let rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        Ok(rows
            .iter()
            .find(|r| r.owner() == owner && &r.field_value(field) == value)
            .cloned())
    }

    async fn create(&self, owner: OwnerId, fields: R::Fields) -> Result<R, ServiceError> {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            let id = *next;
            *next += 1;
            id
        };
        let row = (self.build)(id, owner, fields);
        self.rows.lock().unwrap_or_else(|e| e.into_inner()).push(row.clone());
        Ok(row)
    }

    async fn save(&self, owner: OwnerId, resource: &R) -> Result<R, ServiceError> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let slot = rows
            .iter_mut()
            .find(|r| r.owner() == owner && r.id() == resource.id())
            .ok_or_else(|| ServiceError::relation_missing(R::RELATION))?;
        *slot = resource.clone();
        Ok(resource.clone())
    }

    async fn delete(&self, owner: OwnerId, id: i32) -> Result<bool, ServiceError> {
        let mut rows = self.rows.lock().unwrap_or_else(|e| e.into_inner());
        let before = rows.len();
        rows.retain(|r| !(r.owner() == owner && r.id() == id));
        Ok(rows.len() != before)
    }
}
