use async_trait::async_trait;

use super::resource::{FieldValue, OwnerId, Resource};
use crate::errors::ServiceError;

/// Storage capability for one relation, always scoped to a single owner.
///
/// Implementations must never return or touch rows of another owner.
#[async_trait]
pub trait OwnedCollection<R: Resource>: Send + Sync {
    async fn list(&self, owner: OwnerId) -> Result<Vec<R>, ServiceError>;

    /// First row of `owner` whose `field` equals `value`.
    async fn find_by(&self, owner: OwnerId, field: R::Field, value: &FieldValue) -> Result<Option<R>, ServiceError>;

    async fn create(&self, owner: OwnerId, fields: R::Fields) -> Result<R, ServiceError>;

    /// Persist every field of an already existing row and return the stored state.
    async fn save(&self, owner: OwnerId, resource: &R) -> Result<R, ServiceError>;

    /// `false` when nothing matched.
    async fn delete(&self, owner: OwnerId, id: i32) -> Result<bool, ServiceError>;
}
