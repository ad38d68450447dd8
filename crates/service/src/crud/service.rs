use std::sync::Arc;

use serde_json::Value;
use tracing::{debug, info, instrument};

use super::collection::OwnedCollection;
use super::payload::CrudPayload;
use super::resource::{FieldValue, OwnerId, Resource, ResourceField};
use crate::errors::ServiceError;
use crate::validation::RuleSet;

/// Uniform list/create/read/update/delete over one owner-scoped relation.
///
/// Holds no state besides the collection handle, so one instance is shared by every request.
pub struct CrudService<R: Resource> {
    collection: Arc<dyn OwnedCollection<R>>,
}

impl<R: Resource> Clone for CrudService<R> {
    fn clone(&self) -> Self {
        Self { collection: self.collection.clone() }
    }
}

fn ucfirst(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn malformed(e: serde_json::Error) -> ServiceError {
    ServiceError::Malformed(e.to_string())
}

impl<R: Resource> CrudService<R> {
    pub fn new(collection: Arc<dyn OwnedCollection<R>>) -> Self {
        Self { collection }
    }

    /// All resources of `owner`, keyed by relation name.
    #[instrument(skip(self), fields(relation = R::RELATION))]
    pub async fn index(&self, owner: OwnerId) -> Result<CrudPayload<Vec<R>>, ServiceError> {
        let items = self.collection.list(owner).await?;
        debug!(count = items.len(), "listed");
        Ok(CrudPayload::keyed(R::RELATION, items))
    }

    /// Validate `input` and create a resource under `owner`.
    ///
    /// With a `unique_field`, an existing resource of the same owner holding the same value
    /// is a conflict.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::crud::{CrudService, MemoryCollection, OwnerId};
    /// use service::notes::Note;
    ///
    /// let svc = CrudService::<Note>::new(Arc::new(MemoryCollection::<Note>::new(Note::build)));
    /// let notes = Note::descriptor().unwrap();
    /// let input = serde_json::json!({"title": "A", "content": "B"});
    /// let created = tokio_test::block_on(svc.store(OwnerId(1), &input, notes.create_rules(), None)).unwrap();
    /// assert_eq!(created.message(), Some("Notes creado correctamente"));
    /// assert_eq!(created.data().unwrap().title, "A");
    /// ```
    #[instrument(skip(self, input, rules), fields(relation = R::RELATION))]
    pub async fn store(
        &self,
        owner: OwnerId,
        input: &Value,
        rules: &RuleSet,
        unique_field: Option<R::Field>,
    ) -> Result<CrudPayload<R>, ServiceError> {
        let validated = rules.validate(input)?;

        // Check-then-create without a guard: two concurrent stores carrying the same value can
        // both get past this lookup. Only a unique index on the backing table prevents the duplicate.
        if let Some(field) = unique_field {
            if let Some(value) = validated.get(field.name()).and_then(FieldValue::from_json) {
                if self.collection.find_by(owner, field, &value).await?.is_some() {
                    debug!(field = field.name(), %value, "unique value taken");
                    return Err(ServiceError::relation_exists(R::RELATION));
                }
            }
        }

        let fields: R::Fields = validated.deserialize().map_err(malformed)?;
        let created = self.collection.create(owner, fields).await?;
        info!(%owner, id = created.id(), "resource_created");
        Ok(CrudPayload::with_message(
            R::RELATION,
            format!("{} creado correctamente", ucfirst(R::RELATION)),
            created,
        ))
    }

    /// First resource of `owner` whose `id_field` equals `id`.
    #[instrument(skip(self), fields(relation = R::RELATION))]
    pub async fn show(&self, owner: OwnerId, id: FieldValue, id_field: R::Field) -> Result<R, ServiceError> {
        self.lookup(owner, &id, id_field).await
    }

    /// Validate `input`, then apply the validated fields onto the matching resource.
    /// Fields absent from the validated set keep their stored values.
    #[instrument(skip(self, input, rules), fields(relation = R::RELATION))]
    pub async fn update(
        &self,
        owner: OwnerId,
        id: FieldValue,
        input: &Value,
        rules: &RuleSet,
        id_field: R::Field,
    ) -> Result<CrudPayload<R>, ServiceError> {
        let validated = rules.validate(input)?;
        let mut resource = self.lookup(owner, &id, id_field).await?;

        let patch: R::Patch = validated.deserialize().map_err(malformed)?;
        resource.apply(patch);
        let saved = self.collection.save(owner, &resource).await?;
        info!(%owner, id = saved.id(), fields = validated.len(), "resource_updated");
        Ok(CrudPayload::with_message(
            R::RELATION,
            format!("{} actualizado correctamente", ucfirst(R::RELATION)),
            saved,
        ))
    }

    #[instrument(skip(self), fields(relation = R::RELATION))]
    pub async fn destroy(&self, owner: OwnerId, id: FieldValue, id_field: R::Field) -> Result<CrudPayload<R>, ServiceError> {
        let resource = self.lookup(owner, &id, id_field).await?;
        if !self.collection.delete(owner, resource.id()).await? {
            return Err(ServiceError::relation_missing(R::RELATION));
        }
        info!(%owner, id = resource.id(), "resource_deleted");
        Ok(CrudPayload::message_only(
            R::RELATION,
            format!("{} eliminado correctamente", ucfirst(R::RELATION)),
        ))
    }

    async fn lookup(&self, owner: OwnerId, id: &FieldValue, id_field: R::Field) -> Result<R, ServiceError> {
        self.collection
            .find_by(owner, id_field, id)
            .await?
            .ok_or_else(|| ServiceError::relation_missing(R::RELATION))
    }
}
