use async_trait::async_trait;
use sea_orm::{ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set, Unchanged};

use models::note;

use super::domain::{Note, NoteField, NoteFields};
use crate::crud::{FieldValue, OwnedCollection, OwnerId, Resource};
use crate::errors::ServiceError;

/// `notes` relation backed by the `notes` table.
pub struct SeaOrmNoteCollection {
    pub db: DatabaseConnection,
}

impl SeaOrmNoteCollection {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn column(field: NoteField) -> note::Column {
    match field {
        NoteField::Id => note::Column::Id,
        NoteField::UserId => note::Column::UserId,
        NoteField::Title => note::Column::Title,
        NoteField::Content => note::Column::Content,
    }
}

/// Typed comparison value, or `None` when the value can never match the column.
fn column_value(field: NoteField, value: &FieldValue) -> Option<sea_orm::Value> {
    match field {
        NoteField::Id | NoteField::UserId => value.as_int().and_then(|n| i32::try_from(n).ok()).map(Into::into),
        NoteField::Title | NoteField::Content => match value {
            FieldValue::Text(s) => Some(s.clone().into()),
            _ => None,
        },
    }
}

#[async_trait]
impl OwnedCollection<Note> for SeaOrmNoteCollection {
    async fn list(&self, owner: OwnerId) -> Result<Vec<Note>, ServiceError> {
        let rows = note::owned_by(owner.0).all(&self.db).await?;
        Ok(rows.into_iter().map(Note::from).collect())
    }

    async fn find_by(&self, owner: OwnerId, field: NoteField, value: &FieldValue) -> Result<Option<Note>, ServiceError> {
        let Some(value) = column_value(field, value) else {
            return Ok(None);
        };
        let found = note::owned_by(owner.0)
            .filter(column(field).eq(value))
            .one(&self.db)
            .await?;
        Ok(found.map(Note::from))
    }

    async fn create(&self, owner: OwnerId, fields: NoteFields) -> Result<Note, ServiceError> {
        let created = note::create(&self.db, owner.0, &fields.title, &fields.content).await?;
        Ok(created.into())
    }

    async fn save(&self, owner: OwnerId, resource: &Note) -> Result<Note, ServiceError> {
        if resource.user_id != owner.0 {
            return Err(ServiceError::relation_missing(Note::RELATION));
        }
        let am = note::ActiveModel {
            id: Unchanged(resource.id),
            user_id: Unchanged(resource.user_id),
            title: Set(resource.title.clone()),
            content: Set(resource.content.clone()),
            created_at: Unchanged(resource.created_at),
            updated_at: Set(resource.updated_at),
        };
        let saved = am.update(&self.db).await?;
        Ok(saved.into())
    }

    async fn delete(&self, owner: OwnerId, id: i32) -> Result<bool, ServiceError> {
        let res = note::Entity::delete_many()
            .filter(note::Column::UserId.eq(owner.0))
            .filter(note::Column::Id.eq(id))
            .exec(&self.db)
            .await?;
        Ok(res.rows_affected > 0)
    }
}
