use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::crud::{FieldValue, OwnerId, RelationDescriptor, Resource, ResourceField};
use crate::validation::RuleError;

/// Rules for the `notes` relation. Updates use the same rules with every field optional.
pub const NOTE_RULES: [(&str, &str); 2] = [
    ("title", "required|string|max:255"),
    ("content", "required|string"),
];

/// A note as exposed by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<FixedOffset>,
    pub updated_at: DateTime<FixedOffset>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoteFields {
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteField {
    Id,
    UserId,
    Title,
    Content,
}

impl ResourceField for NoteField {
    fn name(self) -> &'static str {
        match self {
            NoteField::Id => "id",
            NoteField::UserId => "user_id",
            NoteField::Title => "title",
            NoteField::Content => "content",
        }
    }
}

impl Note {
    /// Fresh note as a store would return it right after insertion.
    pub fn build(id: i32, owner: OwnerId, fields: NoteFields) -> Self {
        let now: DateTime<FixedOffset> = Utc::now().into();
        Self {
            id,
            user_id: owner.0,
            title: fields.title,
            content: fields.content,
            created_at: now,
            updated_at: now,
        }
    }

    /// `notes` descriptor: note rules, no unique field.
    pub fn descriptor() -> Result<RelationDescriptor<Note>, RuleError> {
        RelationDescriptor::parse(NOTE_RULES, None)
    }
}

impl Resource for Note {
    const RELATION: &'static str = "notes";
    const ID_FIELD: NoteField = NoteField::Id;

    type Field = NoteField;
    type Fields = NoteFields;
    type Patch = NotePatch;

    fn id(&self) -> i32 {
        self.id
    }

    fn owner(&self) -> OwnerId {
        OwnerId(self.user_id)
    }

    fn field_value(&self, field: NoteField) -> FieldValue {
        match field {
            NoteField::Id => self.id.into(),
            NoteField::UserId => self.user_id.into(),
            NoteField::Title => self.title.clone().into(),
            NoteField::Content => self.content.clone().into(),
        }
    }

    fn apply(&mut self, patch: NotePatch) {
        let mut dirty = false;
        if let Some(title) = patch.title {
            dirty |= title != self.title;
            self.title = title;
        }
        if let Some(content) = patch.content {
            dirty |= content != self.content;
            self.content = content;
        }
        if dirty {
            self.updated_at = Utc::now().into();
        }
    }
}

impl From<models::note::Model> for Note {
    fn from(m: models::note::Model) -> Self {
        Self {
            id: m.id,
            user_id: m.user_id,
            title: m.title,
            content: m.content,
            created_at: m.created_at,
            updated_at: m.updated_at,
        }
    }
}
