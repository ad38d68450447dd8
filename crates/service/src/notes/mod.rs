//! The `notes` relation: the concrete resource served through the generic CRUD layer.

pub mod domain;
pub mod repository;

pub use domain::{Note, NoteField, NoteFields, NotePatch, NOTE_RULES};
pub use repository::SeaOrmNoteCollection;
