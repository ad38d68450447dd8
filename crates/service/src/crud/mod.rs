//! Generic CRUD over owner-scoped relations.
//!
//! - [`Resource`] describes a record type: relation name, field enum, create and patch shapes.
//! - [`OwnedCollection`] is the storage seam; every call carries the owner.
//! - [`CrudService`] runs the five operations on top of both.

pub mod collection;
pub mod descriptor;
pub mod memory;
pub mod payload;
pub mod resource;
pub mod service;

pub use collection::OwnedCollection;
pub use descriptor::RelationDescriptor;
pub use memory::MemoryCollection;
pub use payload::CrudPayload;
pub use resource::{FieldValue, OwnerId, Resource, ResourceField};
pub use service::CrudService;
