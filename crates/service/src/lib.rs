//! Service layer: the generic owner-scoped CRUD engine and everything around it.
//! - `crud`: resource contract, storage seam and the five operations.
//! - `notes`: the concrete `notes` relation.
//! - `auth` / `user_service`: accounts, login and token resolution.
//! - `validation`: rule sets applied before any write.

pub mod errors;
pub mod validation;
pub mod crud;
pub mod notes;
pub mod auth;
pub mod user_service;
pub mod seed;
#[cfg(test)]
pub mod test_support;
