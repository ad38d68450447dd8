//! SeaORM entities for users, their credentials and birthdays, and the
//! user-owned `notes` relation, plus connection helpers.

pub mod errors;
pub mod db;
pub mod user;
pub mod user_credentials;
pub mod birthday;
pub mod note;

#[cfg(test)]
mod tests;
