//! Database library providing the MongoDB connector and utilities.
//!
//! # Examples
//!
//! ```ignore
//! use database::mongodb;
//!
//! let client = mongodb::connect("mongodb://localhost:27017").await?;
//! let db = client.database("mydb");
//! let collection = db.collection::<Document>("events");
//! ```

pub mod common;
pub mod mongodb;

// Re-exports for convenience
pub use common::{DatabaseError, DatabaseResult};
