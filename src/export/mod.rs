//! Model persistence
//!
//! Writes the selected model to disk in a checksummed binary envelope and
//! reads it back.

mod serializer;

pub use serializer::{load_object, save_object, ModelMetadata};
