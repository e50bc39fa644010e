//! # Catalog Shared
//!
//! Shared types for the catalog ingestion system.
//!
//! This crate defines the values exchanged between providers, processors
//! and the catalog:
//!
//! - [`Entity`]: a typed, named record with free-form `spec`
//! - [`EntityRef`]: the `(kind, namespace, name)` identity of an entity
//! - [`EntityRelation`]: a typed, directed edge between two refs
//! - [`Mutation`]: a full or delta batch pushed by a provider
//! - [`LocationSpec`]: where an entity was read from

pub mod entity;
pub mod entity_ref;
pub mod location;
pub mod mutation;
pub mod relation;

pub use entity::{annotations, Entity, EntityMetadata, DEFAULT_NAMESPACE};
pub use entity_ref::{EntityRef, EntityRefError};
pub use location::LocationSpec;
pub use mutation::{DeferredEntity, Mutation};
pub use relation::{relation_types, EntityRelation};
