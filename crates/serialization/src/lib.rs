//! Polymorphic serialization registry.
//!
//! Generic save/load call sites only ever see a base abstraction and a type
//! name. This crate maps between the two: a [`Registry`] owns, per archive
//! format,
//!
//! - the type-tag directory (`TypeId` to serialized type name),
//! - the loader table (type name to "construct from archive"),
//! - the saver table (type name to "write to archive", with a checked downcast).
//!
//! Registration happens on a [`RegistryBuilder`]; [`RegistryBuilder::finalize`]
//! freezes the tables so lookups are safe from any thread. A
//! [`GlobalRegistry`] wraps the build in a `OnceLock` so a program gets one
//! registry per format, populated by a bootstrap function on first use.
//!
//! # Registering a type
//!
//! [`register_serializer`] performs the three registrations for one concrete
//! type. Loading goes through [`construct`], which only hands out a value once
//! the archive produced a complete one.

mod base;
mod builder;
pub mod config;
mod construct;
pub mod envelope;
mod error;
mod global;
mod registry;
mod table;
mod trigger;

pub use base::Base;
pub use builder::RegistryBuilder;
pub use config::{ConfigError, DuplicatePolicy, RegistryConfig};
pub use construct::construct;
pub use envelope::{load_record, save_record, serialize_prolog};
pub use error::RegistryError;
pub use global::{Bootstrap, GlobalRegistry};
pub use registry::Registry;
pub use synapse_archive as archive;
pub use table::{Collision, InsertAction, TableKind};
pub use trigger::register_serializer;
