// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # structkit - declarative value structs
//!
//! Declare record-like types by listing fields, and get construction,
//! structural equality, hashing, immutability, formatting and
//! reduce/reconstruct round-tripping for free.
//!
//! ## Quick Start
//!
//! ```rust
//! use structkit::{Args, Field, FieldType, StructBuilder, TypedField, Value};
//!
//! let point = StructBuilder::new("Point")
//!     .field("x", &TypedField::new(FieldType::Int))
//!     .field("y", &TypedField::new(FieldType::Int))
//!     .field("label", &Field)
//!     .build()
//!     .unwrap();
//!
//! let p = point
//!     .construct(Args::new().arg(1).arg(2).named("label", "origin"))
//!     .unwrap();
//! assert_eq!(p.get_as::<i64>("y").unwrap(), 2);
//! assert_eq!(p.to_string(), "Point(x=1, y=2, label=origin)");
//!
//! // Immutable by default.
//! let mut q = p.clone();
//! assert!(q.set("x", 5).is_err());
//!
//! // Copies go through the constructor.
//! let moved = p.with_changes([("x", 10)]).unwrap();
//! assert_ne!(moved, p);
//! assert_eq!(moved.with_changes([("x", 1)]).unwrap(), p);
//!
//! // Typed fields validate on write.
//! let err = point.instantiate([Value::from("a"), Value::Int(2), Value::None]).unwrap_err();
//! assert_eq!(err.to_string(), "Expected int; got str");
//! ```
//!
//! ## Architecture
//!
//! ```text
//! StructBuilder --build--> StructType (frozen fields + Signature)
//!                              |
//!                          construct(Args)
//!                              v
//!                         StructValue --write--> FieldDecl --coerce--> Descriptor
//!                                                                   (Field, TypedField
//!                                                                    -> validate::check_*)
//! ```
//!
//! ## Modules Overview
//!
//! - [`builder`] - type declaration and schema freezing
//! - [`schema`] - frozen types and constructor signatures
//! - [`instance`] - instance lifecycle
//! - [`field`] / [`typed`] - field descriptors
//! - [`validate`] - type predicates with precise diagnostics
//! - `snapshot` - serde snapshots and type registries (`serde` feature)

pub mod builder;
/// Type-level defaults and options.
pub mod config;
pub mod error;
pub mod field;
pub mod instance;
pub mod schema;
#[cfg(feature = "serde")]
pub mod snapshot;
pub mod typed;
pub mod validate;
/// Dynamic values stored in fields.
pub mod value;

pub use builder::StructBuilder;
pub use config::StructOptions;
pub use error::{BindError, Error, Result, Unhashable, ValidationError};
pub use field::{Descriptor, Field, FieldDecl};
pub use instance::{FieldMap, Reduced, StructValue};
pub use schema::{Args, InitHook, Param, Signature, StructType};
#[cfg(feature = "serde")]
pub use snapshot::{HashMapTypeRegistry, Snapshot, SnapshotValue, TypeRegistry};
pub use typed::TypedField;
pub use validate::{check_sequence, check_type, FieldType};
pub use value::{FromValue, Generator, Value};
