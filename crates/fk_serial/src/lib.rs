#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]

// -----------------------------------------------------------------------------
// Extern Self

// Generated code refers to `::fk_serial`, which must also resolve inside
// this crate's own tests and doc tests.
extern crate self as fk_serial;

extern crate alloc;

// -----------------------------------------------------------------------------
// Modules

mod cell;
mod document;
mod error;
mod serializable;

pub mod convert;
pub mod field;

#[cfg(all(test, feature = "derive"))]
mod tests;

// -----------------------------------------------------------------------------
// Top-Level exports

pub use cell::{GenericFieldListCell, NonGenericFieldListCell};
pub use convert::{Conversion, FieldValue, ValueKind};
pub use document::Document;
pub use error::{ConversionError, LoadError, SaveError};
pub use field::{Field, FieldHandle, FieldList, StagedField};
pub use serializable::{LoadMode, Serializable};

#[cfg(feature = "derive")]
pub use fk_serial_derive as derive;
