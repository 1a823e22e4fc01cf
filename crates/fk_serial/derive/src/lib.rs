//! Provides [`derive Serializable`](derive_serializable).
#![cfg_attr(docsrs, feature(doc_cfg))]
#![allow(clippy::std_instead_of_core, reason = "proc-macro lib")]
#![allow(clippy::std_instead_of_alloc, reason = "proc-macro lib")]

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

static SERIAL_ATTRIBUTE_NAME: &str = "serial";

// -----------------------------------------------------------------------------
// Modules

mod field_attributes;
mod impls;
mod path;
mod serial_struct;

// -----------------------------------------------------------------------------
// Macros

/// # Derive Serializable
///
/// Implements `Serializable` for a struct with named fields. Every field is
/// registered under its own name, in declaration order, using the default
/// conversion of its type.
///
/// ```rust, ignore
/// #[derive(Serializable, Clone)]
/// struct Player {
///     name: String,
///     level: u32,
/// }
///
/// // {"name":"...","level":"..."}
/// ```
///
/// Tuple structs, unit structs, enums and unions are rejected.
///
/// ## Field Attributes
///
/// All options live in `#[serial(...)]` and can be combined with commas.
///
/// ### Rename
///
/// ```rust, ignore
/// #[serial(rename = "Level")]
/// level: u32,
/// ```
///
/// ### Skip
///
/// The field is neither saved nor loaded, and needs no conversion.
///
/// ```rust, ignore
/// #[serial(skip)]
/// cache: Vec<u8>,
/// ```
///
/// ### Custom Conversion
///
/// `with = module` uses `module::serialize` and `module::deserialize`:
///
/// ```rust, ignore
/// mod level {
///     pub fn serialize(value: &Level) -> Result<String, ConversionError> { /* ... */ }
///     pub fn deserialize(text: &str, value: &mut Level) -> Result<(), ConversionError> { /* ... */ }
/// }
///
/// #[serial(with = level)]
/// level: Level,
/// ```
///
/// `serialize_with = path` and `deserialize_with = path` replace one half
/// each; the other half stays the default conversion of the field type.
///
/// ### JSON
///
/// `json` stores the field as its `serde_json` encoding. The type must
/// implement `serde::Serialize` and `serde::de::DeserializeOwned`.
///
/// ```rust, ignore
/// #[serial(json)]
/// tags: Vec<String>,
/// ```
///
/// ## Generic Types
///
/// Generic structs are supported. Each field with a default conversion adds
/// a `FieldType: FieldValue` bound to the impl, and the field list is kept
/// per instantiation.
#[proc_macro_derive(Serializable, attributes(serial))]
pub fn derive_serializable(input: TokenStream) -> TokenStream {
    let ast = parse_macro_input!(input as DeriveInput);

    match serial_struct::SerialStruct::from_derive_input(&ast) {
        Ok(serial_struct) => impls::impl_serializable(&serial_struct).into(),
        Err(err) => err.into_compile_error().into(),
    }
}
