//! Per-type text conversion.
//!
//! [`FieldValue`] is the default strategy for a type. It is implemented for
//! fundamental scalars in this module and, through a blanket impl, for
//! every `Serializable + Clone` type. Which rule applies is decided by trait
//! resolution at the point a field is declared; nothing is inspected at
//! save or load time.
//!
//! [`Conversion`] is the resolved form stored by a field handle: two plain
//! function pointers. A field can be given any other pair, which is how
//! types without a [`FieldValue`] impl (enums, fixed-point wrappers, ...)
//! take part.

// -----------------------------------------------------------------------------
// Modules

mod composite;
mod fundamental;
mod json;

// -----------------------------------------------------------------------------
// Imports

use alloc::string::String;
use core::fmt;

use crate::ConversionError;

// -----------------------------------------------------------------------------
// ValueKind

/// The conversion category of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// Integers, floats, `bool` and `char`.
    Fundamental,
    /// `String`, stored verbatim.
    Text,
    /// A nested [`Serializable`](crate::Serializable) type.
    Composite,
    /// A field whose conversion was supplied explicitly.
    Custom,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Fundamental => "fundamental",
            Self::Text => "text",
            Self::Composite => "composite",
            Self::Custom => "custom",
        })
    }
}

// -----------------------------------------------------------------------------
// FieldValue

/// Types with a default text conversion.
///
/// `from_text` writes into an existing value rather than returning a new
/// one, so composite values are reloaded in place.
///
/// A type that is neither a fundamental scalar nor
/// [`Serializable`](crate::Serializable) has no impl, and declaring a
/// resolved field of that type fails to compile:
///
/// ```compile_fail
/// use fk_serial::FieldList;
///
/// struct Opaque;
/// struct Owner { value: Opaque }
///
/// let _ = FieldList::<Owner>::new()
///     .field("value", |o: &Owner| &o.value, |o: &mut Owner| &mut o.value);
/// ```
pub trait FieldValue: Clone + 'static {
    /// The category used for this type.
    const KIND: ValueKind;

    /// Renders the value as text.
    fn to_text(&self) -> Result<String, ConversionError>;

    /// Parses `text` into `self`.
    ///
    /// On error `self` may have been partially written; callers that need
    /// atomicity work on a scratch copy.
    fn from_text(&mut self, text: &str) -> Result<(), ConversionError>;
}

// -----------------------------------------------------------------------------
// Conversion

/// Serialization function of a [`Conversion`].
pub type SerializeFn<T> = fn(&T) -> Result<String, ConversionError>;

/// Deserialization function of a [`Conversion`].
pub type DeserializeFn<T> = fn(&str, &mut T) -> Result<(), ConversionError>;

/// The pair of functions a field uses to encode and decode its value.
///
/// Internally stores function pointers for one concrete `T`, resolved when
/// the field is declared.
///
/// # Examples
///
/// ```
/// use fk_serial::{Conversion, ConversionError};
///
/// fn percent(value: &f64) -> Result<String, ConversionError> {
///     Ok(format!("{}%", value * 100.0))
/// }
///
/// let conversion = Conversion::<f64>::resolve().with_serializer(percent);
/// assert_eq!(conversion.serialize(&0.25).unwrap(), "25%");
///
/// let mut value = 0.0;
/// conversion.deserialize("0.5", &mut value).unwrap();
/// assert_eq!(value, 0.5);
/// ```
pub struct Conversion<T> {
    serialize: SerializeFn<T>,
    deserialize: DeserializeFn<T>,
    kind: ValueKind,
}

impl<T> Conversion<T> {
    /// Creates a conversion from two explicit functions.
    #[inline]
    pub const fn new(serialize: SerializeFn<T>, deserialize: DeserializeFn<T>) -> Self {
        Self {
            serialize,
            deserialize,
            kind: ValueKind::Custom,
        }
    }

    /// Replaces the serialization half.
    #[inline]
    pub const fn with_serializer(mut self, serialize: SerializeFn<T>) -> Self {
        self.serialize = serialize;
        self.kind = ValueKind::Custom;
        self
    }

    /// Replaces the deserialization half.
    #[inline]
    pub const fn with_deserializer(mut self, deserialize: DeserializeFn<T>) -> Self {
        self.deserialize = deserialize;
        self.kind = ValueKind::Custom;
        self
    }

    /// The category this conversion was built from.
    #[inline]
    pub const fn kind(&self) -> ValueKind {
        self.kind
    }

    #[inline]
    pub fn serialize(&self, value: &T) -> Result<String, ConversionError> {
        (self.serialize)(value)
    }

    #[inline]
    pub fn deserialize(&self, text: &str, value: &mut T) -> Result<(), ConversionError> {
        (self.deserialize)(text, value)
    }
}

impl<T: FieldValue> Conversion<T> {
    /// The default conversion of `T`.
    #[inline]
    pub const fn resolve() -> Self {
        Self {
            serialize: T::to_text,
            deserialize: from_text_in_place::<T>,
            kind: T::KIND,
        }
    }
}

#[inline]
fn from_text_in_place<T: FieldValue>(text: &str, value: &mut T) -> Result<(), ConversionError> {
    value.from_text(text)
}

impl<T: FieldValue> Default for Conversion<T> {
    #[inline]
    fn default() -> Self {
        Self::resolve()
    }
}

impl<T> Clone for Conversion<T> {
    #[inline]
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Conversion<T> {}

impl<T> fmt::Debug for Conversion<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Conversion")
            .field("type", &core::any::type_name::<T>())
            .field("kind", &self.kind)
            .finish()
    }
}
