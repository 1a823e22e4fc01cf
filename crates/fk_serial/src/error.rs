use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;

use thiserror::Error;

// -----------------------------------------------------------------------------
// ConversionError

/// A single value could not be turned into text or back.
///
/// Produced by [`Conversion`](crate::Conversion) functions. It carries no
/// field name; [`LoadError`] and [`SaveError`] attach one.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum ConversionError {
    #[error("`{text}` is not a valid {expected}")]
    InvalidLiteral { expected: &'static str, text: String },

    #[error("`{text}` is out of range for {expected}")]
    OutOfRange { expected: &'static str, text: String },

    #[error("{code} is not a valid unicode scalar value")]
    InvalidChar { code: u32 },

    #[error("nested object failed to load: {0}")]
    NestedLoad(Box<LoadError>),

    #[error("nested object failed to save: {0}")]
    NestedSave(Box<SaveError>),

    #[error("json conversion failed: {reason}")]
    Json { reason: String },

    #[error("{0}")]
    Custom(Cow<'static, str>),
}

impl ConversionError {
    /// Creates a [`ConversionError::Custom`] for hand-written conversions.
    #[inline]
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::Custom(message.into())
    }

    #[inline]
    pub(crate) fn invalid(expected: &'static str, text: &str) -> Self {
        Self::InvalidLiteral {
            expected,
            text: text.into(),
        }
    }

    #[inline]
    pub(crate) fn out_of_range(expected: &'static str, text: &str) -> Self {
        Self::OutOfRange {
            expected,
            text: text.into(),
        }
    }
}

impl From<LoadError> for ConversionError {
    #[inline]
    fn from(value: LoadError) -> Self {
        Self::NestedLoad(Box::new(value))
    }
}

impl From<SaveError> for ConversionError {
    #[inline]
    fn from(value: SaveError) -> Self {
        Self::NestedSave(Box::new(value))
    }
}

// -----------------------------------------------------------------------------
// LoadError

/// Failure of [`Serializable::load`](crate::Serializable::load).
///
/// Whatever the variant, the object being loaded has not been modified.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum LoadError {
    #[error("malformed document: {reason}")]
    MalformedDocument { reason: String },

    #[error("missing field `{field}`")]
    MissingField { field: Cow<'static, str> },

    #[error("invalid value for field `{field}`: {source}")]
    Conversion {
        field: Cow<'static, str>,
        #[source]
        source: ConversionError,
    },
}

impl LoadError {
    #[inline]
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::MalformedDocument {
            reason: reason.into(),
        }
    }

    /// Name of the field the error refers to, if any.
    pub fn field(&self) -> Option<&str> {
        match self {
            Self::MalformedDocument { .. } => None,
            Self::MissingField { field } | Self::Conversion { field, .. } => Some(field),
        }
    }
}

// -----------------------------------------------------------------------------
// SaveError

/// Failure of [`Serializable::save`](crate::Serializable::save).
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum SaveError {
    #[error("cannot encode field `{field}`: {source}")]
    Conversion {
        field: Cow<'static, str>,
        #[source]
        source: ConversionError,
    },

    #[error("cannot encode document: {reason}")]
    Encode { reason: String },
}
