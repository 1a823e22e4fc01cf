//! Field handles: a named binding between an owner's field and its
//! [`Conversion`].
//!
//! [`Field<O, T>`] is the one concrete handle, generic over the field type.
//! It is used through the object-safe [`FieldHandle<O>`], so an owner can
//! keep fields of unrelated types in a single [`FieldList`].
//!
//! Handles reach the field through accessor functions instead of storing an
//! address. The same handle serves every instance of `O`, and moving or
//! cloning an instance cannot leave a handle pointing at stale storage.

// -----------------------------------------------------------------------------
// Modules

mod list;

// -----------------------------------------------------------------------------
// Exports

pub use list::{FieldList, FieldListIter};

// -----------------------------------------------------------------------------
// Imports

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::String;
use core::fmt;

use crate::convert::{Conversion, FieldValue, ValueKind};
use crate::ConversionError;

// -----------------------------------------------------------------------------
// FieldHandle

/// Type-erased access to one field of an `O`.
///
/// Implemented by [`Field<O, T>`] for every `T`. An owner never needs to
/// know `T` to save or load the field.
pub trait FieldHandle<O>: Send + Sync + 'static {
    /// The key of this field in a [`Document`](crate::Document).
    ///
    /// Errors clone this to name the failing field, which does not allocate
    /// for `'static` names.
    fn name(&self) -> &Cow<'static, str>;

    /// How the value is converted.
    fn kind(&self) -> ValueKind;

    /// `core::any::type_name` of the field type.
    fn type_name(&self) -> &'static str;

    /// Encodes the current value of the field in `owner`.
    fn save(&self, owner: &O) -> Result<String, ConversionError>;

    /// Decodes `text` directly into the field in `owner`.
    ///
    /// On failure the field may hold a partially written value. Use
    /// [`stage`](Self::stage) when the owner must stay untouched.
    fn load(&self, owner: &mut O, text: &str) -> Result<(), ConversionError>;

    /// Decodes `text` into a scratch copy of the field, leaving `owner`
    /// unchanged. The returned value is written back by
    /// [`StagedField::apply`].
    fn stage(&self, owner: &O, text: &str) -> Result<StagedField<O>, ConversionError>;
}

// -----------------------------------------------------------------------------
// Field

/// Accessor returning the field inside its owner.
pub type GetFn<O, T> = fn(&O) -> &T;

/// Mutable accessor returning the field inside its owner.
pub type GetMutFn<O, T> = fn(&mut O) -> &mut T;

/// The handle for a field of type `T` inside an `O`.
///
/// # Examples
///
/// ```
/// use fk_serial::{Field, FieldHandle, ValueKind};
///
/// struct Point { x: i32, y: i32 }
///
/// let x = Field::new("x", |p: &Point| &p.x, |p: &mut Point| &mut p.x);
/// assert_eq!(x.name(), "x");
/// assert_eq!(x.kind(), ValueKind::Fundamental);
///
/// let mut point = Point { x: 3, y: 4 };
/// assert_eq!(x.save(&point).unwrap(), "3");
///
/// x.load(&mut point, "-8").unwrap();
/// assert_eq!(point.x, -8);
/// assert_eq!(point.y, 4);
/// ```
pub struct Field<O, T> {
    name: Cow<'static, str>,
    get: GetFn<O, T>,
    get_mut: GetMutFn<O, T>,
    conversion: Conversion<T>,
}

impl<O, T: FieldValue> Field<O, T> {
    /// Creates a handle using the default conversion of `T`.
    #[inline]
    pub fn new(
        name: impl Into<Cow<'static, str>>,
        get: GetFn<O, T>,
        get_mut: GetMutFn<O, T>,
    ) -> Self {
        Self::with_conversion(name, get, get_mut, Conversion::resolve())
    }
}

impl<O, T> Field<O, T> {
    /// Creates a handle with an explicit conversion.
    ///
    /// `T` does not need a [`FieldValue`] impl here.
    #[inline]
    pub fn with_conversion(
        name: impl Into<Cow<'static, str>>,
        get: GetFn<O, T>,
        get_mut: GetMutFn<O, T>,
        conversion: Conversion<T>,
    ) -> Self {
        Self {
            name: name.into(),
            get,
            get_mut,
            conversion,
        }
    }

    #[inline]
    pub fn conversion(&self) -> &Conversion<T> {
        &self.conversion
    }
}

impl<O: 'static, T: Clone + 'static> FieldHandle<O> for Field<O, T> {
    #[inline]
    fn name(&self) -> &Cow<'static, str> {
        &self.name
    }

    #[inline]
    fn kind(&self) -> ValueKind {
        self.conversion.kind()
    }

    #[inline]
    fn type_name(&self) -> &'static str {
        core::any::type_name::<T>()
    }

    fn save(&self, owner: &O) -> Result<String, ConversionError> {
        self.conversion.serialize((self.get)(owner))
    }

    fn load(&self, owner: &mut O, text: &str) -> Result<(), ConversionError> {
        self.conversion.deserialize(text, (self.get_mut)(owner))
    }

    fn stage(&self, owner: &O, text: &str) -> Result<StagedField<O>, ConversionError> {
        let mut scratch = (self.get)(owner).clone();
        self.conversion.deserialize(text, &mut scratch)?;

        let get_mut = self.get_mut;
        Ok(StagedField {
            name: self.name.clone(),
            commit: Box::new(move |owner: &mut O| *get_mut(owner) = scratch),
        })
    }
}

impl<O, T> fmt::Debug for Field<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("type", &core::any::type_name::<T>())
            .field("kind", &self.conversion.kind())
            .finish()
    }
}

// -----------------------------------------------------------------------------
// StagedField

/// A converted field value waiting to be written into its owner.
///
/// Produced by [`FieldHandle::stage`]. Dropping it discards the value.
pub struct StagedField<O> {
    name: Cow<'static, str>,
    commit: Box<dyn FnOnce(&mut O)>,
}

impl<O> StagedField<O> {
    /// The field this value belongs to.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Writes the value into `owner`. Cannot fail.
    #[inline]
    pub fn apply(self, owner: &mut O) {
        (self.commit)(owner);
    }
}

impl<O> fmt::Debug for StagedField<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StagedField")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::String;

    use super::{Field, FieldHandle};
    use crate::{Conversion, ConversionError, ValueKind};

    #[derive(Debug, Clone, PartialEq)]
    struct Sample {
        count: u32,
        label: String,
        level: Level,
    }

    #[derive(Debug, Clone, Copy, PartialEq)]
    enum Level {
        Low,
        High,
    }

    fn level_to_text(level: &Level) -> Result<String, ConversionError> {
        Ok(String::from(match level {
            Level::Low => "low",
            Level::High => "high",
        }))
    }

    fn level_from_text(text: &str, level: &mut Level) -> Result<(), ConversionError> {
        *level = match text {
            "low" => Level::Low,
            "high" => Level::High,
            _ => return Err(ConversionError::custom("unknown level")),
        };
        Ok(())
    }

    fn sample() -> Sample {
        Sample {
            count: 7,
            label: String::from("seven"),
            level: Level::Low,
        }
    }

    #[test]
    fn handles_are_uniform() {
        let handles: [&dyn FieldHandle<Sample>; 3] = [
            &Field::new("count", |s: &Sample| &s.count, |s: &mut Sample| &mut s.count),
            &Field::new("label", |s: &Sample| &s.label, |s: &mut Sample| &mut s.label),
            &Field::with_conversion(
                "level",
                |s: &Sample| &s.level,
                |s: &mut Sample| &mut s.level,
                Conversion::new(level_to_text, level_from_text),
            ),
        ];

        let value = sample();
        let saved: [String; 3] = handles.map(|h| h.save(&value).unwrap());
        assert_eq!(saved, ["7", "seven", "low"]);

        assert_eq!(handles[0].kind(), ValueKind::Fundamental);
        assert_eq!(handles[1].kind(), ValueKind::Text);
        assert_eq!(handles[2].kind(), ValueKind::Custom);
        assert_eq!(handles[0].type_name(), "u32");
    }

    #[test]
    fn stage_does_not_touch_owner() {
        let field = Field::new("count", |s: &Sample| &s.count, |s: &mut Sample| &mut s.count);
        let mut value = sample();

        let staged = field.stage(&value, "12").unwrap();
        assert_eq!(staged.name(), "count");
        assert_eq!(value, sample());

        staged.apply(&mut value);
        assert_eq!(value.count, 12);
    }

    #[test]
    fn failed_stage_reports_error() {
        let field = Field::with_conversion(
            "level",
            |s: &Sample| &s.level,
            |s: &mut Sample| &mut s.level,
            Conversion::new(level_to_text, level_from_text),
        );
        let value = sample();

        let err = field.stage(&value, "medium").unwrap_err();
        assert_eq!(err, ConversionError::custom("unknown level"));
        assert_eq!(value, sample());
    }

    #[test]
    fn handles_follow_moved_owners() {
        let field = Field::new("label", |s: &Sample| &s.label, |s: &mut Sample| &mut s.label);

        let original = sample();
        let mut moved = Box::new(original.clone());
        field.load(&mut moved, "boxed").unwrap();

        assert_eq!(field.save(&original).unwrap(), "seven");
        assert_eq!(field.save(&moved).unwrap(), "boxed");
    }
}
