use alloc::string::String;

use super::{FieldValue, ValueKind};
use crate::{ConversionError, LoadMode, Serializable};

/// Nested objects delegate to their own `save` / `load`.
///
/// The nested document is embedded as one string value in the parent
/// document. Nested loads are always strict; the parent's [`LoadMode`]
/// applies only to the parent's own keys.
impl<T: Serializable + Clone> FieldValue for T {
    const KIND: ValueKind = ValueKind::Composite;

    #[inline]
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.save()?)
    }

    #[inline]
    fn from_text(&mut self, text: &str) -> Result<(), ConversionError> {
        Ok(self.load_with(text, LoadMode::Strict)?)
    }
}
