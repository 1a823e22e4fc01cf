use alloc::string::{String, ToString};

use serde_core::Serialize;
use serde_core::de::DeserializeOwned;

use super::Conversion;
use crate::ConversionError;

impl<T: Serialize + DeserializeOwned> Conversion<T> {
    /// A conversion through `serde_json`.
    ///
    /// The field text is the JSON encoding of the value, e.g. `"Red"` for a
    /// unit enum variant or `[1,2]` for a `Vec<u8>`. Useful for types that
    /// have serde impls but no [`FieldValue`](super::FieldValue) impl.
    ///
    /// # Examples
    ///
    /// ```
    /// use fk_serial::Conversion;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Serialize, Deserialize, Debug, PartialEq)]
    /// enum Shape { Circle, Square }
    ///
    /// let conversion = Conversion::<Shape>::json();
    /// assert_eq!(conversion.serialize(&Shape::Square).unwrap(), r#""Square""#);
    ///
    /// let mut shape = Shape::Circle;
    /// conversion.deserialize(r#""Square""#, &mut shape).unwrap();
    /// assert_eq!(shape, Shape::Square);
    /// ```
    #[inline]
    pub const fn json() -> Self {
        Self::new(to_json::<T>, from_json::<T>)
    }
}

fn to_json<T: Serialize>(value: &T) -> Result<String, ConversionError> {
    serde_json::to_string(value).map_err(|err| ConversionError::Json {
        reason: err.to_string(),
    })
}

fn from_json<T: DeserializeOwned>(text: &str, value: &mut T) -> Result<(), ConversionError> {
    *value = serde_json::from_str(text).map_err(|err| ConversionError::Json {
        reason: err.to_string(),
    })?;
    Ok(())
}

// -----------------------------------------------------------------------------
// Tests
