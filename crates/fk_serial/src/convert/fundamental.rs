use alloc::string::{String, ToString};
use core::num::{IntErrorKind, ParseIntError};
use core::str::FromStr;

use super::{FieldValue, ValueKind};
use crate::ConversionError;

// -----------------------------------------------------------------------------
// Integers

fn parse_integer<T>(text: &str, expected: &'static str) -> Result<T, ConversionError>
where
    T: FromStr<Err = ParseIntError>,
{
    text.trim_ascii().parse::<T>().map_err(|err| match err.kind() {
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
            ConversionError::out_of_range(expected, text)
        }
        _ => ConversionError::invalid(expected, text),
    })
}

macro_rules! impl_integer {
    ($($ty:ident),* $(,)?) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Fundamental;

            #[inline]
            fn to_text(&self) -> Result<String, ConversionError> {
                Ok(self.to_string())
            }

            #[inline]
            fn from_text(&mut self, text: &str) -> Result<(), ConversionError> {
                *self = parse_integer::<$ty>(text, stringify!($ty))?;
                Ok(())
            }
        }
    )*};
}

impl_integer!(i8, i16, i32, i64, i128, isize);
impl_integer!(u8, u16, u32, u64, u128, usize);

// -----------------------------------------------------------------------------
// Floats

// `Display` for floats is the shortest text that parses back to the same
// value, and never depends on locale.
macro_rules! impl_float {
    ($($ty:ident),* $(,)?) => {$(
        impl FieldValue for $ty {
            const KIND: ValueKind = ValueKind::Fundamental;

            #[inline]
            fn to_text(&self) -> Result<String, ConversionError> {
                Ok(self.to_string())
            }

            fn from_text(&mut self, text: &str) -> Result<(), ConversionError> {
                let trimmed = text.trim_ascii();
                let value = trimmed
                    .parse::<$ty>()
                    .map_err(|_| ConversionError::invalid(stringify!($ty), text))?;

                // A finite literal too large for the type parses as infinity.
                if value.is_infinite() && !trimmed.to_ascii_lowercase().contains("inf") {
                    return Err(ConversionError::out_of_range(stringify!($ty), text));
                }

                *self = value;
                Ok(())
            }
        }
    )*};
}

impl_float!(f32, f64);

// -----------------------------------------------------------------------------
// bool & char

impl FieldValue for bool {
    const KIND: ValueKind = ValueKind::Fundamental;

    #[inline]
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(String::from(if *self { "1" } else { "0" }))
    }

    fn from_text(&mut self, text: &str) -> Result<(), ConversionError> {
        *self = match text.trim_ascii() {
            "1" | "true" => true,
            "0" | "false" => false,
            _ => return Err(ConversionError::invalid("bool", text)),
        };
        Ok(())
    }
}

/// Characters are stored as their decimal code point.
impl FieldValue for char {
    const KIND: ValueKind = ValueKind::Fundamental;

    #[inline]
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(u32::from(*self).to_string())
    }

    fn from_text(&mut self, text: &str) -> Result<(), ConversionError> {
        let code = parse_integer::<u32>(text, "char")?;
        *self = char::from_u32(code).ok_or(ConversionError::InvalidChar { code })?;
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// String

impl FieldValue for String {
    const KIND: ValueKind = ValueKind::Text;

    #[inline]
    fn to_text(&self) -> Result<String, ConversionError> {
        Ok(self.clone())
    }

    #[inline]
    fn from_text(&mut self, text: &str) -> Result<(), ConversionError> {
        self.clear();
        self.push_str(text);
        Ok(())
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use super::FieldValue;
    use crate::ConversionError;

    fn load<T: FieldValue>(mut value: T, text: &str) -> Result<T, ConversionError> {
        value.from_text(text)?;
        Ok(value)
    }

    #[test]
    fn integers() {
        assert_eq!(42_i32.to_text().unwrap(), "42");
        assert_eq!((-7_i64).to_text().unwrap(), "-7");
        assert_eq!(u128::MAX.to_text().unwrap(), "340282366920938463463374607431768211455");

        assert_eq!(load(0_i32, "-15").unwrap(), -15);
        assert_eq!(load(0_u16, " 65535 ").unwrap(), 65535);
        assert_eq!(load(0_i128, "-170141183460469231731687303715884105728").unwrap(), i128::MIN);
    }

    #[test]
    fn integer_rejects_bad_text() {
        assert!(matches!(
            load(0_i32, "not-a-number"),
            Err(ConversionError::InvalidLiteral { expected: "i32", .. })
        ));
        assert!(matches!(
            load(0_i32, "1.5"),
            Err(ConversionError::InvalidLiteral { .. })
        ));
        assert!(matches!(load(0_u8, ""), Err(ConversionError::InvalidLiteral { .. })));
        assert!(matches!(
            load(0_u8, "256"),
            Err(ConversionError::OutOfRange { expected: "u8", .. })
        ));
        assert!(matches!(
            load(0_u32, "-1"),
            Err(ConversionError::InvalidLiteral { .. })
        ));
        assert!(matches!(
            load(0_i8, "-129"),
            Err(ConversionError::OutOfRange { .. })
        ));
    }

    #[test]
    fn floats() {
        assert_eq!(1.5_f64.to_text().unwrap(), "1.5");
        assert_eq!(0.1_f32.to_text().unwrap(), "0.1");

        assert_eq!(load(0.0_f64, "-2.5e3").unwrap(), -2500.0);
        assert_eq!(load(0.0_f64, "+7").unwrap(), 7.0);
        assert_eq!(load(0.0_f32, "1E-2").unwrap(), 0.01);
        assert!(load(0.0_f64, "-inf").unwrap().is_infinite());
        assert!(load(0.0_f64, "NaN").unwrap().is_nan());

        let value = 0.1_f64 + 0.2;
        assert_eq!(load(0.0_f64, &value.to_text().unwrap()).unwrap(), value);
    }

    #[test]
    fn float_rejects_bad_text() {
        assert!(matches!(
            load(0.0_f64, "1,5"),
            Err(ConversionError::InvalidLiteral { expected: "f64", .. })
        ));
        assert!(matches!(
            load(0.0_f32, "1e40"),
            Err(ConversionError::OutOfRange { expected: "f32", .. })
        ));
    }

    #[test]
    fn bool_and_char() {
        assert_eq!(true.to_text().unwrap(), "1");
        assert_eq!(false.to_text().unwrap(), "0");
        assert!(load(false, "1").unwrap());
        assert!(!load(true, "false").unwrap());
        assert!(matches!(load(false, "yes"), Err(ConversionError::InvalidLiteral { .. })));

        assert_eq!('A'.to_text().unwrap(), "65");
        assert_eq!(load(' ', "65").unwrap(), 'A');
        let crab = '\u{1F980}';
        assert_eq!(load(' ', &crab.to_text().unwrap()).unwrap(), crab);
        assert_eq!(
            load(' ', "55296"),
            Err(ConversionError::InvalidChar { code: 0xD800 })
        );
    }

    #[test]
    fn strings_are_verbatim() {
        let text = String::from(" spaced \"quoted\" ");
        assert_eq!(text.to_text().unwrap(), text);
        assert_eq!(load(String::from("old"), "  new ").unwrap(), "  new ");
    }
}
