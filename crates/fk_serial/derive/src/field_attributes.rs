use proc_macro2::Span;
use syn::{Attribute, Ident, LitStr, Path, Token, parse::ParseStream};

use crate::SERIAL_ATTRIBUTE_NAME;

mod kw {
    syn::custom_keyword!(rename);
    syn::custom_keyword!(skip);
    syn::custom_keyword!(with);
    syn::custom_keyword!(serialize_with);
    syn::custom_keyword!(deserialize_with);
    syn::custom_keyword!(json);
}

/// How a field is converted, as requested by its attributes.
#[derive(Debug, Default)]
pub(crate) enum ConversionAttr {
    /// The default conversion of the field type.
    #[default]
    Resolve,
    /// `with = module`
    With(Path),
    /// `serialize_with = a`, `deserialize_with = b`, or both.
    Split {
        serialize: Option<Path>,
        deserialize: Option<Path>,
    },
    /// `json`
    Json,
}

impl ConversionAttr {
    /// Whether the generated code relies on `FieldValue` for the field type.
    pub fn needs_field_value(&self) -> bool {
        match self {
            Self::Resolve => true,
            Self::Split {
                serialize,
                deserialize,
            } => serialize.is_none() || deserialize.is_none(),
            Self::With(_) | Self::Json => false,
        }
    }
}

/// Parsed `#[serial(...)]` options of one field.
#[derive(Debug, Default)]
pub(crate) struct FieldAttributes {
    pub rename: Option<LitStr>,
    pub skip: Option<Span>,
    pub conversion: ConversionAttr,
}

impl FieldAttributes {
    /// Collects every `#[serial(...)]` on a field.
    ///
    /// Other attributes are ignored.
    pub fn parse_attrs(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut field_attrs = Self::default();
        for attr in attrs {
            if attr.path().is_ident(SERIAL_ATTRIBUTE_NAME) {
                attr.parse_args_with(|input: ParseStream| field_attrs.parse_stream(input))?;
            }
        }
        field_attrs.validity()?;
        Ok(field_attrs)
    }

    /// Format: `option (, option)* ,?`
    fn parse_stream(&mut self, input: ParseStream) -> syn::Result<()> {
        loop {
            if input.is_empty() {
                return Ok(());
            }
            self.parse_option(input)?;
            if input.is_empty() {
                return Ok(());
            }
            input.parse::<Token![,]>()?;
        }
    }

    fn parse_option(&mut self, input: ParseStream) -> syn::Result<()> {
        let lookahead = input.lookahead1();
        if lookahead.peek(kw::rename) {
            let key = input.parse::<kw::rename>()?;
            input.parse::<Token![=]>()?;
            if self.rename.is_some() {
                return Err(syn::Error::new(key.span, "duplicate `rename`"));
            }
            let name: LitStr = input.parse()?;
            if name.value().is_empty() {
                return Err(syn::Error::new(name.span(), "field name cannot be empty"));
            }
            self.rename = Some(name);
        } else if lookahead.peek(kw::skip) {
            let key = input.parse::<kw::skip>()?;
            if self.skip.is_some() {
                return Err(syn::Error::new(key.span, "duplicate `skip`"));
            }
            self.skip = Some(key.span);
        } else if lookahead.peek(kw::with) {
            let key = input.parse::<kw::with>()?;
            input.parse::<Token![=]>()?;
            self.ensure_resolve(key.span)?;
            self.conversion = ConversionAttr::With(input.parse()?);
        } else if lookahead.peek(kw::json) {
            let key = input.parse::<kw::json>()?;
            self.ensure_resolve(key.span)?;
            self.conversion = ConversionAttr::Json;
        } else if lookahead.peek(kw::serialize_with) {
            let key = input.parse::<kw::serialize_with>()?;
            input.parse::<Token![=]>()?;
            let path: Path = input.parse()?;
            *self.split_slot(key.span, true)? = Some(path);
        } else if lookahead.peek(kw::deserialize_with) {
            let key = input.parse::<kw::deserialize_with>()?;
            input.parse::<Token![=]>()?;
            let path: Path = input.parse()?;
            *self.split_slot(key.span, false)? = Some(path);
        } else {
            return Err(lookahead.error());
        }
        Ok(())
    }

    fn ensure_resolve(&self, span: Span) -> syn::Result<()> {
        if matches!(self.conversion, ConversionAttr::Resolve) {
            Ok(())
        } else {
            Err(syn::Error::new(
                span,
                "only one of `with`, `json` and `serialize_with`/`deserialize_with` can be used",
            ))
        }
    }

    fn split_slot(&mut self, span: Span, serialize_half: bool) -> syn::Result<&mut Option<Path>> {
        if matches!(self.conversion, ConversionAttr::Resolve) {
            self.conversion = ConversionAttr::Split {
                serialize: None,
                deserialize: None,
            };
        }

        let ConversionAttr::Split {
            serialize,
            deserialize,
        } = &mut self.conversion
        else {
            return Err(syn::Error::new(
                span,
                "only one of `with`, `json` and `serialize_with`/`deserialize_with` can be used",
            ));
        };

        let slot = if serialize_half { serialize } else { deserialize };
        if slot.is_some() {
            let key = if serialize_half {
                "serialize_with"
            } else {
                "deserialize_with"
            };
            return Err(syn::Error::new(span, format!("duplicate `{key}`")));
        }
        Ok(slot)
    }

    fn validity(&self) -> syn::Result<()> {
        if let Some(span) = self.skip {
            let has_other = self.rename.is_some()
                || !matches!(self.conversion, ConversionAttr::Resolve);
            if has_other {
                return Err(syn::Error::new(
                    span,
                    "`skip` cannot be combined with other options",
                ));
            }
        }
        Ok(())
    }

    /// The key a field is stored under.
    pub fn field_name(&self, ident: &Ident) -> LitStr {
        match &self.rename {
            Some(name) => name.clone(),
            None => {
                let name = ident.to_string();
                LitStr::new(name.strip_prefix("r#").unwrap_or(&name), ident.span())
            }
        }
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use syn::{Field, parse_quote};

    use super::{ConversionAttr, FieldAttributes};

    fn parse(field: Field) -> syn::Result<FieldAttributes> {
        FieldAttributes::parse_attrs(&field.attrs)
    }

    #[test]
    fn plain_field() {
        let field: Field = parse_quote! { pub level: u32 };
        let attrs = parse(field.clone()).unwrap();
        assert!(attrs.skip.is_none());
        assert!(matches!(attrs.conversion, ConversionAttr::Resolve));
        assert_eq!(attrs.field_name(field.ident.as_ref().unwrap()).value(), "level");
    }

    #[test]
    fn raw_identifier() {
        let field: Field = parse_quote! { r#type: u32 };
        let attrs = parse(field.clone()).unwrap();
        assert_eq!(attrs.field_name(field.ident.as_ref().unwrap()).value(), "type");
    }

    #[test]
    fn combined_options() {
        let field: Field = parse_quote! {
            #[doc = "ignored"]
            #[serial(rename = "Level", serialize_with = to_text)]
            #[serial(deserialize_with = self::from_text,)]
            level: u32
        };
        let attrs = parse(field.clone()).unwrap();
        assert_eq!(attrs.field_name(field.ident.as_ref().unwrap()).value(), "Level");
        let ConversionAttr::Split {
            serialize: Some(_),
            deserialize: Some(_),
        } = &attrs.conversion
        else {
            panic!("unexpected conversion: {:?}", attrs.conversion);
        };
        assert!(!attrs.conversion.needs_field_value());
    }

    #[test]
    fn needs_field_value() {
        let field: Field = parse_quote! { #[serial(serialize_with = to_text)] level: u32 };
        assert!(parse(field).unwrap().conversion.needs_field_value());

        let field: Field = parse_quote! { #[serial(with = codec)] level: u32 };
        assert!(!parse(field).unwrap().conversion.needs_field_value());

        let field: Field = parse_quote! { #[serial(json)] level: u32 };
        assert!(!parse(field).unwrap().conversion.needs_field_value());
    }

    #[test]
    fn rejects_conflicts() {
        let fields: [Field; 6] = [
            parse_quote! { #[serial(json, with = codec)] a: u8 },
            parse_quote! { #[serial(with = codec, serialize_with = f)] a: u8 },
            parse_quote! { #[serial(skip, rename = "A")] a: u8 },
            parse_quote! { #[serial(rename = "A")] #[serial(rename = "B")] a: u8 },
            parse_quote! { #[serial(serialize_with = f, serialize_with = g)] a: u8 },
            parse_quote! { #[serial(unknown)] a: u8 },
        ];
        for field in fields {
            assert!(parse(field).is_err());
        }
    }
}
