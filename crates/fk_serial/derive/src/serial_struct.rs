use syn::{Data, DeriveInput, Fields, Generics, Ident, LitStr, Type};

use crate::field_attributes::{ConversionAttr, FieldAttributes};

/// One registered field of a derived struct.
pub(crate) struct SerialField<'a> {
    pub ident: &'a Ident,
    pub ty: &'a Type,
    pub name: LitStr,
    pub conversion: ConversionAttr,
}

/// A struct with named fields, ready for code generation.
pub(crate) struct SerialStruct<'a> {
    pub ident: &'a Ident,
    pub generics: &'a Generics,
    /// Skipped fields are not included.
    pub fields: Vec<SerialField<'a>>,
    pub fk_serial_path: syn::Path,
}

impl<'a> SerialStruct<'a> {
    pub fn from_derive_input(ast: &'a DeriveInput) -> syn::Result<Self> {
        let named = match &ast.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named,
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Serializable` cannot be derived for tuple structs, fields need names",
                    ));
                }
                Fields::Unit => {
                    return Err(syn::Error::new(
                        ast.ident.span(),
                        "`Serializable` cannot be derived for unit structs",
                    ));
                }
            },
            Data::Enum(data) => {
                return Err(syn::Error::new(
                    data.enum_token.span,
                    "`Serializable` cannot be derived for enums, use `#[serial(json)]` on the field instead",
                ));
            }
            Data::Union(data) => {
                return Err(syn::Error::new(
                    data.union_token.span,
                    "`Serializable` cannot be derived for unions",
                ));
            }
        };

        let mut fields: Vec<SerialField<'a>> = Vec::with_capacity(named.named.len());
        for field in &named.named {
            let attrs = FieldAttributes::parse_attrs(&field.attrs)?;
            if attrs.skip.is_some() {
                continue;
            }

            // Named fields always carry an ident.
            let Some(ident) = field.ident.as_ref() else {
                continue;
            };
            let name = attrs.field_name(ident);

            if let Some(prev) = fields.iter().find(|f| f.name.value() == name.value()) {
                let mut err = syn::Error::new(
                    name.span(),
                    format!("field name `{}` is used twice", name.value()),
                );
                err.combine(syn::Error::new(prev.name.span(), "first used here"));
                return Err(err);
            }

            fields.push(SerialField {
                ident,
                ty: &field.ty,
                name,
                conversion: attrs.conversion,
            });
        }

        Ok(Self {
            ident: &ast.ident,
            generics: &ast.generics,
            fields,
            fk_serial_path: crate::path::fk_serial(),
        })
    }

    /// Whether a `static` inside the impl would be shared between
    /// instantiations.
    #[inline]
    pub fn impl_with_generic(&self) -> bool {
        !self.generics.params.is_empty()
    }
}
