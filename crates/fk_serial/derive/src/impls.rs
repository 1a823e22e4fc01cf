use proc_macro2::TokenStream;
use quote::quote;

use crate::field_attributes::ConversionAttr;
use crate::serial_struct::{SerialField, SerialStruct};

/// Generate implementation code for `Serializable`.
///
/// ```ignore
/// impl Serializable for Foo {
///     fn fields() -> &'static FieldList<Self> {
///         static CELL: NonGenericFieldListCell<Foo> = NonGenericFieldListCell::new();
///         CELL.get_or_init(|| {
///             FieldList::<Self>::new()
///                 .field("a", |owner: &Self| &owner.a, |owner: &mut Self| &mut owner.a)
///         })
///     }
/// }
/// ```
pub(crate) fn impl_serializable(serial: &SerialStruct) -> TokenStream {
    let fk_serial_path = &serial.fk_serial_path;
    let serializable_ = crate::path::serializable_(fk_serial_path);
    let field_list_ = crate::path::field_list_(fk_serial_path);

    let registrations = serial
        .fields
        .iter()
        .map(|field| field_registration(fk_serial_path, field));

    let list_tokens = quote! {
        #field_list_::<Self>::new()
            #(#registrations)*
    };

    let ident = serial.ident;

    // `Self` is not allowed in a nested `static`, hence the concrete ident.
    let inner_cell_tokens = if serial.impl_with_generic() {
        let list_cell = crate::path::generic_field_list_cell_(fk_serial_path);
        quote! {
            static CELL: #list_cell = #list_cell::new();
            CELL.get_or_insert::<Self>(|| {
                #list_tokens
            })
        }
    } else {
        let list_cell = crate::path::non_generic_field_list_cell_(fk_serial_path);
        quote! {
            static CELL: #list_cell<#ident> = #list_cell::new();
            CELL.get_or_init(|| {
                #list_tokens
            })
        }
    };

    let (impl_generics, ty_generics, _) = serial.generics.split_for_impl();
    let where_clause = where_clause(serial);

    quote! {
        impl #impl_generics #serializable_ for #ident #ty_generics #where_clause {
            fn fields() -> &'static #field_list_<Self> {
                #inner_cell_tokens
            }
        }
    }
}

fn field_registration(fk_serial_path: &syn::Path, field: &SerialField) -> TokenStream {
    let SerialField {
        ident, name, conversion, ..
    } = field;

    let get = quote! { |owner: &Self| &owner.#ident };
    let get_mut = quote! { |owner: &mut Self| &mut owner.#ident };

    let conversion_ = crate::path::conversion_(fk_serial_path);
    let conversion = match conversion {
        ConversionAttr::Resolve => {
            return quote! {
                .field(#name, #get, #get_mut)
            };
        }
        ConversionAttr::With(module) => quote! {
            #conversion_::new(#module::serialize, #module::deserialize)
        },
        ConversionAttr::Json => quote! {
            #conversion_::json()
        },
        ConversionAttr::Split {
            serialize: Some(serialize),
            deserialize: Some(deserialize),
        } => quote! {
            #conversion_::new(#serialize, #deserialize)
        },
        ConversionAttr::Split {
            serialize,
            deserialize,
        } => {
            let serialize = serialize.iter();
            let deserialize = deserialize.iter();
            quote! {
                #conversion_::resolve()
                    #(.with_serializer(#serialize))*
                    #(.with_deserializer(#deserialize))*
            }
        }
    };

    quote! {
        .custom(#name, #get, #get_mut, #conversion)
    }
}

/// The declared where clause, plus:
///
/// - `Self: 'static` when the type has generic parameters;
/// - `FieldType: FieldValue` for generic fields using a default conversion;
/// - `FieldType: Clone + 'static` for generic fields with a custom conversion.
fn where_clause(serial: &SerialStruct) -> TokenStream {
    let existing = serial
        .generics
        .where_clause
        .as_ref()
        .map(|clause| clause.predicates.iter().collect::<Vec<_>>())
        .unwrap_or_default();

    if !serial.impl_with_generic() {
        return if existing.is_empty() {
            TokenStream::new()
        } else {
            quote! { where #(#existing,)* }
        };
    }

    let field_value_ = crate::path::field_value_(&serial.fk_serial_path);
    let field_predicates = serial.fields.iter().map(|field| {
        let ty = field.ty;
        if field.conversion.needs_field_value() {
            quote! { #ty: #field_value_ }
        } else {
            quote! { #ty: ::core::clone::Clone + 'static }
        }
    });

    quote! {
        where
            Self: 'static,
            #(#existing,)*
            #(#field_predicates,)*
    }
}

// -----------------------------------------------------------------------------
// Tests
