//! Paths into `fk_serial` used by generated code.

use proc_macro2::TokenStream;
use quote::quote;

// -----------------------------------------------------------------------------
// Crate Path

/// Get the correct access path to the `fk_serial` crate.
///
/// 1. For crates that depend on `fk_serial`, `::fk_serial` is returned.
/// 2. For crates that depend on `fieldkit`, `::fieldkit::serial` is returned.
/// 3. Otherwise `::fk_serial` is returned, which may be incorrect.
///
/// Reading the manifest is not free, so the path is obtained once per
/// derive and passed down.
pub(crate) fn fk_serial() -> syn::Path {
    fk_macro_utils::Manifest::shared(|manifest| manifest.get_crate_path("fk_serial"))
}

// -----------------------------------------------------------------------------
// Items

#[inline(always)]
pub(crate) fn serializable_(fk_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #fk_serial_path::Serializable
    }
}

#[inline(always)]
pub(crate) fn field_list_(fk_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #fk_serial_path::FieldList
    }
}

#[inline(always)]
pub(crate) fn field_value_(fk_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #fk_serial_path::FieldValue
    }
}

#[inline(always)]
pub(crate) fn conversion_(fk_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #fk_serial_path::Conversion
    }
}

#[inline(always)]
pub(crate) fn non_generic_field_list_cell_(fk_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #fk_serial_path::NonGenericFieldListCell
    }
}

#[inline(always)]
pub(crate) fn generic_field_list_cell_(fk_serial_path: &syn::Path) -> TokenStream {
    quote! {
        #fk_serial_path::GenericFieldListCell
    }
}
