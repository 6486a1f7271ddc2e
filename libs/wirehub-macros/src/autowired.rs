//! Proc-macro implementation for `#[derive(AutoWired)]`.
//!
//! Expansion walks the struct's named fields and generates one resolution
//! step per `#[autowired]` field. All validation happens at expansion time
//! so misuse surfaces as a clear compile error on the offending field.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, GenericArgument, Meta, PathArguments, Type};

/// How an annotated field is injected.
enum FieldMode {
    /// `#[autowired]`: resolve and assign.
    Plain,
    /// `#[autowired(nested)]`: resolve, assign, then autowire recursively.
    Nested,
}

/// Reads the field's `autowired` attribute, if any.
fn injection_mode(field: &Field) -> syn::Result<Option<FieldMode>> {
    for attr in &field.attrs {
        if !attr.path().is_ident("autowired") {
            continue;
        }
        return match &attr.meta {
            Meta::Path(_) => Ok(Some(FieldMode::Plain)),
            Meta::List(list) => {
                let ident: syn::Ident = list.parse_args()?;
                if ident == "nested" {
                    Ok(Some(FieldMode::Nested))
                } else {
                    Err(syn::Error::new_spanned(
                        ident,
                        "expected `#[autowired]` or `#[autowired(nested)]`",
                    ))
                }
            }
            Meta::NameValue(meta) => Err(syn::Error::new_spanned(
                meta,
                "expected `#[autowired]` or `#[autowired(nested)]`",
            )),
        };
    }
    Ok(None)
}

/// Syntactic `Option<T>` detection: such fields are assigned `Some(value)`.
fn option_inner(ty: &Type) -> Option<&Type> {
    let Type::Path(path) = ty else { return None };
    if path.qself.is_some() {
        return None;
    }
    let segment = path.path.segments.last()?;
    if segment.ident != "Option" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &segment.arguments else {
        return None;
    };
    if args.args.len() != 1 {
        return None;
    }
    match args.args.first()? {
        GenericArgument::Type(inner) => Some(inner),
        _ => None,
    }
}

pub(crate) fn expand_autowired(input: &DeriveInput) -> TokenStream {
    let name = &input.ident;

    let Data::Struct(data) = &input.data else {
        return syn::Error::new_spanned(name, "AutoWired can only be derived for structs")
            .to_compile_error();
    };
    let Fields::Named(fields) = &data.fields else {
        return syn::Error::new_spanned(name, "AutoWired requires named fields")
            .to_compile_error();
    };

    let mut steps = Vec::new();
    for field in &fields.named {
        let mode = match injection_mode(field) {
            Ok(Some(mode)) => mode,
            Ok(None) => continue,
            Err(err) => return err.to_compile_error(),
        };
        let Some(ident) = field.ident.as_ref() else {
            continue;
        };
        let field_name = ident.to_string();

        let step = match (option_inner(&field.ty), mode) {
            (Some(_), FieldMode::Nested) => {
                return syn::Error::new_spanned(
                    &field.ty,
                    "`#[autowired(nested)]` cannot be used on Option fields",
                )
                .to_compile_error();
            }
            (Some(inner), FieldMode::Plain) => quote! {
                match hub.try_construct::<#inner>() {
                    ::core::result::Result::Ok(value) => {
                        self.#ident = ::core::option::Option::Some(value);
                    }
                    ::core::result::Result::Err(error) => {
                        failures.record(#field_name, error);
                    }
                }
            },
            (None, FieldMode::Plain) => {
                let ty = &field.ty;
                quote! {
                    match hub.try_construct::<#ty>() {
                        ::core::result::Result::Ok(value) => {
                            self.#ident = value;
                        }
                        ::core::result::Result::Err(error) => {
                            failures.record(#field_name, error);
                        }
                    }
                }
            }
            (None, FieldMode::Nested) => {
                let ty = &field.ty;
                quote! {
                    match hub.try_construct::<#ty>() {
                        ::core::result::Result::Ok(value) => {
                            self.#ident = value;
                            if let ::core::result::Result::Err(nested) =
                                ::wirehub::AutoWired::autowire(&mut self.#ident, hub)
                            {
                                failures.merge(nested);
                            }
                        }
                        ::core::result::Result::Err(error) => {
                            failures.record(#field_name, error);
                        }
                    }
                }
            }
        };
        steps.push(step);
    }

    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    quote! {
        impl #impl_generics ::wirehub::AutoWired for #name #ty_generics #where_clause {
            #[allow(unused_variables, unused_mut)]
            fn autowire(
                &mut self,
                hub: &::wirehub::WireHub,
            ) -> ::core::result::Result<(), ::wirehub::AutoWireError> {
                let mut failures = ::wirehub::AutoWireError::default();
                #(#steps)*
                failures.into_result()
            }
        }
    }
}
