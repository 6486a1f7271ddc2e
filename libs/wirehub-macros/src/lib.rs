//! Derive macros for the `wirehub` crate.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod autowired;

/// Derives `wirehub::AutoWired` for a struct with named fields.
///
/// Field attributes:
/// - `#[autowired]` — resolve the field's declared type from the hub and
///   assign it; `Option<T>` fields receive `Some(value)`.
/// - `#[autowired(nested)]` — assign, then recursively autowire the field
///   in place (multi-level injection).
///
/// Fields without an attribute are left completely untouched. Field-level
/// resolution failures are collected and reported together.
#[proc_macro_derive(AutoWired, attributes(autowired))]
pub fn derive_autowired(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    autowired::expand_autowired(&input).into()
}
