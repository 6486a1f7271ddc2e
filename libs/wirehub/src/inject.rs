//! Field-level injection contract.

use crate::errors::AutoWireError;
use crate::hub::WireHub;

/// Types whose annotated fields can be populated from a [`WireHub`].
///
/// Implemented through `#[derive(AutoWired)]`: fields marked `#[autowired]`
/// are resolved by their declared type (`Option<T>` fields receive
/// `Some(value)`), `#[autowired(nested)]` fields are additionally autowired
/// recursively after assignment, and unannotated fields are never touched.
///
/// The trait is object safe, so a `&mut dyn AutoWired` dispatches straight
/// to the concrete impl — capability-typed targets need no extra lookup
/// step.
pub trait AutoWired {
    /// Populate annotated fields from the hub.
    ///
    /// Injection is best-effort per field: every field that resolves is
    /// assigned even when others fail.
    ///
    /// # Errors
    ///
    /// An [`AutoWireError`] listing every field that could not be
    /// resolved, with the underlying cause for each.
    fn autowire(&mut self, hub: &WireHub) -> Result<(), AutoWireError>;
}
