//! Error taxonomy for registration, resolution, and field injection.

use std::fmt;

use crate::type_key::TypeKey;

/// Registration failures, returned directly by [`WireHub::wire`] and
/// [`WireHub::wire_factory`].
///
/// [`WireHub::wire`]: crate::WireHub::wire
/// [`WireHub::wire_factory`]: crate::WireHub::wire_factory
#[derive(Debug, thiserror::Error)]
pub enum WireError {
    /// `wire` is restricted to capability types; binding a fixed instance
    /// under a concrete key is rejected.
    #[error("{key:?} is not a capability type")]
    NotCapability { key: TypeKey },

    /// The key already has a binding. Use `rewire` for intentional
    /// replacement; the existing binding is left intact.
    #[error("type {key:?} already has a binding")]
    DuplicateBinding { key: TypeKey },
}

/// Resolution failures, propagated up through recursive resolution.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    /// A capability type with no binding cannot be constructed.
    #[error("no binding found for capability type {key:?}")]
    NoBinding { key: TypeKey },

    /// Resolution produced candidates, but none of the exact requested
    /// type.
    #[error("no resolved candidate matches type {key:?} exactly")]
    NoMatchingOutput { key: TypeKey },

    /// A factory was handed an argument of the wrong type. Arguments are
    /// selected by declared key before invocation, so hitting this means a
    /// binding misdeclared itself.
    #[error("factory argument does not match declared type {expected:?}")]
    ArgumentMismatch { expected: TypeKey },

    /// The requested type is already being resolved higher up the stack.
    #[error("cyclic dependency: {chain}")]
    CyclicDependency { chain: String },
}

/// A single field the injector could not populate.
#[derive(Debug)]
pub struct FieldFailure {
    pub field: &'static str,
    pub error: ResolveError,
}

/// Collected outcome of a failed [`AutoWired::autowire`] call.
///
/// Injection is best-effort per field: every field that resolves is
/// assigned, and every failure is recorded here with its cause. An empty
/// failure set never escapes as an error.
///
/// [`AutoWired::autowire`]: crate::AutoWired::autowire
#[derive(Debug, Default)]
pub struct AutoWireError {
    failures: Vec<FieldFailure>,
}

impl AutoWireError {
    /// Record a failed field. Used by the generated `AutoWired` impls.
    pub fn record(&mut self, field: &'static str, error: ResolveError) {
        self.failures.push(FieldFailure { field, error });
    }

    /// Fold failures from a nested `autowire` call into this one.
    pub fn merge(&mut self, nested: AutoWireError) {
        self.failures.extend(nested.failures);
    }

    /// `Ok(())` when no field failed, the collected error otherwise.
    pub fn into_result(self) -> Result<(), AutoWireError> {
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }

    pub fn failures(&self) -> &[FieldFailure] {
        &self.failures
    }
}

impl fmt::Display for AutoWireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} injected field(s) unresolved:", self.failures.len())?;
        for failure in &self.failures {
            write!(f, " {}: {};", failure.field, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for AutoWireError {}
