//! Minimalistic, type-safe dependency wiring hub.
//!
//! Design goals:
//! - Providers register an implementation once: a fixed instance under its
//!   capability type (`wire`), or a typed factory under every type it
//!   produces (`wire_factory`).
//! - Consumers ask by type (`construct` / `try_construct`) without knowing
//!   how the value is built; factory arguments resolve recursively.
//! - Annotated struct fields populate themselves through
//!   [`AutoWired`](crate::AutoWired).
//!
//! Typical flows:
//! - At startup, wiring code installs value and factory bindings.
//! - Call sites resolve what they need; a factory's dependency tree is
//!   rebuilt bottom-up on every resolution (no shared-instance semantics).
//! - In tests, `clear` resets the hub so scenarios stay independent.
//!
//! Implementation details:
//! - Key = [`TypeKey`] (identity by `TypeId`). Value = type-erased binding;
//!   produced values are `Box<dyn Any>` downcast on read.
//! - One `RwLock` around a single map; resolution holds the read guard for
//!   the whole traversal.
//! - A resolution stack guards against cyclic factory graphs.
//!
//! Notes:
//! - Registration never overwrites: duplicates are errors, `rewire` is the
//!   explicit replacement path. Existing `Arc`s held by consumers stay
//!   valid across replacement.
//! - Concrete types with no binding resolve to their zero value; unbound
//!   capability types are a hard error.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::binding::{
    ArgSpec, Binding, BoxedValue, Candidate, FactoryBinding, IntoFactory, ValueBinding,
};
use crate::errors::{AutoWireError, ResolveError, WireError};
use crate::inject::AutoWired;
use crate::injectable::Injectable;
use crate::type_key::{TypeKey, TypeKind};

type BindingMap = HashMap<TypeKey, Binding>;

/// Type-keyed registry of bindings plus the recursive resolver over them.
pub struct WireHub {
    bindings: RwLock<BindingMap>,
}

impl WireHub {
    #[inline]
    pub fn new() -> Self {
        Self {
            bindings: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for WireHub {
    fn default() -> Self {
        Self::new()
    }
}

impl WireHub {
    /// Bind a fixed, pre-built instance under its capability type.
    /// Every resolution of that capability yields a clone of `instance`
    /// (for an `Arc` handle, the same shared allocation).
    ///
    /// # Errors
    ///
    /// [`WireError::NotCapability`] when `C` is a concrete type — fixed
    /// instances can only be bound to capability types.
    /// [`WireError::DuplicateBinding`] when the capability is already
    /// bound; use [`rewire`](Self::rewire) to replace intentionally.
    pub fn wire<C>(&self, instance: C) -> Result<(), WireError>
    where
        C: Injectable + Clone + Send + Sync,
    {
        let key = C::type_key();
        if key.kind() != TypeKind::Capability {
            return Err(WireError::NotCapability { key });
        }
        let mut bindings = self.bindings.write();
        if bindings.contains_key(&key) {
            return Err(WireError::DuplicateBinding { key });
        }
        bindings.insert(key, value_binding(instance));
        tracing::debug!(key = ?key, "value binding registered");
        Ok(())
    }

    /// Like [`wire`](Self::wire), but replaces any existing binding.
    ///
    /// # Errors
    ///
    /// [`WireError::NotCapability`] when `C` is a concrete type.
    pub fn rewire<C>(&self, instance: C) -> Result<(), WireError>
    where
        C: Injectable + Clone + Send + Sync,
    {
        let key = C::type_key();
        if key.kind() != TypeKind::Capability {
            return Err(WireError::NotCapability { key });
        }
        let replaced = self
            .bindings
            .write()
            .insert(key, value_binding(instance))
            .is_some();
        tracing::debug!(key = ?key, replaced, "value binding registered");
        Ok(())
    }

    /// Bind a factory function under every type it produces.
    ///
    /// A multi-output factory (tuple return) is stored once and shared by
    /// all of its output keys: resolving any one of them re-invokes the
    /// full function, producing all outputs together.
    ///
    /// # Errors
    ///
    /// [`WireError::DuplicateBinding`] when any output type is already
    /// bound. The registry is left untouched: the earlier binding stays
    /// intact and none of `factory`'s outputs are installed.
    pub fn wire_factory<F, Args, Out>(&self, factory: F) -> Result<(), WireError>
    where
        F: IntoFactory<Args, Out>,
    {
        let binding = Arc::new(factory.into_binding());
        let mut bindings = self.bindings.write();
        for key in &binding.outputs {
            if bindings.contains_key(key) {
                return Err(WireError::DuplicateBinding { key: *key });
            }
        }
        for key in &binding.outputs {
            bindings.insert(*key, Binding::Factory(Arc::clone(&binding)));
        }
        tracing::debug!(
            outputs = ?binding.outputs,
            inputs = binding.inputs.len(),
            "factory binding registered"
        );
        Ok(())
    }

    /// Resolve a `T`, collapsing every failure to `None`.
    ///
    /// Callers needing diagnostics use [`try_construct`](Self::try_construct).
    pub fn construct<T: Injectable>(&self) -> Option<T> {
        self.try_construct().ok()
    }

    /// Resolve a `T`: consult the binding for its key, recursively resolve
    /// factory arguments, and select the first produced candidate of
    /// exactly `T`. Concrete types with no binding resolve to their zero
    /// value; every resolution re-invokes the dependency factories fresh.
    ///
    /// # Errors
    ///
    /// [`ResolveError::NoBinding`] for an unbound capability anywhere in
    /// the dependency tree, [`ResolveError::CyclicDependency`] when a type
    /// is requested while already being resolved higher up the stack, and
    /// [`ResolveError::NoMatchingOutput`] when resolution produced values
    /// but none of the exact requested type.
    pub fn try_construct<T: Injectable>(&self) -> Result<T, ResolveError> {
        let spec = ArgSpec::of::<T>();
        let bindings = self.bindings.read();
        let mut stack = ResolveStack::default();
        let candidates = resolve(&bindings, &spec, &mut stack)?;
        candidates
            .into_iter()
            .find_map(|candidate| candidate.take::<T>())
            .ok_or(ResolveError::NoMatchingOutput { key: T::type_key() })
    }

    /// Populate `target`'s annotated fields from this hub.
    ///
    /// Thin wrapper over [`AutoWired::autowire`]; also accepts
    /// `&mut dyn AutoWired`, which dispatches to the concrete impl.
    ///
    /// # Errors
    ///
    /// An [`AutoWireError`] listing every field that failed to resolve.
    pub fn autowire<T>(&self, target: &mut T) -> Result<(), AutoWireError>
    where
        T: AutoWired + ?Sized,
    {
        target.autowire(self)
    }

    /// Remove every binding unconditionally. Mainly for resetting state
    /// between independent test scenarios.
    pub fn clear(&self) {
        self.bindings.write().clear();
        tracing::debug!("all bindings cleared");
    }

    /// Introspection: number of bound type keys.
    pub fn len(&self) -> usize {
        self.bindings.read().len()
    }

    /// Check if the hub has no bindings.
    pub fn is_empty(&self) -> bool {
        self.bindings.read().is_empty()
    }
}

fn value_binding<C>(instance: C) -> Binding
where
    C: Injectable + Clone + Send + Sync,
{
    Binding::Value(ValueBinding {
        produce: Box::new(move || -> BoxedValue { Box::new(instance.clone()) }),
    })
}

/// Types currently being resolved, outermost first.
#[derive(Default)]
struct ResolveStack(Vec<TypeKey>);

impl ResolveStack {
    fn enter(&mut self, key: TypeKey) -> Result<(), ResolveError> {
        if self.0.contains(&key) {
            let chain = self
                .0
                .iter()
                .chain(std::iter::once(&key))
                .map(|entry| entry.name())
                .collect::<Vec<_>>()
                .join(" -> ");
            return Err(ResolveError::CyclicDependency { chain });
        }
        self.0.push(key);
        Ok(())
    }

    fn leave(&mut self) {
        self.0.pop();
    }
}

/// Recursive core: resolve a declared type into its candidate set.
fn resolve(
    bindings: &BindingMap,
    spec: &ArgSpec,
    stack: &mut ResolveStack,
) -> Result<Vec<Candidate>, ResolveError> {
    let key = spec.key();
    match bindings.get(&key) {
        Some(Binding::Value(value)) => Ok(vec![Candidate::from_parts(key, (value.produce)())]),
        Some(Binding::Factory(factory)) => {
            stack.enter(key)?;
            let args = resolve_arguments(bindings, factory, stack)?;
            stack.leave();
            tracing::trace!(key = ?key, "invoking factory binding");
            (factory.invoke)(args)
        }
        None if key.kind() == TypeKind::Concrete => {
            // Unbound leaf: an empty but well-typed value.
            let value = spec.zero_value().ok_or(ResolveError::NoBinding { key })?;
            Ok(vec![Candidate::from_parts(key, value)])
        }
        None => Err(ResolveError::NoBinding { key }),
    }
}

fn resolve_arguments(
    bindings: &BindingMap,
    factory: &FactoryBinding,
    stack: &mut ResolveStack,
) -> Result<Vec<BoxedValue>, ResolveError> {
    let mut args = Vec::with_capacity(factory.inputs.len());
    for input in &factory.inputs {
        let candidates = resolve(bindings, input, stack)?;
        let value = first_by_key(candidates, input.key())
            .ok_or(ResolveError::NoMatchingOutput { key: input.key() })?;
        args.push(value);
    }
    Ok(args)
}

/// First candidate whose declared type matches exactly, or none.
fn first_by_key(candidates: Vec<Candidate>, key: TypeKey) -> Option<BoxedValue> {
    candidates
        .into_iter()
        .find(|candidate| candidate.key() == key)
        .map(Candidate::into_value)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used)]

    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    trait TestApi: Send + Sync {
        fn id(&self) -> usize;
    }

    struct ImplA(usize);

    impl TestApi for ImplA {
        fn id(&self) -> usize {
            self.0
        }
    }

    crate::capability!(TestApi);

    #[test]
    fn wire_and_construct_returns_the_same_instance() {
        let hub = WireHub::new();
        let api: Arc<dyn TestApi> = Arc::new(ImplA(7));
        hub.wire(api.clone()).unwrap();

        let got = hub.construct::<Arc<dyn TestApi>>().unwrap();
        assert_eq!(got.id(), 7);
        assert!(Arc::ptr_eq(&api, &got));

        let again = hub.construct::<Arc<dyn TestApi>>().unwrap();
        assert!(
            Arc::ptr_eq(&api, &again),
            "value bindings hand out the same instance on every call"
        );
    }

    #[test]
    fn wire_rejects_concrete_types() {
        let hub = WireHub::new();
        let result = hub.wire(42_i32);
        assert!(matches!(result, Err(WireError::NotCapability { .. })));
        assert!(hub.is_empty(), "rejected registration must not bind");
    }

    #[test]
    fn duplicate_wire_fails_and_rewire_replaces() {
        let hub = WireHub::new();
        let first: Arc<dyn TestApi> = Arc::new(ImplA(10));
        let second: Arc<dyn TestApi> = Arc::new(ImplA(20));

        hub.wire(first.clone()).unwrap();
        let result = hub.wire(second.clone());
        assert!(matches!(result, Err(WireError::DuplicateBinding { .. })));
        assert!(
            Arc::ptr_eq(&first, &hub.construct::<Arc<dyn TestApi>>().unwrap()),
            "failed registration leaves the first binding intact"
        );

        hub.rewire(second.clone()).unwrap();
        assert!(Arc::ptr_eq(
            &second,
            &hub.construct::<Arc<dyn TestApi>>().unwrap()
        ));
    }

    #[test]
    fn unbound_capability_is_a_hard_error() {
        let hub = WireHub::new();

        assert!(hub.construct::<Arc<dyn TestApi>>().is_none());
        let err = hub.try_construct::<Arc<dyn TestApi>>().unwrap_err();
        match err {
            ResolveError::NoBinding { key } => {
                assert!(format!("{key:?}").contains("TestApi"));
            }
            other => panic!("expected NoBinding, got {other}"),
        }
    }

    #[test]
    fn unbound_concrete_types_resolve_to_their_zero_value() {
        let hub = WireHub::new();
        assert_eq!(hub.construct::<i64>(), Some(0));
        assert_eq!(hub.construct::<bool>(), Some(false));
        assert_eq!(hub.construct::<String>(), Some(String::new()));
    }

    #[test]
    fn zero_argument_factory_produces_its_value() {
        let hub = WireHub::new();
        hub.wire_factory(|| 42_i32).unwrap();
        assert_eq!(hub.construct::<i32>(), Some(42));
    }

    #[derive(Default, Clone, Debug, PartialEq)]
    struct Left(u8);

    #[derive(Default, Clone, Debug, PartialEq)]
    struct Right(u8);

    crate::injectable!(Left, Right);

    #[test]
    fn multi_output_factory_runs_once_per_resolution() {
        let hub = WireHub::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let counted = {
            let calls = Arc::clone(&calls);
            move || {
                calls.fetch_add(1, Ordering::SeqCst);
                (Left(1), Right(2))
            }
        };
        hub.wire_factory(counted).unwrap();

        assert_eq!(hub.construct::<Left>(), Some(Left(1)));
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // The sibling key re-invokes the same shared binding.
        assert_eq!(hub.construct::<Right>(), Some(Right(2)));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn duplicate_factory_output_rejected_with_first_intact() {
        let hub = WireHub::new();
        hub.wire_factory(|| 1_i32).unwrap();

        let result = hub.wire_factory(|| (2_i32, Left(3)));
        assert!(matches!(result, Err(WireError::DuplicateBinding { .. })));

        assert_eq!(hub.construct::<i32>(), Some(1));
        assert_eq!(
            hub.construct::<Left>(),
            Some(Left(0)),
            "no output of the rejected factory may be installed"
        );
    }

    #[test]
    fn factory_arguments_resolve_transitively() {
        let hub = WireHub::new();
        hub.wire_factory(|| Left(5)).unwrap();
        hub.wire_factory(|left: Left| -> Arc<dyn TestApi> { Arc::new(ImplA(left.0 as usize)) })
            .unwrap();

        let api = hub.construct::<Arc<dyn TestApi>>().unwrap();
        assert_eq!(api.id(), 5);
    }

    #[test]
    fn cyclic_factory_graphs_fail_fast() {
        let hub = WireHub::new();
        hub.wire_factory(|right: Right| Left(right.0)).unwrap();
        hub.wire_factory(|left: Left| Right(left.0)).unwrap();

        let err = hub.try_construct::<Left>().unwrap_err();
        match err {
            ResolveError::CyclicDependency { chain } => {
                assert!(chain.contains("Left"));
                assert!(chain.contains("Right"));
            }
            other => panic!("expected CyclicDependency, got {other}"),
        }
    }

    #[test]
    fn clear_behaves_like_a_fresh_hub() {
        let hub = WireHub::new();
        hub.wire_factory(|| 7_i32).unwrap();
        let api: Arc<dyn TestApi> = Arc::new(ImplA(1));
        hub.wire(api).unwrap();
        assert_eq!(hub.len(), 2);

        hub.clear();

        assert!(hub.is_empty());
        assert_eq!(hub.construct::<i32>(), Some(0), "stale binding survived clear");
        assert!(hub.construct::<Arc<dyn TestApi>>().is_none());
        hub.wire_factory(|| 7_i32).unwrap();
        assert_eq!(hub.construct::<i32>(), Some(7));
    }

    #[test]
    fn len_and_is_empty_reflect_registration_state() {
        let hub = WireHub::new();
        assert_eq!(hub.len(), 0);
        assert!(hub.is_empty());

        hub.wire_factory(|| (Left(1), Right(2))).unwrap();
        assert_eq!(hub.len(), 2, "one key per declared output");
        assert!(!hub.is_empty());

        hub.clear();
        assert_eq!(hub.len(), 0);
    }

    #[tracing_test::traced_test]
    #[test]
    fn registration_and_clear_are_logged() {
        let hub = WireHub::new();
        let api: Arc<dyn TestApi> = Arc::new(ImplA(3));
        hub.wire(api).unwrap();
        hub.wire_factory(|| 9_i32).unwrap();
        hub.clear();

        assert!(logs_contain("value binding registered"));
        assert!(logs_contain("factory binding registered"));
        assert!(logs_contain("all bindings cleared"));
    }
}
