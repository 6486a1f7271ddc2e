//! Bindings: how the hub produces values for a type.
//!
//! Registration erases typed factories into a uniform shape the resolver
//! can walk: declared input specs, declared output keys, and an invoke
//! closure over `Box<dyn Any>` values (downcast on use). The declared keys
//! travel with every produced value as a [`Candidate`], so selection never
//! needs to inspect runtime types.

use std::any::Any;
use std::sync::Arc;

use crate::errors::ResolveError;
use crate::injectable::Injectable;
use crate::type_key::TypeKey;

pub(crate) type BoxedValue = Box<dyn Any>;

/// One value produced during resolution, tagged with its declared type.
pub struct Candidate {
    key: TypeKey,
    value: BoxedValue,
}

impl Candidate {
    pub(crate) fn of<T: Injectable>(value: T) -> Self {
        Self {
            key: T::type_key(),
            value: Box::new(value),
        }
    }

    pub(crate) fn from_parts(key: TypeKey, value: BoxedValue) -> Self {
        Self { key, value }
    }

    /// Declared type of the carried value.
    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    /// Consume the candidate if it holds exactly a `T`.
    pub fn take<T: 'static>(self) -> Option<T> {
        self.value.downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub(crate) fn into_value(self) -> BoxedValue {
        self.value
    }
}

/// Declared factory input: lookup key plus the zero-value fallback used
/// when a concrete type has no binding.
pub struct ArgSpec {
    key: TypeKey,
    zero: fn() -> Option<BoxedValue>,
}

impl ArgSpec {
    pub fn of<T: Injectable>() -> Self {
        fn boxed_zero<T: Injectable>() -> Option<BoxedValue> {
            T::zero().map(|value| Box::new(value) as BoxedValue)
        }
        Self {
            key: T::type_key(),
            zero: boxed_zero::<T>,
        }
    }

    #[inline]
    pub fn key(&self) -> TypeKey {
        self.key
    }

    pub(crate) fn zero_value(&self) -> Option<BoxedValue> {
        (self.zero)()
    }
}

/// Registry entry: either a fixed instance or a deferred constructor.
pub(crate) enum Binding {
    Value(ValueBinding),
    /// Shared between all output keys of a multi-output factory.
    Factory(Arc<FactoryBinding>),
}

pub(crate) struct ValueBinding {
    pub(crate) produce: Box<dyn Fn() -> BoxedValue + Send + Sync>,
}

/// Type-erased factory binding.
pub struct FactoryBinding {
    pub(crate) inputs: Vec<ArgSpec>,
    pub(crate) outputs: Vec<TypeKey>,
    pub(crate) invoke:
        Box<dyn Fn(Vec<BoxedValue>) -> Result<Vec<Candidate>, ResolveError> + Send + Sync>,
}

/// Declared outputs of a factory: a single [`Injectable`] value, or a tuple
/// of them. A tuple factory yields all members as candidates together.
pub trait FactoryOutputs: 'static {
    fn keys() -> Vec<TypeKey>;
    fn into_candidates(self) -> Vec<Candidate>;
}

impl<T: Injectable> FactoryOutputs for T {
    fn keys() -> Vec<TypeKey> {
        vec![T::type_key()]
    }

    fn into_candidates(self) -> Vec<Candidate> {
        vec![Candidate::of(self)]
    }
}

macro_rules! tuple_outputs {
    ($($out:ident),+) => {
        impl<$($out: Injectable),+> FactoryOutputs for ($($out,)+) {
            fn keys() -> Vec<TypeKey> {
                vec![$($out::type_key()),+]
            }

            #[allow(non_snake_case)]
            fn into_candidates(self) -> Vec<Candidate> {
                let ($($out,)+) = self;
                vec![$(Candidate::of($out)),+]
            }
        }
    };
}

tuple_outputs!(R0, R1);
tuple_outputs!(R0, R1, R2);
tuple_outputs!(R0, R1, R2, R3);

/// Conversion from a typed `Fn` into a type-erased [`FactoryBinding`].
///
/// Implemented for functions and closures of up to four arguments whose
/// argument types are [`Injectable`] and whose return type is a
/// [`FactoryOutputs`].
pub trait IntoFactory<Args, Out>: Send + Sync + 'static {
    fn into_binding(self) -> FactoryBinding;
}

macro_rules! impl_into_factory {
    ($($arg:ident),*) => {
        impl<Func, Out, $($arg),*> IntoFactory<($($arg,)*), Out> for Func
        where
            Func: Fn($($arg),*) -> Out + Send + Sync + 'static,
            Out: FactoryOutputs,
            $($arg: Injectable,)*
        {
            fn into_binding(self) -> FactoryBinding {
                FactoryBinding {
                    inputs: vec![$(ArgSpec::of::<$arg>()),*],
                    outputs: Out::keys(),
                    invoke: Box::new(move |args: Vec<BoxedValue>| {
                        #[allow(unused_mut, unused_variables)]
                        let mut args = args.into_iter();
                        $(
                            #[allow(non_snake_case)]
                            let $arg = match args.next().map(|value| value.downcast::<$arg>()) {
                                Some(Ok(value)) => *value,
                                _ => {
                                    return Err(ResolveError::ArgumentMismatch {
                                        expected: <$arg as Injectable>::type_key(),
                                    });
                                }
                            };
                        )*
                        Ok((self)($($arg),*).into_candidates())
                    }),
                }
            }
        }
    };
}

impl_into_factory!();
impl_into_factory!(A0);
impl_into_factory!(A0, A1);
impl_into_factory!(A0, A1, A2);
impl_into_factory!(A0, A1, A2, A3);

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default, Clone, Debug, PartialEq)]
    struct Left(u8);

    #[derive(Default, Clone, Debug, PartialEq)]
    struct Right(u8);

    crate::injectable!(Left, Right);

    #[test]
    fn single_output_factories_declare_one_key() {
        let binding = (|| Left(1)).into_binding();
        assert!(binding.inputs.is_empty());
        assert_eq!(binding.outputs, vec![Left::type_key()]);
    }

    #[test]
    fn tuple_factories_declare_every_output_and_produce_all_candidates() {
        let binding = (|| (Left(1), Right(2))).into_binding();
        assert_eq!(binding.outputs, vec![Left::type_key(), Right::type_key()]);

        let candidates = (binding.invoke)(Vec::new()).unwrap();
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].key(), Left::type_key());
        assert_eq!(candidates[1].key(), Right::type_key());
    }

    #[test]
    fn invoke_rejects_misdeclared_arguments() {
        let binding = (|left: Left| Right(left.0)).into_binding();
        let err = (binding.invoke)(vec![Box::new(Right(9)) as BoxedValue]).unwrap_err();
        assert!(matches!(err, ResolveError::ArgumentMismatch { .. }));
    }
}
