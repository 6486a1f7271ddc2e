//! Compile-time type tokens for resolvable types.
//!
//! Everything the hub can resolve implements [`Injectable`]: it names its
//! [`TypeKey`] and, for concrete types, supplies the zero value used when no
//! binding exists. Impls are not written by hand — the [`injectable!`] and
//! [`capability!`](crate::capability) macros generate them, and the primitive
//! types plus `String` ship with impls out of the box.

use crate::type_key::TypeKey;

/// A type the hub can resolve.
///
/// Concrete types report `Some(zero)` — the default value handed out when
/// the type has no binding. Capability handles report `None`: resolving an
/// unbound capability is an error.
pub trait Injectable: Sized + 'static {
    /// Key under which values of this type are stored and looked up.
    fn type_key() -> TypeKey;

    /// Zero value used as the fallback for unbound concrete types.
    fn zero() -> Option<Self> {
        None
    }
}

/// Declares concrete types as resolvable. The type must implement
/// [`Default`]; its default value becomes the unbound-resolution fallback.
///
/// ```ignore
/// #[derive(Default, Clone)]
/// struct RetryBudget(u32);
///
/// wirehub::injectable!(RetryBudget);
/// ```
#[macro_export]
macro_rules! injectable {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::Injectable for $ty {
            fn type_key() -> $crate::TypeKey {
                $crate::TypeKey::concrete::<$ty>()
            }

            fn zero() -> ::core::option::Option<Self> {
                ::core::option::Option::Some(<$ty as ::core::default::Default>::default())
            }
        }
    )+};
}

/// Declares capability traits as resolvable through their `Arc<dyn Trait>`
/// handle. The trait should carry `Send + Sync` supertraits so the handle
/// can live in a shared hub.
///
/// ```ignore
/// trait Logger: Send + Sync {
///     fn error(&self, message: &str);
/// }
///
/// wirehub::capability!(Logger);
/// ```
#[macro_export]
macro_rules! capability {
    ($($trait_:path),+ $(,)?) => {$(
        impl $crate::Injectable for ::std::sync::Arc<dyn $trait_> {
            fn type_key() -> $crate::TypeKey {
                // Key on the trait object itself, not the Arc handle.
                $crate::TypeKey::capability::<dyn $trait_>()
            }
        }
    )+};
}

crate::injectable!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, String,
);
