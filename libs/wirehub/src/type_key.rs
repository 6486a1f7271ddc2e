//! Type descriptors used as registry keys.
//!
//! A [`TypeKey`] identifies a resolvable type by *identity*: two keys are
//! equal iff they denote the same Rust type, regardless of what the type
//! is called. The fully-qualified `type_name` is carried alongside purely
//! for diagnostics and log output.

use std::any::TypeId;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Whether a key denotes an abstract capability (trait object) or a
/// concrete type.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeKind {
    /// An abstract capability type, addressed as `dyn Trait` and carried as
    /// an `Arc<dyn Trait>` handle. Has no zero value; resolution without a
    /// binding is an error.
    Capability,
    /// A plain sized type. Resolution without a binding falls back to the
    /// type's zero value.
    Concrete,
}

/// Stable identity key for a resolvable type.
///
/// Capability keys are derived from the trait object type itself
/// (`dyn Trait`), not from the `Arc` handle that carries instances of it —
/// the handle is unwrapped at key-construction time.
#[derive(Clone, Copy)]
pub struct TypeKey {
    id: TypeId,
    name: &'static str,
    kind: TypeKind,
}

impl TypeKey {
    /// Key for an abstract capability type. `T` is the trait object type,
    /// e.g. `dyn Logger`.
    #[inline]
    pub fn capability<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: TypeKind::Capability,
        }
    }

    /// Key for a concrete type.
    #[inline]
    pub fn concrete<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
            kind: TypeKind::Concrete,
        }
    }

    #[inline]
    pub fn kind(&self) -> TypeKind {
        self.kind
    }

    /// Fully-qualified type name, for diagnostics only.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

// Identity semantics: equality and hashing consider the TypeId only.
impl PartialEq for TypeKey {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeKey {}

impl Hash for TypeKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    trait Marker {}

    #[test]
    fn equality_is_by_identity() {
        assert_eq!(TypeKey::concrete::<u32>(), TypeKey::concrete::<u32>());
        assert_ne!(TypeKey::concrete::<u32>(), TypeKey::concrete::<u64>());
        assert_ne!(
            TypeKey::capability::<dyn Marker>(),
            TypeKey::concrete::<u32>()
        );
    }

    #[test]
    fn debug_prints_the_type_name() {
        let key = TypeKey::capability::<dyn Marker>();
        assert!(format!("{key:?}").contains("Marker"));
    }
}
