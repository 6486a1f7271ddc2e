//! Type-keyed dependency wiring.
//!
//! A [`WireHub`] maps type descriptors to *bindings* — fixed instances or
//! typed factory functions — and resolves a requested type by walking its
//! dependency tree bottom-up: factory arguments are themselves resolved
//! through the hub before the factory runs. Struct fields marked
//! `#[autowired]` populate themselves via [`AutoWired`].
//!
//! ```ignore
//! use std::sync::Arc;
//! use wirehub::WireHub;
//!
//! trait Logger: Send + Sync {
//!     fn error(&self, message: &str);
//! }
//! wirehub::capability!(Logger);
//!
//! let hub = WireHub::new();
//! hub.wire_factory(|| -> Arc<dyn Logger> { Arc::new(ConsoleLogger) })?;
//! let logger = hub.construct::<Arc<dyn Logger>>().unwrap();
//! ```

pub mod binding;
pub mod errors;
pub mod hub;
pub mod inject;
pub mod injectable;
pub mod type_key;

pub use binding::{ArgSpec, Candidate, FactoryBinding, FactoryOutputs, IntoFactory};
pub use errors::{AutoWireError, FieldFailure, ResolveError, WireError};
pub use hub::WireHub;
pub use inject::AutoWired;
pub use injectable::Injectable;
pub use type_key::{TypeKey, TypeKind};

/// Derive macro generating [`AutoWired`] impls.
pub use wirehub_macros::AutoWired;
