#![no_std]

extern crate alloc;

pub(crate) mod any;
pub(crate) mod cache;
pub(crate) mod config;
pub(crate) mod errors;
pub(crate) mod injectable;
pub(crate) mod injector;
pub(crate) mod provider;
pub(crate) mod registry;
pub(crate) mod resolver;

#[cfg(feature = "std")]
pub(crate) mod global;

pub use any::TypeInfo;
pub use config::{Config, FieldPolicy};
pub use errors::{InstantiateErrorKind, ResolveErrorKind};
pub use injectable::{InjectSlot, Injectable};
pub use injector::Injector;
pub use registry::Lifetime;
pub use resolver::Resolver;

#[cfg(feature = "std")]
pub use global::{must_resolve, register_singleton, register_transient, resolve, try_register_singleton, try_register_transient};

#[cfg(feature = "macros")]
pub use tinydi_macros::Injectable;
