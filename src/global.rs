//! The process-wide default injector and the free functions that fall back to it.
//!
//! Every function takes an `Option<&Injector>`; `None` selects [`Injector::global`].
//! Prefer creating an [`Injector`] and passing it explicitly, the default context is
//! shared by everything in the process.

use alloc::sync::Arc;
use once_cell::sync::Lazy;

use crate::{
    errors::{InstantiateErrorKind, ResolveErrorKind},
    injectable::Injectable,
    injector::Injector,
    resolver::Resolver,
};

static DEFAULT_INJECTOR: Lazy<Injector> = Lazy::new(Injector::new);

impl Injector {
    /// The process-wide default injector, created on first use.
    #[inline]
    #[must_use]
    pub fn global() -> &'static Injector {
        &DEFAULT_INJECTOR
    }
}

#[inline]
fn or_global(injector: Option<&Injector>) -> &Injector {
    injector.unwrap_or_else(|| Injector::global())
}

/// See [`Injector::register_transient`].
#[inline]
pub fn register_transient<T, F>(injector: Option<&Injector>, provider: F)
where
    T: Injectable,
    F: Fn(&Resolver<'_>) -> T + Send + Sync + 'static,
{
    or_global(injector).register_transient(provider);
}

/// See [`Injector::register_singleton`].
#[inline]
pub fn register_singleton<T, F>(injector: Option<&Injector>, provider: F)
where
    T: Injectable,
    F: Fn(&Resolver<'_>) -> T + Send + Sync + 'static,
{
    or_global(injector).register_singleton(provider);
}

/// See [`Injector::try_register_transient`].
#[inline]
pub fn try_register_transient<T, E, F>(injector: Option<&Injector>, provider: F)
where
    T: Injectable,
    E: Into<InstantiateErrorKind>,
    F: Fn(&Resolver<'_>) -> Result<T, E> + Send + Sync + 'static,
{
    or_global(injector).try_register_transient(provider);
}

/// See [`Injector::try_register_singleton`].
#[inline]
pub fn try_register_singleton<T, E, F>(injector: Option<&Injector>, provider: F)
where
    T: Injectable,
    E: Into<InstantiateErrorKind>,
    F: Fn(&Resolver<'_>) -> Result<T, E> + Send + Sync + 'static,
{
    or_global(injector).try_register_singleton(provider);
}

/// See [`Injector::resolve`].
///
/// # Errors
/// See [`Injector::resolve`].
#[inline]
pub fn resolve<T: Injectable>(injector: Option<&Injector>) -> Result<Arc<T>, ResolveErrorKind> {
    or_global(injector).resolve()
}

/// See [`Injector::must_resolve`].
///
/// # Panics
/// See [`Injector::must_resolve`].
#[track_caller]
#[must_use]
pub fn must_resolve<T: Injectable>(injector: Option<&Injector>) -> Arc<T> {
    or_global(injector).must_resolve()
}
