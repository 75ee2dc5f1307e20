use alloc::{boxed::Box, sync::Arc};
use core::{any::Any, convert::Infallible};
use tracing::debug;

use crate::{errors::InstantiateErrorKind, injectable::Injectable, resolver::Resolver};

pub(crate) type BoxedProvider =
    Arc<dyn Fn(&Resolver<'_>) -> Result<Box<dyn Any + Send + Sync>, InstantiateErrorKind> + Send + Sync>;

#[must_use]
pub(crate) fn boxed_provider<T, E, F>(provider: F) -> BoxedProvider
where
    T: Injectable,
    E: Into<InstantiateErrorKind>,
    F: Fn(&Resolver<'_>) -> Result<T, E> + Send + Sync + 'static,
{
    Arc::new(
        move |resolver: &Resolver<'_>| -> Result<Box<dyn Any + Send + Sync>, InstantiateErrorKind> {
            let instance = provider(resolver).map_err(Into::into)?;

            debug!("Provided");

            Ok(Box::new(instance))
        },
    )
}

#[must_use]
pub(crate) fn boxed_infallible_provider<T, F>(provider: F) -> BoxedProvider
where
    T: Injectable,
    F: Fn(&Resolver<'_>) -> T + Send + Sync + 'static,
{
    boxed_provider(move |resolver: &Resolver<'_>| Ok::<_, Infallible>(provider(resolver)))
}
