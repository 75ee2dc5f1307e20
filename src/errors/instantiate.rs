use alloc::boxed::Box;
use core::convert::Infallible;

use super::ResolveErrorKind;

/// Error returned by a fallible provider.
#[derive(thiserror::Error, Debug)]
pub enum InstantiateErrorKind {
    #[error(transparent)]
    Custom(#[from] anyhow::Error),
    #[error(transparent)]
    Resolve(Box<ResolveErrorKind>),
}

impl From<ResolveErrorKind> for InstantiateErrorKind {
    #[inline]
    fn from(err: ResolveErrorKind) -> Self {
        Self::Resolve(Box::new(err))
    }
}

impl From<Infallible> for InstantiateErrorKind {
    #[inline]
    fn from(err: Infallible) -> Self {
        match err {}
    }
}
