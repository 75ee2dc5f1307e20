use alloc::boxed::Box;
use core::{
    any::TypeId,
    fmt::{self, Display, Formatter},
};

use super::InstantiateErrorKind;
use crate::any::TypeInfo;

#[derive(thiserror::Error, Debug)]
pub enum ResolveErrorKind {
    #[error("No service of type {type_info} could be provided")]
    NoProvider { type_info: TypeInfo },
    #[error("Cyclic dependency detected: {}", PathDisplay(.path))]
    CyclicDependency { path: Box<[TypeInfo]> },
    #[error("Incorrect provider output type. Actual: {actual:?}, expected: {expected}")]
    IncorrectType { expected: TypeInfo, actual: TypeId },
    #[error("Provider of {type_info} failed: {source}")]
    Instantiate {
        type_info: TypeInfo,
        #[source]
        source: InstantiateErrorKind,
    },
    #[error("Field `{field}` of {owner} could not be injected: {source}")]
    Field {
        owner: TypeInfo,
        field: &'static str,
        #[source]
        source: Box<ResolveErrorKind>,
    },
}

impl ResolveErrorKind {
    /// Returns `true` if the error means `type_info` itself has no registration,
    /// as opposed to a failure somewhere below it.
    #[inline]
    #[must_use]
    pub fn is_no_provider_for(&self, type_info: &TypeInfo) -> bool {
        matches!(self, Self::NoProvider { type_info: missing } if missing == type_info)
    }
}

struct PathDisplay<'a>(&'a [TypeInfo]);

impl Display for PathDisplay<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.iter();
        if let Some(first) = iter.next() {
            write!(f, "{}", first.short_name())?;
        }
        for type_info in iter {
            write!(f, " -> {}", type_info.short_name())?;
        }
        Ok(())
    }
}
