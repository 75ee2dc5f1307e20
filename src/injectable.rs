use alloc::sync::Arc;

use crate::{errors::ResolveErrorKind, resolver::Resolver};

/// A service the injector can hand out.
///
/// After a provider returns an instance, [`Injectable::inject_fields`] is called on it
/// with the resolver that produced it, before the instance is shared.
/// The default implementation injects nothing, so plain value services can use an empty impl.
///
/// Usually derived:
///
/// ```ignore
/// #[derive(Default, Injectable)]
/// pub struct HelloService {
///     #[di(inject)]
///     pub world: Option<Arc<WorldService>>,
///     pub greetings: Vec<String>,
/// }
/// ```
///
/// Only `pub` fields marked with `#[di(inject)]` (or `#[di = "inject"]`) are injected, in declaration order.
/// Every other field keeps the value the provider gave it.
pub trait Injectable: Send + Sync + 'static {
    /// # Errors
    /// Returns the first field error, see [`Resolver::inject_field`].
    #[inline]
    #[allow(unused_variables)]
    fn inject_fields(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveErrorKind> {
        Ok(())
    }
}

/// A field type that can receive a resolved service.
///
/// Its "zero value" is whatever the provider put there, `None` for [`Option`].
pub trait InjectSlot {
    type Service: Injectable;

    fn fill(&mut self, service: Arc<Self::Service>);
}

impl<T: Injectable> InjectSlot for Option<Arc<T>> {
    type Service = T;

    #[inline]
    fn fill(&mut self, service: Arc<T>) {
        *self = Some(service);
    }
}
