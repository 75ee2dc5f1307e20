use alloc::{boxed::Box, sync::Arc, vec::Vec};
use core::iter;
use tracing::{debug, error, info_span, warn};

use crate::{
    any::TypeInfo,
    config::FieldPolicy,
    errors::ResolveErrorKind,
    injectable::{InjectSlot, Injectable},
    injector::Injector,
    registry::{Lifetime, ProviderData},
};

/// The requesting context handed to providers and to [`Injectable::inject_fields`].
///
/// Each resolver stands for one service under construction and links to the resolver
/// that requested it, so nested resolutions share the path used for cycle detection.
#[derive(Clone, Copy)]
pub struct Resolver<'a> {
    injector: &'a Injector,
    service: TypeInfo,
    parent: Option<&'a Resolver<'a>>,
}

impl<'a> Resolver<'a> {
    #[cfg(test)]
    #[must_use]
    pub(crate) const fn root(injector: &'a Injector, service: TypeInfo) -> Self {
        Self {
            injector,
            service,
            parent: None,
        }
    }

    /// Injector the resolution runs against.
    #[inline]
    #[must_use]
    pub const fn injector(&self) -> &'a Injector {
        self.injector
    }

    /// Service currently being constructed.
    #[inline]
    #[must_use]
    pub const fn service(&self) -> TypeInfo {
        self.service
    }

    /// Services under construction, outermost first.
    #[must_use]
    pub fn path(&self) -> Vec<TypeInfo> {
        let mut path = iter::successors(Some(self), |resolver| resolver.parent)
            .map(|resolver| resolver.service)
            .collect::<Vec<_>>();
        path.reverse();
        path
    }

    #[inline]
    #[must_use]
    fn is_constructing(&self, type_info: &TypeInfo) -> bool {
        iter::successors(Some(self), |resolver| resolver.parent).any(|resolver| resolver.service == *type_info)
    }

    /// Resolves a dependency on behalf of the current service.
    ///
    /// # Errors
    /// See [`Injector::resolve`]. Additionally returns [`ResolveErrorKind::CyclicDependency`]
    /// if `T` is already under construction on this path.
    #[inline]
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        resolve(self.injector, Some(self))
    }

    /// Resolves the service type of `slot` and stores it there.
    ///
    /// If that type isn't registered, the slot is left untouched under [`FieldPolicy::Lenient`]
    /// and an error is returned under [`FieldPolicy::Strict`].
    ///
    /// # Errors
    /// Returns [`ResolveErrorKind::Field`] wrapping the cause.
    pub fn inject_field<S: InjectSlot>(&self, slot: &mut S, field: &'static str) -> Result<(), ResolveErrorKind> {
        let type_info = TypeInfo::of::<S::Service>();

        match self.resolve::<S::Service>() {
            Ok(service) => {
                slot.fill(service);
                Ok(())
            }
            Err(err) if err.is_no_provider_for(&type_info) && self.injector.config().field_policy == FieldPolicy::Lenient => {
                debug!(field, "Field dependency not registered, left unset");
                Ok(())
            }
            Err(err) => {
                let err = ResolveErrorKind::Field {
                    owner: self.service,
                    field,
                    source: Box::new(err),
                };
                error!("{}", err);
                Err(err)
            }
        }
    }
}

pub(crate) fn resolve<'a, T: Injectable>(injector: &'a Injector, parent: Option<&'a Resolver<'a>>) -> Result<Arc<T>, ResolveErrorKind> {
    let type_info = TypeInfo::of::<T>();

    let span = info_span!("resolve", dependency = type_info.name);
    let _guard = span.enter();

    if let Some(parent) = parent {
        if parent.is_constructing(&type_info) {
            let mut path = parent.path();
            path.push(type_info);

            let err = ResolveErrorKind::CyclicDependency {
                path: path.into_boxed_slice(),
            };
            error!("{}", err);
            return Err(err);
        }
    }

    let Some(ProviderData {
        lifetime,
        provider,
        generation,
        ..
    }) = injector.provider_data(&type_info.id)
    else {
        let err = ResolveErrorKind::NoProvider { type_info };
        // Nested misses are reported by whoever asked for them
        if parent.is_none() {
            warn!("{}", err);
        } else {
            debug!("{}", err);
        }
        return Err(err);
    };

    if lifetime == Lifetime::Singleton {
        if let Some(instance) = injector.cached::<T>(generation) {
            debug!("Found in cache");
            return Ok(instance);
        }
        debug!("Not found in cache");
    }

    let resolver = Resolver {
        injector,
        service: type_info,
        parent,
    };

    let mut instance = match provider(&resolver) {
        Ok(instance) => match instance.downcast::<T>() {
            Ok(instance) => *instance,
            // Only reachable when the registry is written directly, `Injector::register` boxes providers per `T`
            Err(incorrect_type) => {
                let err = ResolveErrorKind::IncorrectType {
                    expected: type_info,
                    actual: (*incorrect_type).type_id(),
                };
                error!("{}", err);
                return Err(err);
            }
        },
        Err(source) => {
            let err = ResolveErrorKind::Instantiate { type_info, source };
            error!("{}", err);
            return Err(err);
        }
    };

    instance.inject_fields(&resolver)?;
    let instance = Arc::new(instance);

    match lifetime {
        Lifetime::Singleton => {
            let instance = injector.cache(instance, generation);
            debug!("Cached");
            Ok(instance)
        }
        Lifetime::Transient => Ok(instance),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Resolver;
    use crate::{any::TypeInfo, Config, Injectable, Injector, ResolveErrorKind};

    use alloc::{
        format,
        string::{String, ToString as _},
        sync::Arc,
    };
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Hello {
        world: Option<Arc<World>>,
    }

    impl Injectable for Hello {
        fn inject_fields(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveErrorKind> {
            resolver.inject_field(&mut self.world, "world")
        }
    }

    struct World;

    impl Injectable for World {}

    struct Ping(#[allow(dead_code)] Arc<Pong>);
    struct Pong(#[allow(dead_code)] Arc<Ping>);

    impl Injectable for Ping {}
    impl Injectable for Pong {}

    #[test]
    fn test_path() {
        let injector = Injector::new();
        let root = Resolver::root(&injector, TypeInfo::of::<Hello>());
        let child = Resolver {
            injector: &injector,
            service: TypeInfo::of::<World>(),
            parent: Some(&root),
        };

        assert_eq!(child.path(), [TypeInfo::of::<Hello>(), TypeInfo::of::<World>()]);
        assert!(child.is_constructing(&TypeInfo::of::<Hello>()));
        assert!(!root.is_constructing(&TypeInfo::of::<World>()));
    }

    #[test]
    #[traced_test]
    fn test_lenient_field_left_unset() {
        let injector = Injector::new();
        injector.register_transient(|_| Hello::default());

        let hello = injector.resolve::<Hello>().unwrap();

        assert!(hello.world.is_none());
        assert!(logs_contain("Field dependency not registered, left unset"));
        logs_assert(|lines: &[&str]| {
            if lines.iter().any(|line| line.contains("WARN")) {
                return Err(String::from("Lenient field skip logged a warning"));
            }
            Ok(())
        });
    }

    #[test]
    #[traced_test]
    fn test_strict_field_fails() {
        let injector = Injector::with_config(Config::strict());
        injector.register_transient(|_| Hello::default());

        let err = injector.resolve::<Hello>().err().unwrap();

        let ResolveErrorKind::Field { owner, field, source } = err else {
            panic!("expected field error");
        };
        assert_eq!(owner, TypeInfo::of::<Hello>());
        assert_eq!(field, "world");
        assert!(source.is_no_provider_for(&TypeInfo::of::<World>()));
    }

    #[test]
    #[traced_test]
    fn test_provider_cycle_detected() {
        let injector = Injector::new();
        injector.try_register_transient(|resolver| resolver.resolve::<Pong>().map(Ping));
        injector.try_register_transient(|resolver| resolver.resolve::<Ping>().map(Pong));

        let err = injector.resolve::<Ping>().err().unwrap();

        assert!(err.to_string().contains("Cyclic dependency detected: Ping -> Pong -> Ping"));
    }

    #[test]
    #[traced_test]
    fn test_provider_sees_requesting_service() {
        let injector = Injector::new();
        injector.register_transient(|_| World);
        injector.register_transient(|resolver| {
            assert_eq!(resolver.service(), TypeInfo::of::<Hello>());
            assert_eq!(resolver.path(), [TypeInfo::of::<Hello>()]);
            Hello {
                world: resolver.resolve::<World>().ok(),
            }
        });

        let hello = injector.resolve::<Hello>().unwrap();

        assert!(hello.world.is_some());
    }
}
