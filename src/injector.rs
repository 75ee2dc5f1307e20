use alloc::sync::Arc;
use core::any::TypeId;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::{
    any::TypeInfo,
    cache::Cache,
    config::Config,
    errors::{InstantiateErrorKind, ResolveErrorKind},
    injectable::Injectable,
    provider::{boxed_infallible_provider, boxed_provider, BoxedProvider},
    registry::{Lifetime, ProviderData, Registry},
    resolver::{self, Resolver},
};

/// An isolated injection context: providers by service type plus the memoized singletons.
///
/// Registration and resolution take `&self`, so an injector can be shared between threads.
/// Providers run without any lock held and may resolve other services through the [`Resolver`] they get.
pub struct Injector {
    registry: RwLock<Registry>,
    cache: Mutex<Cache>,
    config: Config,
}

impl Default for Injector {
    fn default() -> Self {
        Self::new()
    }
}

impl Injector {
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    #[inline]
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self {
            registry: RwLock::new(Registry::new()),
            cache: Mutex::new(Cache::new()),
            config,
        }
    }

    #[inline]
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Registers `T` as transient: every resolution calls `provider` again.
    ///
    /// Replaces any previous registration of `T`, transient or singleton.
    #[inline]
    pub fn register_transient<T, F>(&self, provider: F)
    where
        T: Injectable,
        F: Fn(&Resolver<'_>) -> T + Send + Sync + 'static,
    {
        self.register::<T>(Lifetime::Transient, boxed_infallible_provider(provider));
    }

    /// Registers `T` as singleton: `provider` is called on first resolution only,
    /// and the populated instance is shared afterwards.
    ///
    /// Replaces any previous registration of `T` and drops an already memoized instance.
    #[inline]
    pub fn register_singleton<T, F>(&self, provider: F)
    where
        T: Injectable,
        F: Fn(&Resolver<'_>) -> T + Send + Sync + 'static,
    {
        self.register::<T>(Lifetime::Singleton, boxed_infallible_provider(provider));
    }

    /// Like [`Self::register_transient`], for providers that can fail.
    #[inline]
    pub fn try_register_transient<T, E, F>(&self, provider: F)
    where
        T: Injectable,
        E: Into<InstantiateErrorKind>,
        F: Fn(&Resolver<'_>) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register::<T>(Lifetime::Transient, boxed_provider(provider));
    }

    /// Like [`Self::register_singleton`], for providers that can fail.
    /// A failed call isn't memoized, the next resolution calls the provider again.
    #[inline]
    pub fn try_register_singleton<T, E, F>(&self, provider: F)
    where
        T: Injectable,
        E: Into<InstantiateErrorKind>,
        F: Fn(&Resolver<'_>) -> Result<T, E> + Send + Sync + 'static,
    {
        self.register::<T>(Lifetime::Singleton, boxed_provider(provider));
    }

    /// Produces a fully populated instance of `T`.
    ///
    /// # Errors
    /// - [`ResolveErrorKind::NoProvider`] if `T` isn't registered
    /// - [`ResolveErrorKind::CyclicDependency`] if resolving `T` needs `T` again
    /// - [`ResolveErrorKind::Instantiate`] if a provider on the way fails
    /// - [`ResolveErrorKind::Field`] if a field can't be injected, see [`crate::FieldPolicy`]
    #[inline]
    pub fn resolve<T: Injectable>(&self) -> Result<Arc<T>, ResolveErrorKind> {
        resolver::resolve(self, None)
    }

    /// Like [`Self::resolve`], but a missing registration is treated as a programming error.
    ///
    /// # Panics
    /// Panics with `No service of type <T> could be provided` if `T` isn't registered,
    /// and with the error text on any other resolution failure.
    #[track_caller]
    #[must_use]
    pub fn must_resolve<T: Injectable>(&self) -> Arc<T> {
        match self.resolve::<T>() {
            Ok(instance) => instance,
            Err(err) => panic!("{err}"),
        }
    }

    #[inline]
    #[must_use]
    pub fn contains<T: 'static>(&self) -> bool {
        self.registry.read().contains(&TypeId::of::<T>())
    }

    #[inline]
    #[must_use]
    pub fn lifetime_of<T: 'static>(&self) -> Option<Lifetime> {
        self.registry.read().lifetime_of(&TypeId::of::<T>())
    }

    /// Number of registered service types.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.registry.read().len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registry.read().is_empty()
    }
}

impl Injector {
    fn register<T: 'static>(&self, lifetime: Lifetime, provider: BoxedProvider) {
        let type_info = TypeInfo::of::<T>();

        let replaced = self.registry.write().insert(ProviderData {
            type_info,
            lifetime,
            provider,
            generation: 0,
        });
        if replaced.is_some() {
            self.cache.lock().remove(&type_info.id);
            debug!(dependency = type_info.name, ?lifetime, "Registration replaced");
        } else {
            debug!(dependency = type_info.name, ?lifetime, "Registered");
        }
    }

    #[inline]
    #[must_use]
    pub(crate) fn provider_data(&self, type_id: &TypeId) -> Option<ProviderData> {
        self.registry.read().get(type_id)
    }

    #[inline]
    #[must_use]
    pub(crate) fn cached<T: Send + Sync + 'static>(&self, generation: u64) -> Option<Arc<T>> {
        self.cache.lock().get(&TypeId::of::<T>(), generation)
    }

    /// Memoizes `instance` as produced by the registration of `generation`.
    /// If `T` was re-registered in the meantime, `instance` is returned without being memoized.
    #[inline]
    pub(crate) fn cache<T: Send + Sync + 'static>(&self, instance: Arc<T>, generation: u64) -> Arc<T> {
        self.cache.lock().get_or_insert(instance, generation)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::Injector;
    use crate::{
        provider::boxed_infallible_provider, registry::ProviderData, InstantiateErrorKind, Lifetime, ResolveErrorKind,
        Resolver, TypeInfo,
    };

    use alloc::{
        format,
        string::{String, ToString as _},
        sync::Arc,
        vec::Vec,
    };
    use core::{
        any::TypeId,
        sync::atomic::{AtomicU8, Ordering},
    };
    use std::thread;
    use tracing_test::traced_test;

    #[derive(Default)]
    struct Hello {
        world: Option<Arc<World>>,
    }

    impl crate::Injectable for Hello {
        fn inject_fields(&mut self, resolver: &Resolver<'_>) -> Result<(), ResolveErrorKind> {
            resolver.inject_field(&mut self.world, "world")
        }
    }

    struct World(&'static str);

    impl crate::Injectable for World {}

    #[test]
    #[traced_test]
    fn test_transient_resolve() {
        let calls = Arc::new(AtomicU8::new(0));

        let injector = Injector::new();
        injector.register_transient({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                World("World")
            }
        });

        let world_1 = injector.resolve::<World>().unwrap();
        let world_2 = injector.resolve::<World>().unwrap();

        assert!(!Arc::ptr_eq(&world_1, &world_2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    #[traced_test]
    fn test_singleton_resolve() {
        let calls = Arc::new(AtomicU8::new(0));

        let injector = Injector::new();
        injector.register_singleton({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                World("World")
            }
        });

        let world_1 = injector.resolve::<World>().unwrap();
        let world_2 = injector.resolve::<World>().unwrap();

        assert!(Arc::ptr_eq(&world_1, &world_2));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(logs_contain("Found in cache"));
    }

    #[test]
    #[traced_test]
    fn test_singleton_provider_not_called_on_registration() {
        let calls = Arc::new(AtomicU8::new(0));

        let injector = Injector::new();
        injector.register_singleton({
            let calls = calls.clone();
            move |_| {
                calls.fetch_add(1, Ordering::SeqCst);
                World("World")
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(injector.lifetime_of::<World>(), Some(Lifetime::Singleton));
    }

    #[test]
    #[traced_test]
    fn test_singleton_field_shared_by_transients() {
        let injector = Injector::new();
        injector.register_transient(|_| Hello::default());
        injector.register_singleton(|_| World("World"));

        let hello_1 = injector.resolve::<Hello>().unwrap();
        let hello_2 = injector.resolve::<Hello>().unwrap();
        let world = injector.resolve::<World>().unwrap();

        assert!(!Arc::ptr_eq(&hello_1, &hello_2));
        assert!(Arc::ptr_eq(hello_1.world.as_ref().unwrap(), hello_2.world.as_ref().unwrap()));
        assert!(Arc::ptr_eq(hello_1.world.as_ref().unwrap(), &world));
    }

    #[test]
    #[traced_test]
    fn test_last_registration_wins() {
        let injector = Injector::new();
        injector.register_singleton(|_| World("first"));
        let first = injector.resolve::<World>().unwrap();

        injector.register_transient(|_| World("second"));
        let second_1 = injector.resolve::<World>().unwrap();
        let second_2 = injector.resolve::<World>().unwrap();

        assert_eq!(first.0, "first");
        assert_eq!(second_1.0, "second");
        assert!(!Arc::ptr_eq(&second_1, &second_2));
        assert_eq!(injector.lifetime_of::<World>(), Some(Lifetime::Transient));
        assert_eq!(injector.len(), 1);
        assert!(logs_contain("Registration replaced"));
    }

    #[test]
    #[traced_test]
    fn test_reregistered_singleton_drops_memo() {
        let injector = Injector::new();
        injector.register_singleton(|_| World("first"));
        let first = injector.resolve::<World>().unwrap();

        injector.register_singleton(|_| World("second"));
        let second = injector.resolve::<World>().unwrap();

        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(second.0, "second");
    }

    #[test]
    #[traced_test]
    fn test_singleton_reregistered_while_resolving() {
        let injector = Injector::new();
        injector.register_singleton(|resolver| {
            resolver.injector().register_singleton(|_| World("second"));
            World("first")
        });

        let first = injector.resolve::<World>().unwrap();
        let second_1 = injector.resolve::<World>().unwrap();
        let second_2 = injector.resolve::<World>().unwrap();

        assert_eq!(first.0, "first");
        assert_eq!(second_1.0, "second");
        assert!(Arc::ptr_eq(&second_1, &second_2));
    }

    #[test]
    #[traced_test]
    fn test_mismatched_provider_output() {
        let injector = Injector::new();
        injector.registry.write().insert(ProviderData {
            type_info: TypeInfo::of::<World>(),
            lifetime: Lifetime::Transient,
            provider: boxed_infallible_provider(|_: &Resolver<'_>| Hello::default()),
            generation: 0,
        });

        let err = injector.resolve::<World>().err().unwrap();

        let ResolveErrorKind::IncorrectType { expected, actual } = err else {
            panic!("expected incorrect type error");
        };
        assert_eq!(expected, TypeInfo::of::<World>());
        assert_eq!(actual, TypeId::of::<Hello>());
    }

    #[test]
    #[traced_test]
    fn test_not_registered() {
        let injector = Injector::new();
        assert!(injector.is_empty());
        assert!(!injector.contains::<World>());

        let err = injector.resolve::<World>().err().unwrap();

        assert!(err.is_no_provider_for(&TypeInfo::of::<World>()));
        assert!(logs_contain("could be provided"));
    }

    #[test]
    #[should_panic(expected = "No service of type tinydi::injector::tests::World could be provided")]
    fn test_must_resolve_panics_on_missing() {
        let injector = Injector::new();
        let _ = injector.must_resolve::<World>();
    }

    #[test]
    #[traced_test]
    fn test_failed_singleton_not_memoized() {
        let calls = Arc::new(AtomicU8::new(0));

        let injector = Injector::new();
        injector.try_register_singleton({
            let calls = calls.clone();
            move |_| {
                if calls.fetch_add(1, Ordering::SeqCst) == 0 {
                    return Err(InstantiateErrorKind::Custom(anyhow::anyhow!("not ready")));
                }
                Ok(World("World"))
            }
        });

        let err = injector.resolve::<World>().err().unwrap();
        assert!(matches!(err, ResolveErrorKind::Instantiate { .. }));
        assert!(err.to_string().ends_with("failed: not ready"));

        let world_1 = injector.resolve::<World>().unwrap();
        let world_2 = injector.resolve::<World>().unwrap();
        assert!(Arc::ptr_eq(&world_1, &world_2));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_concurrent_singleton_resolve() {
        let injector = Arc::new(Injector::new());
        injector.register_singleton(|_| World("World"));

        let handles = (0..8)
            .map(|_| {
                let injector = injector.clone();
                thread::spawn(move || injector.resolve::<World>().unwrap())
            })
            .collect::<Vec<_>>();
        let worlds = handles.into_iter().map(|handle| handle.join().unwrap()).collect::<Vec<_>>();

        for world in &worlds {
            assert!(Arc::ptr_eq(world, &worlds[0]));
        }
    }
}
