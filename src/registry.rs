use alloc::collections::BTreeMap;
use core::any::TypeId;

use crate::{any::TypeInfo, provider::BoxedProvider};

/// How long an instance produced by a provider lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifetime {
    /// A new instance on every resolution.
    Transient,
    /// One instance per injector, created on first resolution.
    Singleton,
}

#[derive(Clone)]
pub(crate) struct ProviderData {
    pub(crate) type_info: TypeInfo,
    pub(crate) lifetime: Lifetime,
    pub(crate) provider: BoxedProvider,
    /// Assigned by [`Registry::insert`], increases with every registration.
    pub(crate) generation: u64,
}

/// Providers by service type. One entry per type, whatever its lifetime.
#[derive(Default, Clone)]
pub(crate) struct Registry {
    providers: BTreeMap<TypeId, ProviderData>,
    next_generation: u64,
}

impl Registry {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self {
            providers: BTreeMap::new(),
            next_generation: 0,
        }
    }

    /// Returns the replaced registration, if any.
    #[inline]
    pub(crate) fn insert(&mut self, mut data: ProviderData) -> Option<ProviderData> {
        data.generation = self.next_generation;
        self.next_generation += 1;
        self.providers.insert(data.type_info.id, data)
    }

    #[inline]
    #[must_use]
    pub(crate) fn get(&self, type_id: &TypeId) -> Option<ProviderData> {
        self.providers.get(type_id).cloned()
    }

    #[inline]
    #[must_use]
    pub(crate) fn contains(&self, type_id: &TypeId) -> bool {
        self.providers.contains_key(type_id)
    }

    #[inline]
    #[must_use]
    pub(crate) fn lifetime_of(&self, type_id: &TypeId) -> Option<Lifetime> {
        self.providers.get(type_id).map(|data| data.lifetime)
    }

    #[inline]
    #[must_use]
    pub(crate) fn len(&self) -> usize {
        self.providers.len()
    }

    #[inline]
    #[must_use]
    pub(crate) fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
