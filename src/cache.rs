use alloc::{
    boxed::Box,
    collections::{btree_map::Entry, BTreeMap},
    sync::Arc,
};
use core::any::TypeId;

use crate::any::RcAny;

#[derive(Clone)]
struct Cached {
    generation: u64,
    instance: RcAny,
}

/// Memoized singleton instances.
///
/// Each instance is tagged with the generation of the registration that produced it.
#[derive(Default, Clone)]
pub(crate) struct Cache {
    map: Option<Box<BTreeMap<TypeId, Cached>>>,
}

impl Cache {
    #[inline]
    #[must_use]
    pub(crate) const fn new() -> Self {
        Self { map: None }
    }

    #[must_use]
    pub(crate) fn get<T: Send + Sync + 'static>(&self, type_id: &TypeId, generation: u64) -> Option<Arc<T>> {
        self.map
            .as_ref()
            .and_then(|map| map.get(type_id))
            .filter(|cached| cached.generation == generation)
            .and_then(|cached| cached.instance.clone().downcast().ok())
    }

    /// Stores `value` unless an instance of the same generation is already cached,
    /// in which case that one is kept. Returns the cached instance.
    ///
    /// An instance of an older generation is replaced. A `value` older than the cached
    /// instance is returned as is and not stored.
    pub(crate) fn get_or_insert<T: Send + Sync + 'static>(&mut self, value: Arc<T>, generation: u64) -> Arc<T> {
        let map = self.map.get_or_insert_with(Box::default);

        match map.entry(TypeId::of::<T>()) {
            Entry::Vacant(entry) => {
                entry.insert(Cached {
                    generation,
                    instance: value.clone(),
                });
                value
            }
            Entry::Occupied(mut entry) => {
                let cached = entry.get_mut();
                if cached.generation == generation {
                    cached.instance.clone().downcast().unwrap_or(value)
                } else if cached.generation < generation {
                    *cached = Cached {
                        generation,
                        instance: value.clone(),
                    };
                    value
                } else {
                    value
                }
            }
        }
    }

    #[inline]
    pub(crate) fn remove(&mut self, type_id: &TypeId) -> Option<RcAny> {
        self.map
            .as_mut()
            .and_then(|map| map.remove(type_id))
            .map(|cached| cached.instance)
    }
}
