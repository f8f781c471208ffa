use dashmap::DashMap;
use std::borrow::Borrow;
use std::hash::Hash;

/// Extension helpers for `DashMap` that avoid holding shard locks across `.await`.
///
/// `DashMap::get()` and `DashMap::iter()` return guard types that hold a shard lock.
/// Awaiting while those guards are alive can deadlock, and message delivery
/// always awaits. These helpers clone values out so the guard drops immediately.
pub trait DashMapExt<K, V> {
    /// Clone the value for `key` (dropping the DashMap guard immediately).
    fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone;

    /// Clone every value (dropping guards immediately).
    fn values_cloned(&self) -> Vec<V>
    where
        V: Clone;

    /// Clone every key (dropping guards immediately).
    fn keys_cloned(&self) -> Vec<K>
    where
        K: Clone;
}

impl<K, V> DashMapExt<K, V> for DashMap<K, V>
where
    K: Eq + Hash,
{
    fn get_cloned<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        self.get(key).map(|r| r.value().clone())
    }

    fn values_cloned(&self) -> Vec<V>
    where
        V: Clone,
    {
        self.iter().map(|e| e.value().clone()).collect()
    }

    fn keys_cloned(&self) -> Vec<K>
    where
        K: Clone,
    {
        self.iter().map(|e| e.key().clone()).collect()
    }
}
