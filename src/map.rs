use core::borrow::Borrow;
use core::hash::Hash;

use hashbrown::HashMap;

/// Two-level hash map keyed by `(K1, K2)`.
///
/// Lookups borrow both keys independently, so a `HashMap2<String, String, V>`
/// can be queried with `(&str, &str)` without allocating a tuple key.
#[derive(Clone, Debug)]
pub struct HashMap2<K1, K2, V> {
    map: HashMap<K1, HashMap<K2, V>>,
}

impl<K1, K2, V> HashMap2<K1, K2, V>
where
    K1: Hash + Eq,
    K2: Hash + Eq,
{
    pub fn new() -> Self {
        Self {
            map: HashMap::new(),
        }
    }

    /// Returns a mutable reference to the value at `(key1, key2)`, inserting
    /// `f()` first if the pair is absent. Keys are only cloned on insertion.
    pub fn get_or_insert_with<Q1: ?Sized, Q2: ?Sized, F>(
        &mut self,
        key1: &Q1,
        key2: &Q2,
        f: F,
    ) -> &mut V
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Hash + Eq + ToOwned<Owned = K1>,
        Q2: Hash + Eq + ToOwned<Owned = K2>,
        F: FnOnce() -> V,
    {
        let (_, inner) = self
            .map
            .raw_entry_mut()
            .from_key(key1)
            .or_insert_with(|| (key1.to_owned(), HashMap::new()));
        let (_, value) = inner
            .raw_entry_mut()
            .from_key(key2)
            .or_insert_with(|| (key2.to_owned(), f()));
        value
    }

    pub fn get<Q1: ?Sized, Q2: ?Sized>(&self, key1: &Q1, key2: &Q2) -> Option<&V>
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Hash + Eq,
        Q2: Hash + Eq,
    {
        self.map.get(key1).and_then(|map| map.get(key2))
    }

    pub fn contains_key<Q1: ?Sized, Q2: ?Sized>(&self, key1: &Q1, key2: &Q2) -> bool
    where
        K1: Borrow<Q1>,
        K2: Borrow<Q2>,
        Q1: Hash + Eq,
        Q2: Hash + Eq,
    {
        self.map
            .get(key1)
            .map_or(false, |map| map.contains_key(key2))
    }

    /// Number of `(K1, K2)` entries.
    pub fn len(&self) -> usize {
        self.map.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.map.values().all(HashMap::is_empty)
    }

    pub fn for_each<'a, F>(&'a self, mut f: F)
    where
        F: FnMut((&'a K1, &'a K2, &'a V)),
    {
        for (k1, map) in &self.map {
            for (k2, v) in map {
                f((k1, k2, v));
            }
        }
    }

    /// Consumes `other`, combining values present in both maps with `merge`.
    pub fn merge_with<F>(&mut self, other: Self, mut merge: F)
    where
        F: FnMut(&mut V, V),
    {
        for (k1, inner) in other.map {
            let target = self.map.entry(k1).or_insert_with(HashMap::new);
            for (k2, v) in inner {
                match target.get_mut(&k2) {
                    Some(existing) => merge(existing, v),
                    None => {
                        target.insert(k2, v);
                    }
                }
            }
        }
    }
}

impl<K1, K2, V> Default for HashMap2<K1, K2, V>
where
    K1: Hash + Eq,
    K2: Hash + Eq,
{
    fn default() -> Self {
        Self::new()
    }
}
