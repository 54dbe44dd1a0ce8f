//! HashTable: separate chaining over an entry arena.

use crate::error::{Result, TableError};
use crate::hash::bucket_index;
use crate::policy::{self, INITIAL_BUCKET_COUNT, MIN_BUCKET_COUNT};
use crate::reentrancy::DebugReentrancy;
use core::borrow::Borrow;
use core::fmt::{self, Display};
use slotmap::{DefaultKey, SlotMap};

/// Link to the next entry of a chain, or the head of a bucket.
type Link = Option<DefaultKey>;

struct Entry<K, V> {
    key: K,
    value: V,
    next: Link,
}

/// Walks one bucket's chain head-first.
struct Chain<'a, K, V> {
    entries: &'a SlotMap<DefaultKey, Entry<K, V>>,
    cursor: Link,
}

impl<'a, K, V> Iterator for Chain<'a, K, V> {
    type Item = (DefaultKey, &'a Entry<K, V>);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let k = self.cursor?;
        let e = self.entries.get(k)?;
        self.cursor = e.next;
        Some((k, e))
    }
}

/// Where a key sits: its bucket, its predecessor in the chain (`None` for
/// the head), and its own arena key.
struct Position {
    bucket: usize,
    prev: Link,
    at: DefaultKey,
}

/// Bucket array of chain heads over the entry arena.
///
/// Holds no guard of its own; `HashTable` enters its reentrancy guard
/// before touching it.
struct Chains<K, V> {
    buckets: Vec<Link>,
    entries: SlotMap<DefaultKey, Entry<K, V>>,
}

impl<K, V> Chains<K, V>
where
    K: Eq + Display,
{
    fn new() -> Self {
        Self {
            buckets: vec![None; INITIAL_BUCKET_COUNT],
            entries: SlotMap::with_key(),
        }
    }

    fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn chain(&self, bucket: usize) -> Chain<'_, K, V> {
        Chain {
            entries: &self.entries,
            cursor: self.buckets.get(bucket).copied().flatten(),
        }
    }

    fn find<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Display + Eq,
    {
        let bucket = bucket_index(key, self.bucket_count());
        self.chain(bucket)
            .find(|(_, e)| e.key.borrow() == key)
            .map(|(_, e)| &e.value)
    }

    fn locate<Q>(&self, key: &Q) -> Option<Position>
    where
        K: Borrow<Q>,
        Q: ?Sized + Display + Eq,
    {
        let bucket = bucket_index(key, self.bucket_count());
        let mut prev = None;
        for (at, e) in self.chain(bucket) {
            if e.key.borrow() == key {
                return Some(Position { bucket, prev, at });
            }
            prev = Some(at);
        }
        None
    }

    /// Place a new entry at the tail of its chain. No duplicate or load
    /// check.
    fn append(&mut self, key: K, value: V) {
        let bucket = bucket_index(&key, self.bucket_count());
        let tail = self.chain(bucket).last().map(|(k, _)| k);
        let at = self.entries.insert(Entry {
            key,
            value,
            next: None,
        });
        match tail.and_then(|t| self.entries.get_mut(t)) {
            Some(t) => t.next = Some(at),
            None => self.buckets[bucket] = Some(at),
        }
    }

    fn unlink(&mut self, pos: Position) -> Option<V> {
        let Position { bucket, prev, at } = pos;
        let entry = self.entries.remove(at)?;
        match prev.and_then(|p| self.entries.get_mut(p)) {
            Some(p) => p.next = entry.next,
            None => self.buckets[bucket] = entry.next,
        }
        Some(entry.value)
    }

    /// Rebuild the bucket array with `new_bucket_count` buckets.
    ///
    /// Two passes: detach every entry from the old chains in bucket order,
    /// then append each one to the tail of its new chain. Entries stay in
    /// the arena throughout, so the entry count is unchanged, and the
    /// relink pass never consults the load policy, so it cannot trigger
    /// another resize.
    fn resize(&mut self, new_bucket_count: usize) {
        let new_bucket_count = new_bucket_count.max(MIN_BUCKET_COUNT);
        let old_bucket_count = self.bucket_count();

        let mut order = Vec::with_capacity(self.entries.len());
        for head in core::mem::take(&mut self.buckets) {
            let mut cursor = head;
            while let Some(k) = cursor {
                cursor = self.entries.get_mut(k).and_then(|e| e.next.take());
                order.push(k);
            }
        }
        debug_assert_eq!(order.len(), self.entries.len());

        self.buckets = vec![None; new_bucket_count];
        let mut tails: Vec<Link> = vec![None; new_bucket_count];
        for k in order {
            let Some(e) = self.entries.get(k) else {
                continue;
            };
            let bucket = bucket_index(&e.key, new_bucket_count);
            match tails[bucket].and_then(|t| self.entries.get_mut(t)) {
                Some(t) => t.next = Some(k),
                None => self.buckets[bucket] = Some(k),
            }
            tails[bucket] = Some(k);
        }

        tracing::debug!(
            from = old_bucket_count,
            to = new_bucket_count,
            entries = self.entries.len(),
            "resized bucket array"
        );
    }
}

/// Separate-chaining hashtable keyed by the `Display` text of `K`.
///
/// Every entry lives in one arena; each bucket holds the head of a chain
/// and each entry links to its successor. The bucket a key lands in is
/// [`bucket_index`] of the key against the current bucket count, so every
/// resize relinks all chains.
///
/// `K`'s `Display` impl must not return an error: its text is the key's
/// hash input and the key named in a [`TableError`].
pub struct HashTable<K, V> {
    chains: Chains<K, V>,
    reentrancy: DebugReentrancy,
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Display,
{
    /// Create an empty table with one bucket.
    pub fn new() -> Self {
        Self {
            chains: Chains::new(),
            reentrancy: DebugReentrancy::new(),
        }
    }
}

impl<K, V> Default for HashTable<K, V>
where
    K: Eq + Display,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> HashTable<K, V>
where
    K: Eq + Display,
{
    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.chains.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chains.entries.is_empty()
    }

    /// Current number of buckets; always at least one.
    pub fn bucket_count(&self) -> usize {
        self.chains.bucket_count()
    }

    /// `len() / bucket_count()`.
    pub fn load_factor(&self) -> f64 {
        policy::load_factor(self.len(), self.bucket_count())
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: ?Sized + Display + Eq,
    {
        let _g = self.reentrancy.enter("contains_key");
        self.chains.locate(key).is_some()
    }

    /// Value stored under `key`.
    ///
    /// Never resizes. Fails with [`TableError::KeyNotFound`] when absent.
    pub fn get<Q>(&self, key: &Q) -> Result<&V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Display + Eq,
    {
        let _g = self.reentrancy.enter("get");
        self.chains
            .find(key)
            .ok_or_else(|| TableError::not_found(key))
    }

    /// Insert a new key. Duplicate keys are rejected, never overwritten.
    ///
    /// If the load factor before this insert has reached
    /// [`policy::MAX_LOAD_FACTOR`], the table doubles its bucket count
    /// first and the entry is placed into the grown table. A rejected
    /// insert does not grow the table.
    pub fn insert(&mut self, key: K, value: V) -> Result<()> {
        let _g = self.reentrancy.enter("insert");
        if self.chains.locate(&key).is_some() {
            return Err(TableError::duplicate(&key));
        }
        let count = self.chains.entries.len();
        if let Some(target) = policy::grow_target(count, self.chains.bucket_count()) {
            let _r = self.reentrancy.enter_resize();
            self.chains.resize(target);
        }
        self.chains.append(key, value);
        Ok(())
    }

    /// Remove `key` and return its value.
    ///
    /// A missing key fails with [`TableError::KeyNotFound`] before any
    /// resize is considered. Otherwise, if the load factor before removal is
    /// at or below a quarter of the maximum, the bucket count is halved
    /// (never below one) and the entry is unlinked from the shrunk table.
    pub fn delete<Q>(&mut self, key: &Q) -> Result<V>
    where
        K: Borrow<Q>,
        Q: ?Sized + Display + Eq,
    {
        let _g = self.reentrancy.enter("delete");
        let mut pos = self
            .chains
            .locate(key)
            .ok_or_else(|| TableError::not_found(key))?;
        let count = self.chains.entries.len();
        if let Some(target) = policy::shrink_target(count, self.chains.bucket_count()) {
            let _r = self.reentrancy.enter_resize();
            self.chains.resize(target);
            pos = self
                .chains
                .locate(key)
                .ok_or_else(|| TableError::not_found(key))?;
        }
        self.chains
            .unlink(pos)
            .ok_or_else(|| TableError::not_found(key))
    }

    #[cfg(test)]
    pub(crate) fn chain_keys(&self, bucket: usize) -> Vec<&K> {
        self.chains.chain(bucket).map(|(_, e)| &e.key).collect()
    }

    #[cfg(test)]
    pub(crate) fn reachable(&self) -> usize {
        (0..self.bucket_count())
            .map(|b| self.chains.chain(b).count())
            .sum()
    }
}

impl<K, V> fmt::Debug for HashTable<K, V>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut m = f.debug_map();
        for head in &self.chains.buckets {
            let chain = Chain {
                entries: &self.chains.entries,
                cursor: *head,
            };
            for (_, e) in chain {
                m.entry(&e.key, &e.value);
            }
        }
        m.finish()
    }
}
