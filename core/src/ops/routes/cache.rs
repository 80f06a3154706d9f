//! Bounded least-recently-used cache for walking segments

use std::{collections::HashMap, hash::Hash};

/// Entries are stamped with a use counter; the oldest stamp is evicted once
/// the cache is full. Eviction scans every entry, which is fine at the sizes
/// this is used with.
#[derive(Debug)]
pub struct LruCache<K, V> {
	capacity: usize,
	tick: u64,
	entries: HashMap<K, (V, u64)>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity,
			tick: 0,
			entries: HashMap::with_capacity(capacity),
		}
	}

	pub fn get(&mut self, key: &K) -> Option<V> {
		self.tick += 1;
		let tick = self.tick;
		self.entries.get_mut(key).map(|(value, used)| {
			*used = tick;
			value.clone()
		})
	}

	pub fn put(&mut self, key: K, value: V) {
		if self.capacity == 0 {
			return;
		}

		self.tick += 1;
		if !self.entries.contains_key(&key) && self.entries.len() >= self.capacity {
			self.evict_oldest();
		}
		self.entries.insert(key, (value, self.tick));
	}

	fn evict_oldest(&mut self) {
		let oldest = self
			.entries
			.iter()
			.min_by_key(|(_, (_, used))| *used)
			.map(|(key, _)| key.clone());

		if let Some(key) = oldest {
			self.entries.remove(&key);
		}
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn evicts_least_recently_used() {
		let mut cache = LruCache::new(2);
		cache.put("a", 1);
		cache.put("b", 2);
		assert_eq!(cache.get(&"a"), Some(1));

		cache.put("c", 3);
		assert_eq!(cache.len(), 2);
		assert_eq!(cache.get(&"b"), None);
		assert_eq!(cache.get(&"a"), Some(1));
		assert_eq!(cache.get(&"c"), Some(3));
	}

	#[test]
	fn replacing_a_key_does_not_evict() {
		let mut cache = LruCache::new(2);
		cache.put("a", 1);
		cache.put("b", 2);
		cache.put("a", 10);

		assert_eq!(cache.len(), 2);
		assert_eq!(cache.get(&"a"), Some(10));
		assert_eq!(cache.get(&"b"), Some(2));
	}

	#[test]
	fn zero_capacity_stores_nothing() {
		let mut cache = LruCache::new(0);
		cache.put("a", 1);
		assert!(cache.is_empty());
	}
}
