//! Single-entry memoization for derived layout state.
//!
//! A memo holds the last key and value. Asking again with an equal key
//! returns a clone of the stored value without recomputing; with `Arc`
//! values that clone is the same allocation, which lets the render boundary
//! skip work with a pointer comparison.

/// Cache for one derived value keyed by its inputs.
#[derive(Debug)]
pub struct Memo<K, V> {
    entry: Option<(K, V)>,
    computations: u64,
}

impl<K, V> Default for Memo<K, V> {
    fn default() -> Self {
        Self {
            entry: None,
            computations: 0,
        }
    }
}

impl<K: PartialEq, V: Clone> Memo<K, V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, computing it on a miss.
    pub fn get_or_compute(&mut self, key: K, compute: impl FnOnce(&K) -> V) -> V {
        if let Some((cached_key, value)) = &self.entry {
            if *cached_key == key {
                return value.clone();
            }
        }
        let value = compute(&key);
        self.computations += 1;
        self.entry = Some((key, value.clone()));
        value
    }

    /// Number of times the value has been computed.
    pub fn computations(&self) -> u64 {
        self.computations
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_hit_returns_same_allocation() {
        let mut memo: Memo<u32, Arc<Vec<u32>>> = Memo::new();
        let a = memo.get_or_compute(1, |k| Arc::new(vec![*k]));
        let b = memo.get_or_compute(1, |_| panic!("should not recompute"));
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(memo.computations(), 1);
    }

    #[test]
    fn test_new_key_recomputes() {
        let mut memo: Memo<u32, Arc<u32>> = Memo::new();
        let a = memo.get_or_compute(1, |k| Arc::new(*k));
        let b = memo.get_or_compute(2, |k| Arc::new(*k));
        assert_eq!(*a, 1);
        assert_eq!(*b, 2);
        assert_eq!(memo.computations(), 2);

        // Only the last key is kept
        memo.get_or_compute(1, |k| Arc::new(*k));
        assert_eq!(memo.computations(), 3);
    }
}
