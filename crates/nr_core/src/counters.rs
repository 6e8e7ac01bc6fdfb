use crate::error::CounterIndexError;

/// Per-article view counters, index-aligned with the current page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCountStore {
    counts: Vec<u32>,
}

impl ViewCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces every counter with `len` zeroed ones.
    pub fn reset(&mut self, len: usize) {
        self.counts.clear();
        self.counts.resize(len, 0);
    }

    /// Adds one view to the counter at `index` and returns the new count.
    pub fn increment(&mut self, index: usize) -> Result<u32, CounterIndexError> {
        let len = self.counts.len();
        let count = self
            .counts
            .get_mut(index)
            .ok_or(CounterIndexError { index, len })?;
        *count += 1;
        Ok(*count)
    }

    pub fn get(&self, index: usize) -> Option<u32> {
        self.counts.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.counts
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&c| u64::from(c)).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_zeroes_every_counter() {
        let mut store = ViewCountStore::new();
        store.reset(3);
        store.increment(1).unwrap();
        store.reset(6);
        assert_eq!(store.len(), 6);
        assert!(store.as_slice().iter().all(|&c| c == 0));
        store.reset(0);
        assert!(store.is_empty());
    }

    #[test]
    fn test_increment_touches_one_counter() {
        let mut store = ViewCountStore::new();
        store.reset(5);
        assert_eq!(store.increment(3), Ok(1));
        assert_eq!(store.as_slice(), &[0, 0, 0, 1, 0]);
        assert_eq!(store.increment(3), Ok(2));
        assert_eq!(store.get(3), Some(2));
        assert_eq!(store.total(), 2);
    }

    #[test]
    fn test_out_of_bounds_increment_fails() {
        let mut store = ViewCountStore::new();
        store.reset(2);
        assert_eq!(
            store.increment(2),
            Err(CounterIndexError { index: 2, len: 2 })
        );
        assert_eq!(store.as_slice(), &[0, 0]);
    }
}
