//! Removed key-range set.

/// Returns true if `key` lies in the half-open interval `[start, end)`.
///
/// `end = None` is treated as +∞; the empty string is the minimum key, so
/// `start = ""` covers everything below `end`.
#[must_use]
pub fn range_contains(start: &str, end: Option<&str>, key: &str) -> bool {
    start <= key && end.map_or(true, |end| key < end)
}

/// True if `[a_start, a_end)` and `[b_start, b_end)` overlap or touch.
fn overlaps_or_touches(
    a_start: &str,
    a_end: Option<&str>,
    b_start: &str,
    b_end: Option<&str>,
) -> bool {
    a_end.map_or(true, |a_end| b_start <= a_end) && b_end.map_or(true, |b_end| a_start <= b_end)
}

/// Larger of two exclusive upper bounds, `None` being +∞.
fn max_end(a: Option<String>, b: Option<String>) -> Option<String> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        _ => None,
    }
}

/// The set of key intervals removed wholesale from an object's omap.
///
/// Intervals are half-open `[start, end)` with `end = None` meaning "to the
/// end of the keyspace". The set is kept sorted by start, and no two stored
/// intervals overlap or touch: inserting an interval merges every stored
/// interval it overlaps or is adjacent to.
///
/// # Example
///
/// ```rust
/// use ecomap_core::journal::RemovedRanges;
///
/// let mut ranges = RemovedRanges::new();
/// ranges.add_range("key_010", Some("key_020"));
/// ranges.add_range("key_020", Some("key_030"));
///
/// assert_eq!(ranges.len(), 1);
/// assert_eq!(ranges.get("key_010"), Some(Some("key_030")));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemovedRanges {
    ranges: Vec<(String, Option<String>)>,
}

impl RemovedRanges {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts `[start, end)`, merging overlapping and adjacent intervals.
    ///
    /// An interval with `end <= start` covers no key and is ignored.
    pub fn add_range(&mut self, start: impl Into<String>, end: Option<impl Into<String>>) {
        let mut start = start.into();
        let mut end = end.map(Into::into);
        if matches!(&end, Some(e) if *e <= start) {
            return;
        }

        let mut merged = Vec::with_capacity(self.ranges.len() + 1);
        for (s, e) in self.ranges.drain(..) {
            if overlaps_or_touches(&s, e.as_deref(), &start, end.as_deref()) {
                if s < start {
                    start = s;
                }
                end = max_end(end, e);
            } else {
                merged.push((s, e));
            }
        }

        let pos = merged.partition_point(|(s, _)| *s < start);
        merged.insert(pos, (start, end));
        self.ranges = merged;
    }

    /// Replaces the set with the single interval covering every key.
    pub fn clear_omap(&mut self) {
        self.ranges.clear();
        self.ranges.push((String::new(), None));
    }

    /// Returns the end of the interval starting exactly at `start`.
    ///
    /// The outer `Option` is `None` when no interval starts there; the inner
    /// one is `None` for an unbounded interval.
    #[must_use]
    pub fn get(&self, start: &str) -> Option<Option<&str>> {
        self.ranges
            .binary_search_by(|(s, _)| s.as_str().cmp(start))
            .ok()
            .map(|i| self.ranges[i].1.as_deref())
    }

    /// Returns true if some interval starts exactly at `start`.
    #[must_use]
    pub fn contains_start(&self, start: &str) -> bool {
        self.get(start).is_some()
    }

    /// Returns true if `key` is covered by any interval.
    #[must_use]
    pub fn covers(&self, key: &str) -> bool {
        // The only candidate is the last interval starting at or before key.
        let pos = self.ranges.partition_point(|(s, _)| s.as_str() <= key);
        pos > 0 && {
            let (s, e) = &self.ranges[pos - 1];
            range_contains(s, e.as_deref(), key)
        }
    }

    /// Iterates intervals in ascending start order.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = (&str, Option<&str>)> + '_ {
        self.ranges.iter().map(|(s, e)| (s.as_str(), e.as_deref()))
    }

    /// Returns the intervals as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[(String, Option<String>)] {
        &self.ranges
    }

    /// Returns the number of intervals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    /// Returns true if no interval is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Removes every interval.
    pub fn clear(&mut self) {
        self.ranges.clear();
    }
}

impl<'a> IntoIterator for &'a RemovedRanges {
    type Item = &'a (String, Option<String>);
    type IntoIter = std::slice::Iter<'a, (String, Option<String>)>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}
