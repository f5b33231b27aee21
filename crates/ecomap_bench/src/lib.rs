//! Workload generators for the ecomap benchmarks.

use bytes::Bytes;
use ecomap_core::{JournalEntry, OmapUpdate, Version};
use rand::Rng;

/// Formats the `i`th benchmark key.
pub fn key(i: u32) -> String {
    format!("key_{i:06}")
}

/// Generates random value bytes of the given size.
pub fn random_value(size: usize) -> Bytes {
    let mut rng = rand::thread_rng();
    (0..size).map(|_| rng.gen::<u8>()).collect::<Vec<_>>().into()
}

/// Generates `count` entries, each inserting `keys_per_entry` random keys
/// drawn from `0..key_space`.
pub fn insert_entries(
    count: u64,
    keys_per_entry: usize,
    key_space: u32,
    value_size: usize,
) -> Vec<JournalEntry> {
    let mut rng = rand::thread_rng();
    (1..=count)
        .map(|counter| {
            let pairs: Vec<(String, Bytes)> = (0..keys_per_entry)
                .map(|_| (key(rng.gen_range(0..key_space)), random_value(value_size)))
                .collect();
            entry(counter, &OmapUpdate::insert(pairs))
        })
        .collect()
}

/// Generates a mixed workload: mostly inserts, with point removes and
/// range removes over `0..key_space`.
pub fn mixed_entries(count: u64, key_space: u32) -> Vec<JournalEntry> {
    let mut rng = rand::thread_rng();
    (1..=count)
        .map(|counter| {
            let update = match rng.gen_range(0..10) {
                0..=5 => {
                    OmapUpdate::insert((0..4).map(|_| (key(rng.gen_range(0..key_space)), "v")))
                }
                6..=7 => OmapUpdate::remove((0..2).map(|_| key(rng.gen_range(0..key_space)))),
                _ => {
                    let start = rng.gen_range(0..key_space);
                    let len = rng.gen_range(1..=key_space / 16 + 1);
                    OmapUpdate::remove_range(key(start), Some(key(start.saturating_add(len))))
                }
            };
            entry(counter, &update)
        })
        .collect()
}

/// Generates `count` random `[start, end)` ranges over `0..key_space`.
///
/// Each range spans `1..=max_len` keys; a `max_len` of 0 is treated as 1.
///
/// # Panics
///
/// Panics if `key_space` is 0 and `count` is not.
pub fn random_ranges(count: usize, key_space: u32, max_len: u32) -> Vec<(String, String)> {
    let mut rng = rand::thread_rng();
    (0..count)
        .map(|_| {
            let start = rng.gen_range(0..key_space);
            let len = rng.gen_range(1..=max_len.max(1));
            (key(start), key(start.saturating_add(len)))
        })
        .collect()
}

fn entry(counter: u64, update: &OmapUpdate) -> JournalEntry {
    match JournalEntry::new(Version::new(1, counter)).with_update(update) {
        Ok(entry) => entry,
        Err(err) => panic!("benchmark update failed to encode: {err}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_ranges_with_zero_max_len_span_one_key() {
        let ranges = random_ranges(16, 100, 0);
        assert_eq!(ranges.len(), 16);
        for (start, end) in &ranges {
            let start: u32 = start["key_".len()..].parse().unwrap();
            let end: u32 = end["key_".len()..].parse().unwrap();
            assert_eq!(end, start + 1);
        }
    }

    #[test]
    fn random_ranges_stay_half_open() {
        for (start, end) in random_ranges(64, 1_000, 50) {
            assert!(start < end);
        }
    }
}
