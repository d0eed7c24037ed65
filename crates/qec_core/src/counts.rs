//! Measurement outcome sets.
//!
//! A `Counts` maps classical bitstrings to the number of shots that produced
//! them. Bitstrings are written most significant classical bit first, so
//! classical bit 0 is the rightmost character. Counts always sum to the
//! number of shots they were built from.

use crate::bit_utils::BitPack;
use std::collections::BTreeMap;

/// Bitstring histogram for one circuit execution.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Counts {
    width: usize,
    shots: u64,
    map: BTreeMap<String, u64>,
}

/// Renders the low `width` bits of `record`, bit 0 rightmost.
pub fn bitstring(record: u64, width: usize) -> String {
    (0..width)
        .rev()
        .map(|bit| if (record >> bit) & 1 == 1 { '1' } else { '0' })
        .collect()
}

impl Counts {
    /// Builds a histogram from packed shot records.
    pub fn from_records(records: &[u64], width: usize) -> Self {
        let mut map = BTreeMap::new();
        for &record in records {
            *map.entry(bitstring(record, width)).or_insert(0) += 1;
        }
        Self {
            width,
            shots: records.len() as u64,
            map,
        }
    }

    /// Builds a histogram from explicit `(bitstring, count)` pairs.
    ///
    /// Repeated bitstrings accumulate.
    ///
    /// # Panics
    ///
    /// Panics if the bitstrings disagree in width.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, u64)>) -> Self {
        let mut counts = Self::default();
        for (i, (key, count)) in pairs.into_iter().enumerate() {
            if i == 0 {
                counts.width = key.len();
            }
            assert_eq!(key.len(), counts.width, "bitstring widths differ");
            *counts.map.entry(key.to_owned()).or_insert(0) += count;
            counts.shots += count;
        }
        counts
    }

    /// Number of classical bits in every key.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Total number of shots; equals the sum of all counts.
    pub fn shots(&self) -> u64 {
        self.shots
    }

    /// Number of distinct bitstrings observed.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// True when no shot was recorded.
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Shots that produced `bitstring`.
    ///
    /// # Returns
    ///
    /// The count, or 0 for a bitstring that never occurred.
    pub fn get(&self, bitstring: &str) -> u64 {
        self.map.get(bitstring).copied().unwrap_or(0)
    }

    /// Fraction of shots that produced `bitstring`.
    pub fn probability(&self, bitstring: &str) -> f64 {
        if self.shots == 0 {
            0.0
        } else {
            self.get(bitstring) as f64 / self.shots as f64
        }
    }

    /// `(bitstring, count)` pairs in lexicographic bitstring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.map.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Outcomes ordered by descending count, ties broken by bitstring.
    pub fn sorted_by_count(&self) -> Vec<(&str, u64)> {
        let mut entries: Vec<(&str, u64)> = self.iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        entries
    }

    pub fn most_frequent(&self) -> Option<(&str, u64)> {
        self.sorted_by_count().into_iter().next()
    }

    /// Histogram restricted to the listed classical bits.
    ///
    /// `clbits[0]` becomes bit 0 (the rightmost character) of the marginal.
    pub fn marginal(&self, clbits: &[usize]) -> Counts {
        let mut map = BTreeMap::new();
        for (key, &count) in &self.map {
            let record = self.parse(key);
            let packed = BitPack::gather(record, clbits) as u64;
            *map.entry(bitstring(packed, clbits.len())).or_insert(0) += count;
        }
        Counts {
            width: clbits.len(),
            shots: self.shots,
            map,
        }
    }

    fn parse(&self, key: &str) -> usize {
        key.bytes()
            .rev()
            .enumerate()
            .fold(0, |acc, (bit, c)| BitPack::set(acc, bit, c == b'1'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_render_lsb_rightmost() {
        assert_eq!(bitstring(0b1100, 8), "00001100");
        assert_eq!(bitstring(1, 1), "1");
        assert_eq!(bitstring(0, 0), "");
    }

    #[test]
    fn counts_sum_to_shots() {
        let counts = Counts::from_records(&[0, 1, 1, 3, 3, 3], 2);
        assert_eq!(counts.shots(), 6);
        assert_eq!(counts.iter().map(|(_, c)| c).sum::<u64>(), 6);
        assert_eq!(counts.get("11"), 3);
        assert_eq!(counts.most_frequent(), Some(("11", 3)));
        assert!((counts.probability("01") - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn marginal_reorders_by_requested_bits() {
        let counts = Counts::from_pairs([("110", 5), ("011", 2), ("100", 1)]);
        let high = counts.marginal(&[2]);
        assert_eq!(high.get("1"), 6);
        assert_eq!(high.get("0"), 2);

        let swapped = counts.marginal(&[2, 0]);
        assert_eq!(swapped.get("01"), 6);
        assert_eq!(swapped.get("10"), 2);
        assert_eq!(swapped.shots(), 8);
    }

    #[test]
    fn sorted_by_count_breaks_ties_by_key() {
        let counts = Counts::from_pairs([("10", 4), ("01", 4), ("11", 9)]);
        assert_eq!(
            counts.sorted_by_count(),
            vec![("11", 9), ("01", 4), ("10", 4)]
        );
    }
}
