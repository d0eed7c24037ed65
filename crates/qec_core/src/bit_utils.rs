pub struct BitPack;

impl BitPack {
    #[inline(always)]
    pub fn get(word: usize, index: usize) -> bool {
        (word >> index) & 1 == 1
    }

    #[inline(always)]
    pub fn toggle(word: usize, index: usize) -> usize {
        word ^ (1 << index)
    }

    #[inline(always)]
    pub fn set(word: usize, index: usize, val: bool) -> usize {
        if val {
            word | (1 << index)
        } else {
            word & !(1 << index)
        }
    }

    /// Packs the bits of `word` found at `indices` into a contiguous value,
    /// `indices[0]` landing in bit 0.
    #[inline(always)]
    pub fn gather(word: usize, indices: &[usize]) -> usize {
        indices
            .iter()
            .enumerate()
            .fold(0, |acc, (k, &index)| acc | (((word >> index) & 1) << k))
    }
}
