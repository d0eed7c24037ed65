use anyhow::{Context, Result, ensure};
use bitvec::prelude::*;
use std::fs;
use std::path::Path;

/// Packs shot records into Stim's .b8 layout.
///
/// Each shot takes `ceil(bits_per_shot / 8)` bytes; classical bit `c` of a
/// record is bit `c % 8` of byte `c / 8`, and unused high bits are zero.
pub fn encode_b8(records: &[u64], bits_per_shot: usize) -> Result<BitVec<u8, Lsb0>> {
    ensure!(
        bits_per_shot <= u64::BITS as usize,
        "shot records hold at most 64 bits, got {bits_per_shot}"
    );
    let stride_bits = bits_per_shot.div_ceil(8) * 8;

    let mut bits = BitVec::<u8, Lsb0>::repeat(false, records.len() * stride_bits);
    for (shot, &record) in records.iter().enumerate() {
        let start = shot * stride_bits;
        for bit in 0..bits_per_shot {
            bits.set(start + bit, (record >> bit) & 1 == 1);
        }
    }
    Ok(bits)
}

/// Unpacks a .b8 buffer back into one record per shot.
pub fn decode_b8(raw_bits: &BitVec<u8, Lsb0>, bits_per_shot: usize) -> Result<Vec<u64>> {
    ensure!(
        bits_per_shot <= u64::BITS as usize,
        "shot records hold at most 64 bits, got {bits_per_shot}"
    );
    Ok(slice_shots(raw_bits, bits_per_shot)
        .into_iter()
        .map(|shot| {
            shot.iter()
                .enumerate()
                .fold(0u64, |record, (bit, &set)| record | (set as u64) << bit)
        })
        .collect())
}

/// Writes shot records as a Stim .b8 file.
pub fn write_b8_file<P: AsRef<Path>>(path: P, records: &[u64], bits_per_shot: usize) -> Result<()> {
    let bits = encode_b8(records, bits_per_shot)?;
    fs::write(path, bits.into_vec()).context("Failed to write .b8 file")
}

/// Reads a .b8 file back into one record per shot.
///
/// # Arguments
///
/// * `path` - File written by `write_b8_file`
/// * `bits_per_shot` - Classical bits per record
///
/// # Returns
///
/// The records in file order, or an error if the file cannot be read or
/// does not hold a whole number of shots.
pub fn load_b8_records<P: AsRef<Path>>(path: P, bits_per_shot: usize) -> Result<Vec<u64>> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("Failed to open .b8 file {}", path.display()))?;

    let bytes_per_shot = bits_per_shot.div_ceil(8);
    ensure!(
        bytes_per_shot > 0 && bytes.len() % bytes_per_shot == 0,
        "{} holds {} bytes, not a whole number of {bytes_per_shot}-byte shots",
        path.display(),
        bytes.len()
    );

    decode_b8(&BitVec::<u8, Lsb0>::from_vec(bytes), bits_per_shot)
}

/// Splits a raw .b8 buffer into per-shot bit vectors, dropping byte padding.
pub fn slice_shots(raw_bits: &BitVec<u8, Lsb0>, bits_per_shot: usize) -> Vec<Vec<bool>> {
    let stride_bits = bits_per_shot.div_ceil(8) * 8;
    if stride_bits == 0 {
        return Vec::new();
    }

    raw_bits
        .chunks_exact(stride_bits)
        .map(|shot| shot[..bits_per_shot].iter().by_vals().collect())
        .collect()
}
