//! I/O utilities for circuit listings and shot-record files.
//!
//! Provides functions for reading text circuit listings into `Circuit`
//! values and for writing and reading sampled shot records in Stim's packed
//! .b8 format. The core crates never touch the filesystem; everything that
//! does lives here.

/// Shot-record encoding and file loading.
///
/// Packs sampled records into .b8 bytes and unpacks them again, handling
/// the per-shot byte padding of the format.
pub mod loader;

/// Parser for text circuit listings.
///
/// Reads the `Display` form of a circuit back into a range-checked
/// `Circuit`, reporting the first malformed line.
pub mod parser;
