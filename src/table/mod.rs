pub mod double_key;
pub mod infinite;
pub mod linear_probe;

use crate::error::{Error, Result};

/// Prime capacity schedule shared by the open-addressing tables.
pub(crate) const PROBE_TABLE_SIZES: [usize; 19] = [
    5, 13, 29, 53, 97, 193, 389, 769, 1543, 3079, 6151, 12289, 24593, 49157, 98317, 196613,
    393241, 786433, 1572869,
];

/// Multiplier step for the polynomial rolling hash.
pub(crate) const HASH_BASE: u64 = 31;

/// Polynomial rolling hash over the key bytes, reduced modulo `table_size`.
///
/// The multiplier is re-randomized per position so that rotations of a key
/// do not collide systematically.
pub(crate) fn poly_hash(key: &str, table_size: usize) -> usize {
    let size = table_size as u64;
    let mut value: u64 = 0;
    let mut a: u64 = 31415;
    for byte in key.bytes() {
        value = (u64::from(byte) + a * value) % size;
        a = a * HASH_BASE % (size - 1);
    }
    value as usize
}

/// Linear probe over `slots` starting at the key's home position.
///
/// With `for_insert` the first free slot terminates the probe; without it a
/// free slot means the key is absent. A full cycle without a free slot is
/// `CapacityExhausted` on insert and `KeyNotFound` on lookup.
pub(crate) fn probe_slots<T>(
    slots: &[Option<(String, T)>],
    key: &str,
    for_insert: bool,
) -> Result<usize> {
    let mut pos = poly_hash(key, slots.len());
    for _ in 0..slots.len() {
        match &slots[pos] {
            None => {
                return if for_insert {
                    Ok(pos)
                } else {
                    Err(Error::KeyNotFound(key.to_string()))
                };
            }
            Some((stored, _)) if stored == key => return Ok(pos),
            Some(_) => pos = (pos + 1) % slots.len(),
        }
    }
    if for_insert {
        Err(Error::CapacityExhausted(format!(
            "probe table is full, no slot left for key {:?}",
            key
        )))
    } else {
        Err(Error::KeyNotFound(key.to_string()))
    }
}
