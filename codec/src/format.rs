//! Wire format strategies.
//!
//! A [Format] makes the only decisions that differ between binary wire formats: how a length
//! is written, how an enum variant index is written, and whether map entries must appear in
//! canonical (strictly increasing key byte) order. Everything else is shared by
//! [crate::Serializer] and [crate::Deserializer].
//!
//! Formats that require canonical ordering can build their hooks from [sort_entries_by_bytes]
//! and [ensure_increasing].

use crate::Error;
use bytes::{Buf, BufMut};
use tracing::debug;

/// The format-specific half of the primitive codec.
///
/// Implementors are usually zero-sized markers used as a type parameter.
pub trait Format {
    /// Human-readable name, used in logs.
    const NAME: &'static str;

    /// Writes the length of a string, byte string, or collection.
    fn write_len(len: usize, buf: &mut impl BufMut) -> Result<(), Error>;

    /// Reads a length written by [Format::write_len].
    ///
    /// The value is returned unchecked; range validation happens in [crate::Deserializer].
    fn read_len(buf: &mut impl Buf) -> Result<i64, Error>;

    /// Writes the index of an enum variant.
    fn write_variant_index(index: u32, buf: &mut impl BufMut);

    /// Reads an index written by [Format::write_variant_index].
    fn read_variant_index(buf: &mut impl Buf) -> Result<u32, Error>;

    /// Reorders the map entries starting at `offsets` within `buffer`.
    ///
    /// Called once all entries of a map have been written. The default does nothing.
    fn sort_map_entries(_buffer: &mut [u8], _offsets: &[usize]) {}

    /// Checks that a decoded map key follows the previous one.
    ///
    /// The default accepts any order.
    fn check_that_key_slices_are_increasing(_prev: &[u8], _cur: &[u8]) -> Result<(), Error> {
        Ok(())
    }
}

/// Sorts the map entries of `buffer` in increasing byte-lexicographic order, in place.
///
/// Entry `i` spans `offsets[i]..offsets[i + 1]` and the last entry runs to the end of `buffer`.
/// `offsets` must be non-decreasing and within `buffer`. Otherwise `buffer` is left untouched.
pub fn sort_entries_by_bytes(buffer: &mut [u8], offsets: &[usize]) {
    if offsets.len() <= 1 {
        return;
    }
    let ordered = offsets.windows(2).all(|pair| pair[0] <= pair[1]);
    if !ordered || offsets[offsets.len() - 1] > buffer.len() {
        debug!(?offsets, len = buffer.len(), "invalid map entry offsets");
        return;
    }
    let start = offsets[0];
    let end = buffer.len();
    let old = buffer[start..].to_vec();

    let mut entries: Vec<&[u8]> = offsets
        .iter()
        .enumerate()
        .map(|(i, &offset)| {
            let next = offsets.get(i + 1).copied().unwrap_or(end);
            &old[offset - start..next - start]
        })
        .collect();
    entries.sort_unstable();

    let mut position = start;
    for entry in entries {
        buffer[position..position + entry.len()].copy_from_slice(entry);
        position += entry.len();
    }
}

/// Fails with [Error::NonCanonicalInput] unless `prev` is strictly less than `cur`.
pub fn ensure_increasing(prev: &[u8], cur: &[u8]) -> Result<(), Error> {
    if prev >= cur {
        debug!(?prev, ?cur, "map keys out of order");
        return Err(Error::NonCanonicalInput);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_entries() {
        // prefix | [3, 0] | [1, 9, 9] | [2]
        let mut buffer = vec![0xAA, 3, 0, 1, 9, 9, 2];
        sort_entries_by_bytes(&mut buffer, &[1, 3, 6]);
        assert_eq!(buffer, vec![0xAA, 1, 9, 9, 2, 3, 0]);
    }

    #[test]
    fn test_sort_entries_trivial() {
        let mut buffer = vec![5, 4, 3];
        sort_entries_by_bytes(&mut buffer, &[]);
        sort_entries_by_bytes(&mut buffer, &[0]);
        assert_eq!(buffer, vec![5, 4, 3]);
    }

    #[test]
    fn test_sort_entries_prefix_first() {
        // A key that is a prefix of another sorts first.
        let mut buffer = vec![1, 2, 1];
        sort_entries_by_bytes(&mut buffer, &[0, 2]);
        assert_eq!(buffer, vec![1, 1, 2]);
    }

    #[test]
    fn test_sort_entries_invalid_offsets() {
        let mut buffer = vec![3, 2, 1];
        sort_entries_by_bytes(&mut buffer, &[2, 1]);
        assert_eq!(buffer, vec![3, 2, 1]);
        sort_entries_by_bytes(&mut buffer, &[0, 5]);
        assert_eq!(buffer, vec![3, 2, 1]);
        sort_entries_by_bytes(&mut buffer, &[4, 4]);
        assert_eq!(buffer, vec![3, 2, 1]);
    }

    #[test]
    fn test_sort_entries_empty_entries() {
        let mut buffer = vec![2, 1];
        sort_entries_by_bytes(&mut buffer, &[0, 0, 1, 2]);
        assert_eq!(buffer, vec![1, 2]);
    }

    #[test]
    fn test_ensure_increasing() {
        assert!(ensure_increasing(&[1], &[2]).is_ok());
        assert!(ensure_increasing(&[1], &[1, 0]).is_ok());
        assert!(ensure_increasing(&[], &[0]).is_ok());
        assert_eq!(ensure_increasing(&[1], &[1]), Err(Error::NonCanonicalInput));
        assert_eq!(ensure_increasing(&[2], &[1, 5]), Err(Error::NonCanonicalInput));
    }
}
