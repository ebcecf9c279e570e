//! The Bincode wire format.
//!
//! Lengths are written as 8-byte little-endian integers and enum variant indices as 4-byte
//! little-endian integers, regardless of magnitude. Map entries are not reordered.
//!
//! # Example
//!
//! ```
//! use serdegen_codec::bincode::{BincodeDeserializer, BincodeSerializer};
//!
//! let mut ser = BincodeSerializer::new();
//! ser.serialize_str("hi").unwrap();
//! assert_eq!(ser.get_bytes(), &[2, 0, 0, 0, 0, 0, 0, 0, b'h', b'i']);
//!
//! let mut de = BincodeDeserializer::new(ser.get_bytes());
//! assert_eq!(de.deserialize_str().unwrap(), "hi");
//! ```

use crate::{util::at_least, Deserializer, Error, Format, Serializer};
use bytes::{Buf, BufMut};

/// Marker for the Bincode format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Bincode;

/// A [Serializer] for the Bincode format.
pub type BincodeSerializer = Serializer<Bincode>;

/// A [Deserializer] for the Bincode format.
pub type BincodeDeserializer<'a> = Deserializer<'a, Bincode>;

impl Format for Bincode {
    const NAME: &'static str = "bincode";

    fn write_len(len: usize, buf: &mut impl BufMut) -> Result<(), Error> {
        buf.put_u64_le(len as u64);
        Ok(())
    }

    fn read_len(buf: &mut impl Buf) -> Result<i64, Error> {
        at_least(buf, 8)?;
        Ok(buf.get_i64_le())
    }

    fn write_variant_index(index: u32, buf: &mut impl BufMut) {
        buf.put_u32_le(index);
    }

    fn read_variant_index(buf: &mut impl Buf) -> Result<u32, Error> {
        at_least(buf, 4)?;
        Ok(buf.get_u32_le())
    }
}
