//! The Postcard wire format.
//!
//! Lengths and enum variant indices are written as [varint](crate::varint)-encoded `u32`
//! values. Lengths above `u32::MAX` cannot be represented. Map entries are not reordered.
//!
//! Postcard messages are commonly delimited on a byte stream with [cobs](crate::cobs).
//!
//! # Example
//!
//! ```
//! use serdegen_codec::{cobs, postcard::{PostcardDeserializer, PostcardSerializer}};
//!
//! let mut ser = PostcardSerializer::new();
//! ser.serialize_option_tag(true);
//! ser.serialize_u16(0x0100);
//! let frame = cobs::encode(ser.get_bytes());
//! assert_eq!(frame, vec![2, 1, 2, 1, 0]);
//!
//! let payload = cobs::decode(&frame).unwrap();
//! let mut de = PostcardDeserializer::new(&payload);
//! assert!(de.deserialize_option_tag().unwrap());
//! assert_eq!(de.deserialize_u16().unwrap(), 0x0100);
//! ```

use crate::{varint, Deserializer, Error, Format, Serializer};
use bytes::{Buf, BufMut};

/// Marker for the Postcard format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct Postcard;

/// A [Serializer] for the Postcard format.
pub type PostcardSerializer = Serializer<Postcard>;

/// A [Deserializer] for the Postcard format.
pub type PostcardDeserializer<'a> = Deserializer<'a, Postcard>;

impl Format for Postcard {
    const NAME: &'static str = "postcard";

    fn write_len(len: usize, buf: &mut impl BufMut) -> Result<(), Error> {
        let len = u32::try_from(len).map_err(|_| Error::LengthOverflow(len))?;
        varint::write(len, buf);
        Ok(())
    }

    fn read_len(buf: &mut impl Buf) -> Result<i64, Error> {
        varint::read::<u32>(buf).map(i64::from)
    }

    fn write_variant_index(index: u32, buf: &mut impl BufMut) {
        varint::write(index, buf);
    }

    fn read_variant_index(buf: &mut impl Buf) -> Result<u32, Error> {
        varint::read(buf)
    }
}
