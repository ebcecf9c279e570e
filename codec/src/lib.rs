//! Encode and decode primitive values under the Bincode and Postcard wire formats.
//!
//! # Overview
//!
//! A small runtime for generated (or hand-written) type-specific encoders:
//! - [Serializer] turns primitive values into bytes
//! - [Deserializer] reads them back from untrusted input
//! - [cobs] frames finished buffers on streams that have no message boundaries
//!
//! The runtime knows nothing about records or enums. A type encoder calls the `serialize_*`
//! operations in field order and the matching `deserialize_*` operations to read them back.
//!
//! # Wire Formats
//!
//! Both formats write fixed-width integers in little-endian order, booleans and option tags as
//! a single `0`/`1` byte, 128-bit integers as 16 bytes (two's complement when signed), and
//! strings as length-prefixed UTF-8. They differ only in how lengths and variant indices are
//! written, which is decided by a [Format]:
//!
//! | Format                      | Length                  | Variant index           |
//! |-----------------------------|-------------------------|-------------------------|
//! | [Bincode](bincode::Bincode) | 8 bytes, little-endian  | 4 bytes, little-endian  |
//! | [Postcard](postcard::Postcard) | varint (`u32`)       | varint (`u32`)          |
//!
//! `char`, `f32`, and `f64` are not supported and fail with [Error::NotSupported].
//!
//! # Nesting
//!
//! Encoders must call `increase_container_depth` / `decrease_container_depth` (or
//! `with_container`) around every nested list, map, record, or enum. The budget comes from
//! [Config] and protects decoders from maliciously deep input.
//!
//! # Example
//!
//! ```
//! use serdegen_codec::{Deserializer, Error, Format, Serializer};
//! use serdegen_codec::postcard::Postcard;
//!
//! #[derive(Debug, PartialEq)]
//! enum Shape {
//!     Point,
//!     Label { name: String, id: Option<u64> },
//! }
//!
//! fn serialize<F: Format>(shape: &Shape, ser: &mut Serializer<F>) -> Result<(), Error> {
//!     ser.with_container(|ser| {
//!         match shape {
//!             Shape::Point => ser.serialize_variant_index(0),
//!             Shape::Label { name, id } => {
//!                 ser.serialize_variant_index(1);
//!                 ser.serialize_str(name)?;
//!                 ser.serialize_option_tag(id.is_some());
//!                 if let Some(id) = id {
//!                     ser.serialize_u64(*id);
//!                 }
//!             }
//!         }
//!         Ok(())
//!     })
//! }
//!
//! fn deserialize<F: Format>(de: &mut Deserializer<'_, F>) -> Result<Shape, Error> {
//!     de.with_container(|de| match de.deserialize_variant_index()? {
//!         0 => Ok(Shape::Point),
//!         _ => {
//!             let name = de.deserialize_str()?;
//!             let id = if de.deserialize_option_tag()? {
//!                 Some(de.deserialize_u64()?)
//!             } else {
//!                 None
//!             };
//!             Ok(Shape::Label { name, id })
//!         }
//!     })
//! }
//!
//! let shape = Shape::Label { name: "a".into(), id: None };
//! let mut ser = Serializer::<Postcard>::new();
//! serialize(&shape, &mut ser).unwrap();
//! assert_eq!(ser.get_bytes(), &[1, 1, b'a', 0]);
//!
//! let mut de = Deserializer::<Postcard>::new(ser.get_bytes());
//! assert_eq!(deserialize(&mut de).unwrap(), shape);
//! de.finish().unwrap();
//! ```

pub mod bincode;
pub mod cobs;
pub mod config;
pub mod de;
pub mod error;
pub mod format;
pub mod postcard;
pub mod ser;
pub mod util;
pub mod varint;

// Re-export main types and traits
pub use config::Config;
pub use de::Deserializer;
pub use error::Error;
pub use format::Format;
pub use ser::Serializer;

pub use bincode::{Bincode, BincodeDeserializer, BincodeSerializer};
pub use postcard::{Postcard, PostcardDeserializer, PostcardSerializer};
