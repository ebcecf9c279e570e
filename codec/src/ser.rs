//! Serializer side of the primitive codec.

use crate::{Config, Error, Format};
use bytes::{BufMut, Bytes, BytesMut};
use num_bigint::{BigInt, BigUint};
use paste::paste;
use std::marker::PhantomData;
use tracing::debug;

// Fixed-width integers written in little-endian order.
macro_rules! impl_serialize_fixed {
    ($($type:ident),*) => {
        paste! {
            $(
                /// Writes a fixed-width integer in little-endian order.
                #[inline]
                pub fn [<serialize_ $type>](&mut self, value: $type) {
                    self.buffer.[<put_ $type _le>](value);
                }
            )*
        }
    };
}

/// Appends primitive values to a growable buffer.
///
/// The [Format] parameter decides how lengths and variant indices are written; everything
/// else is shared. A serializer is meant to encode a single top-level value and be discarded
/// afterwards. If any operation fails, the buffer is left partially written and must not be
/// used.
#[derive(Debug)]
pub struct Serializer<F: Format> {
    buffer: BytesMut,
    container_depth_budget: usize,
    _format: PhantomData<F>,
}

impl<F: Format> Default for Serializer<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Format> Serializer<F> {
    /// Creates a serializer with the default [Config].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a serializer whose container depth is bounded by `cfg`.
    pub fn with_config(cfg: Config) -> Self {
        Self {
            buffer: BytesMut::new(),
            container_depth_budget: cfg.max_container_depth,
            _format: PhantomData,
        }
    }

    /// Enters a nested container (list, map, record, or enum).
    ///
    /// Fails with [Error::DepthExceeded] if the budget is exhausted. Nothing is written.
    pub fn increase_container_depth(&mut self) -> Result<(), Error> {
        if self.container_depth_budget == 0 {
            debug!(format = F::NAME, "exceeded maximum container depth");
            return Err(Error::DepthExceeded);
        }
        self.container_depth_budget -= 1;
        Ok(())
    }

    /// Leaves a container entered with [Self::increase_container_depth].
    pub fn decrease_container_depth(&mut self) {
        self.container_depth_budget = self.container_depth_budget.saturating_add(1);
    }

    /// Runs `f` inside one level of container nesting.
    pub fn with_container<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        self.increase_container_depth()?;
        let result = f(self);
        self.decrease_container_depth();
        result
    }

    /// Writes a length using the format's encoding.
    pub fn serialize_len(&mut self, len: usize) -> Result<(), Error> {
        F::write_len(len, &mut self.buffer)
    }

    /// Writes an enum variant index using the format's encoding.
    pub fn serialize_variant_index(&mut self, index: u32) {
        F::write_variant_index(index, &mut self.buffer);
    }

    /// Gives the format a chance to reorder the map entries written at `offsets`.
    ///
    /// Each offset is a value of [Self::get_buffer_offset] taken before writing an entry.
    pub fn sort_map_entries(&mut self, offsets: &[usize]) {
        F::sort_map_entries(&mut self.buffer[..], offsets);
    }

    /// Returns the bytes written so far.
    pub fn get_bytes(&self) -> &[u8] {
        &self.buffer[..]
    }

    /// Returns the number of bytes written so far.
    pub fn get_buffer_offset(&self) -> usize {
        self.buffer.len()
    }

    /// Consumes the serializer, returning the encoded bytes.
    pub fn into_bytes(self) -> Bytes {
        self.buffer.freeze()
    }

    /// Writes the UTF-8 bytes of `value`, prefixed by their length.
    pub fn serialize_str(&mut self, value: &str) -> Result<(), Error> {
        self.serialize_bytes(value.as_bytes())
    }

    /// Writes `value`, prefixed by its length.
    pub fn serialize_bytes(&mut self, value: &[u8]) -> Result<(), Error> {
        self.serialize_len(value.len())?;
        self.buffer.put_slice(value);
        Ok(())
    }

    /// Writes `1` for `true` and `0` for `false`.
    pub fn serialize_bool(&mut self, value: bool) {
        self.buffer.put_u8(u8::from(value));
    }

    /// The unit value has no representation.
    pub fn serialize_unit(&mut self) {}

    /// Not supported by this runtime.
    pub fn serialize_char(&mut self, _value: char) -> Result<(), Error> {
        Err(Error::NotSupported("serialize_char"))
    }

    /// Not supported by this runtime.
    pub fn serialize_f32(&mut self, _value: f32) -> Result<(), Error> {
        Err(Error::NotSupported("serialize_f32"))
    }

    /// Not supported by this runtime.
    pub fn serialize_f64(&mut self, _value: f64) -> Result<(), Error> {
        Err(Error::NotSupported("serialize_f64"))
    }

    /// Writes a single byte.
    #[inline]
    pub fn serialize_u8(&mut self, value: u8) {
        self.buffer.put_u8(value);
    }

    /// Writes a single signed byte.
    #[inline]
    pub fn serialize_i8(&mut self, value: i8) {
        self.buffer.put_i8(value);
    }

    impl_serialize_fixed!(u16, u32, u64, i16, i32, i64);

    /// Writes 16 bytes in little-endian order.
    pub fn serialize_u128(&mut self, value: u128) {
        self.buffer.put_u128_le(value);
    }

    /// Writes the two's-complement representation of `value` as an unsigned 128-bit integer.
    pub fn serialize_i128(&mut self, value: i128) {
        self.serialize_u128(value as u128);
    }

    /// Writes an arbitrary-precision value that must fit in 128 unsigned bits.
    pub fn serialize_u128_big(&mut self, value: &BigUint) -> Result<(), Error> {
        let value = u128::try_from(value)
            .map_err(|_| Error::Range("invalid value for an unsigned int128"))?;
        self.serialize_u128(value);
        Ok(())
    }

    /// Writes an arbitrary-precision value that must fit in 128 signed bits.
    pub fn serialize_i128_big(&mut self, value: &BigInt) -> Result<(), Error> {
        let value = i128::try_from(value)
            .map_err(|_| Error::Range("invalid value for a signed int128"))?;
        self.serialize_i128(value);
        Ok(())
    }

    /// Writes `1` if an optional value follows, `0` otherwise.
    ///
    /// The caller serializes the payload only when `present` is true.
    pub fn serialize_option_tag(&mut self, present: bool) {
        self.buffer.put_u8(u8::from(present));
    }
}
