//! Deserializer side of the primitive codec.

use crate::{util::at_least, Config, Error, Format};
use bytes::{Buf, Bytes};
use num_bigint::{BigInt, BigUint};
use paste::paste;
use std::marker::PhantomData;
use tracing::debug;

// Fixed-width integers read in little-endian order.
macro_rules! impl_deserialize_fixed {
    ($($type:ident),*) => {
        paste! {
            $(
                /// Reads a fixed-width little-endian integer.
                #[inline]
                pub fn [<deserialize_ $type>](&mut self) -> Result<$type, Error> {
                    at_least(&mut self.buf, std::mem::size_of::<$type>())?;
                    Ok(self.buf.[<get_ $type _le>]())
                }
            )*
        }
    };
}

/// Reads primitive values from a byte slice.
///
/// The cursor only moves forward and never passes the end of the input. After any failure the
/// cursor position is unspecified and the deserializer must be discarded.
#[derive(Debug)]
pub struct Deserializer<'a, F: Format> {
    input: &'a [u8],
    buf: &'a [u8],
    config: Config,
    container_depth_budget: usize,
    _format: PhantomData<F>,
}

impl<'a, F: Format> Deserializer<'a, F> {
    /// Creates a deserializer over `input` with the default [Config].
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Creates a deserializer over `input` bounded by `cfg`.
    pub fn with_config(input: &'a [u8], cfg: Config) -> Self {
        Self {
            input,
            buf: input,
            config: cfg,
            container_depth_budget: cfg.max_container_depth,
            _format: PhantomData,
        }
    }

    /// Enters a nested container.
    ///
    /// Fails with [Error::DepthExceeded] if the budget is exhausted.
    pub fn increase_container_depth(&mut self) -> Result<(), Error> {
        if self.container_depth_budget == 0 {
            debug!(
                format = F::NAME,
                offset = self.get_buffer_offset(),
                "exceeded maximum container depth"
            );
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

    /// Reads a length and checks it against the configured maximum.
    pub fn deserialize_len(&mut self) -> Result<usize, Error> {
        let len = F::read_len(&mut self.buf)?;
        if !self.config.allows_length(len) {
            debug!(format = F::NAME, len, "invalid length");
            return Err(Error::InvalidLength(len));
        }
        usize::try_from(len).map_err(|_| Error::InvalidLength(len))
    }

    /// Reads an enum variant index.
    pub fn deserialize_variant_index(&mut self) -> Result<u32, Error> {
        F::read_variant_index(&mut self.buf)
    }

    /// Checks the ordering of two consecutive map keys, as required by the format.
    ///
    /// Key slices can be taken from [Self::input] using offsets from
    /// [Self::get_buffer_offset].
    pub fn check_that_key_slices_are_increasing(
        &self,
        prev: &[u8],
        cur: &[u8],
    ) -> Result<(), Error> {
        F::check_that_key_slices_are_increasing(prev, cur)
    }

    /// Returns the complete input, including bytes already consumed.
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Returns the number of bytes consumed so far.
    pub fn get_buffer_offset(&self) -> usize {
        self.input.len() - self.buf.len()
    }

    /// Returns the number of bytes not yet consumed.
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    /// Consumes the deserializer, failing if any input is left.
    pub fn finish(self) -> Result<(), Error> {
        let remaining = self.buf.remaining();
        if remaining > 0 {
            return Err(Error::ExtraData(remaining));
        }
        Ok(())
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8], Error> {
        at_least(&mut self.buf, len)?;
        let buf: &'a [u8] = self.buf;
        let (head, tail) = buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    /// Reads a length-prefixed UTF-8 string.
    pub fn deserialize_str(&mut self) -> Result<String, Error> {
        let len = self.deserialize_len()?;
        let bytes = self.take(len)?;
        let value = std::str::from_utf8(bytes).map_err(|_| Error::InvalidUtf8)?;
        Ok(value.to_owned())
    }

    /// Reads a length-prefixed byte string.
    pub fn deserialize_bytes(&mut self) -> Result<Bytes, Error> {
        let len = self.deserialize_len()?;
        Ok(Bytes::copy_from_slice(self.take(len)?))
    }

    /// Reads a byte that must be `0` or `1`.
    pub fn deserialize_bool(&mut self) -> Result<bool, Error> {
        match self.deserialize_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            value => Err(Error::InvalidBool(value)),
        }
    }

    /// The unit value has no representation.
    pub fn deserialize_unit(&mut self) -> Result<(), Error> {
        Ok(())
    }

    /// Not supported by this runtime.
    pub fn deserialize_char(&mut self) -> Result<char, Error> {
        Err(Error::NotSupported("deserialize_char"))
    }

    /// Not supported by this runtime.
    pub fn deserialize_f32(&mut self) -> Result<f32, Error> {
        Err(Error::NotSupported("deserialize_f32"))
    }

    /// Not supported by this runtime.
    pub fn deserialize_f64(&mut self) -> Result<f64, Error> {
        Err(Error::NotSupported("deserialize_f64"))
    }

    /// Reads a single byte.
    #[inline]
    pub fn deserialize_u8(&mut self) -> Result<u8, Error> {
        at_least(&mut self.buf, 1)?;
        Ok(self.buf.get_u8())
    }

    /// Reads a single signed byte.
    #[inline]
    pub fn deserialize_i8(&mut self) -> Result<i8, Error> {
        at_least(&mut self.buf, 1)?;
        Ok(self.buf.get_i8())
    }

    impl_deserialize_fixed!(u16, u32, u64, i16, i32, i64, u128, i128);

    /// Reads a 128-bit value into an arbitrary-precision unsigned integer.
    pub fn deserialize_u128_big(&mut self) -> Result<BigUint, Error> {
        self.deserialize_u128().map(BigUint::from)
    }

    /// Reads a 128-bit value into an arbitrary-precision signed integer.
    pub fn deserialize_i128_big(&mut self) -> Result<BigInt, Error> {
        self.deserialize_i128().map(BigInt::from)
    }

    /// Reads the presence tag of an optional value.
    pub fn deserialize_option_tag(&mut self) -> Result<bool, Error> {
        self.deserialize_bool()
    }
}
