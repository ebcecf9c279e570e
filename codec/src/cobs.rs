//! Consistent Overhead Byte Stuffing.
//!
//! COBS removes every `0x00` from a payload so that a single `0x00` can terminate a frame on a
//! byte stream with no other message boundaries. It is independent of the wire formats and is
//! typically applied to a finished [Postcard](crate::postcard) buffer.
//!
//! A frame is a sequence of code bytes, each followed by `code - 1` data bytes, and ends with
//! `0x00`. A code below `0xFF` stands for a run followed by an elided zero; `0xFF` stands for a
//! maximal run of 254 bytes with no zero after it.
//!
//! An empty payload encodes to an empty frame (no terminator), and an empty frame decodes to
//! an empty payload.
//!
//! # Example
//!
//! ```
//! use serdegen_codec::cobs;
//!
//! let frame = cobs::encode(&[0x11, 0x22, 0x00, 0x33]);
//! assert_eq!(frame, vec![3, 0x11, 0x22, 2, 0x33, 0]);
//! assert_eq!(cobs::decode(&frame).unwrap(), vec![0x11, 0x22, 0x00, 0x33]);
//! ```

use crate::Error;
use bytes::BytesMut;
use tracing::{debug, trace};

/// Frame terminator.
pub const SENTINEL: u8 = 0x00;

/// Code for a maximal run: 254 data bytes with no elided zero.
const MAX_CODE: u8 = 0xFF;

/// Returns the largest frame [encode] can produce for `len` input bytes, terminator included.
pub const fn max_encoded_size(len: usize) -> usize {
    len + 2 + len / 254
}

/// Encodes `input` as a complete frame, including the terminator.
pub fn encode(input: &[u8]) -> Vec<u8> {
    let mut output = vec![0; max_encoded_size(input.len())];
    let len = encode_frame(input, &mut output);
    output.truncate(len);
    output
}

/// Encodes `input` into `output`, returning the length of the frame, terminator included.
///
/// `output` must hold at least [max_encoded_size] bytes, even if the actual frame is shorter.
pub fn encode_into(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    if input.is_empty() {
        return Ok(0);
    }
    let needed = max_encoded_size(input.len());
    if output.len() < needed {
        return Err(Error::BufferTooSmall {
            needed,
            available: output.len(),
        });
    }
    Ok(encode_frame(input, output))
}

// Callers guarantee `output.len() >= max_encoded_size(input.len())`.
fn encode_frame(input: &[u8], output: &mut [u8]) -> usize {
    let mut code: u8 = 1;
    let mut code_index = 0;
    let mut output_index = 1;
    for &byte in input {
        if byte == SENTINEL {
            output[code_index] = code;
            code = 1;
            code_index = output_index;
            output_index += 1;
            continue;
        }

        output[output_index] = byte;
        output_index += 1;
        code += 1;
        if code == MAX_CODE {
            output[code_index] = code;
            code = 1;
            code_index = output_index;
            output_index += 1;
        }
    }

    if output_index == 1 {
        return 0;
    }
    output[code_index] = code;
    output[output_index] = SENTINEL;
    trace!(input = input.len(), frame = output_index + 1, "encoded cobs frame");
    output_index + 1
}

/// Decodes a complete frame, returning the payload without the terminator.
pub fn decode(input: &[u8]) -> Result<Vec<u8>, Error> {
    let mut output = input.to_vec();
    let len = decode_in_place(&mut output)?;
    output.truncate(len);
    Ok(output)
}

/// Decodes a complete frame into `output`, returning the length of the payload.
///
/// The payload is never longer than the frame, so `output` must hold at least `input.len()`
/// bytes.
pub fn decode_into(input: &[u8], output: &mut [u8]) -> Result<usize, Error> {
    if output.len() < input.len() {
        return Err(Error::BufferTooSmall {
            needed: input.len(),
            available: output.len(),
        });
    }
    let output = &mut output[..input.len()];
    output.copy_from_slice(input);
    decode_in_place(output)
}

/// Decodes a complete frame held in `data`, overwriting it with the payload.
///
/// Returns the length of the payload, which starts at `data[0]`. A non-empty frame must end
/// with its only [SENTINEL] and every run must fit in the frame, otherwise this fails with
/// [Error::TruncatedFrame]. Two frames left back to back in one buffer are rejected; split
/// them with [take_frame] first.
pub fn decode_in_place(data: &mut [u8]) -> Result<usize, Error> {
    let len = data.len();
    match data.last() {
        None => return Ok(0),
        Some(&SENTINEL) => {}
        Some(_) => {
            debug!(len, "cobs frame missing terminator");
            return Err(Error::TruncatedFrame);
        }
    }

    if let Some(position) = data[..len - 1].iter().position(|&byte| byte == SENTINEL) {
        debug!(len, position, "cobs frame has zero before terminator");
        return Err(Error::TruncatedFrame);
    }

    // The write position never passes the read position, so runs can be moved in place.
    let mut source_index = 0;
    let mut dest_index = 0;
    while source_index < len {
        let code = data[source_index];
        if source_index + code as usize > len && code != 1 {
            debug!(len, source_index, code, "cobs run past end of frame");
            return Err(Error::TruncatedFrame);
        }
        source_index += 1;

        let run = (code as usize).saturating_sub(1);
        data.copy_within(source_index..source_index + run, dest_index);
        source_index += run;
        dest_index += run;

        if code != MAX_CODE && source_index < len {
            data[dest_index] = SENTINEL;
            dest_index += 1;
        }
    }

    // The last zero written stands for the terminator, not payload.
    Ok(dest_index.saturating_sub(1))
}

/// Splits the first complete frame, terminator included, off the front of `buf`.
///
/// Returns `None` and leaves `buf` untouched if no terminator has arrived yet.
pub fn take_frame(buf: &mut BytesMut) -> Option<BytesMut> {
    let end = buf.iter().position(|&byte| byte == SENTINEL)?;
    trace!(frame = end + 1, buffered = buf.len(), "split cobs frame");
    Some(buf.split_to(end + 1))
}
