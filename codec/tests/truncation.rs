//! Removing trailing bytes from an encoded buffer must never decode successfully.

use rand::{rngs::StdRng, Rng, SeedableRng};
use serdegen_codec::{cobs, Bincode, Deserializer, Error, Format, Postcard, Serializer};

const SEED: u64 = 0x5EED;
const ITERATIONS: usize = 200;

/// A randomly shaped value, decoded by using the original as its schema.
#[derive(Debug, Clone, PartialEq)]
enum Value {
    Unit,
    Bool(bool),
    U8(u8),
    U16(u16),
    U32(u32),
    U64(u64),
    U128(u128),
    I8(i8),
    I16(i16),
    I32(i32),
    I64(i64),
    I128(i128),
    Str(String),
    Bytes(Vec<u8>),
    Option(Option<u32>),
    Variant(u32),
    Seq(Vec<Value>),
}

impl Value {
    fn random(rng: &mut StdRng, depth: usize) -> Self {
        let kinds = if depth == 0 { 16 } else { 17 };
        match rng.gen_range(0..kinds) {
            0 => Value::Unit,
            1 => Value::Bool(rng.gen()),
            2 => Value::U8(rng.gen()),
            3 => Value::U16(rng.gen()),
            4 => Value::U32(rng.gen()),
            5 => Value::U64(rng.gen()),
            6 => Value::U128(rng.gen()),
            7 => Value::I8(rng.gen()),
            8 => Value::I16(rng.gen()),
            9 => Value::I32(rng.gen()),
            10 => Value::I64(rng.gen()),
            11 => Value::I128(rng.gen()),
            12 => {
                let len = rng.gen_range(0..200);
                Value::Str((0..len).map(|_| rng.gen::<char>()).collect())
            }
            13 => {
                let len = rng.gen_range(0..300);
                Value::Bytes((0..len).map(|_| rng.gen()).collect())
            }
            14 => Value::Option(rng.gen_bool(0.5).then(|| rng.gen())),
            15 => Value::Variant(rng.gen()),
            _ => {
                let len = rng.gen_range(0..6);
                Value::Seq((0..len).map(|_| Value::random(rng, depth - 1)).collect())
            }
        }
    }

    fn serialize<F: Format>(&self, ser: &mut Serializer<F>) -> Result<(), Error> {
        match self {
            Value::Unit => ser.serialize_unit(),
            Value::Bool(v) => ser.serialize_bool(*v),
            Value::U8(v) => ser.serialize_u8(*v),
            Value::U16(v) => ser.serialize_u16(*v),
            Value::U32(v) => ser.serialize_u32(*v),
            Value::U64(v) => ser.serialize_u64(*v),
            Value::U128(v) => ser.serialize_u128(*v),
            Value::I8(v) => ser.serialize_i8(*v),
            Value::I16(v) => ser.serialize_i16(*v),
            Value::I32(v) => ser.serialize_i32(*v),
            Value::I64(v) => ser.serialize_i64(*v),
            Value::I128(v) => ser.serialize_i128(*v),
            Value::Str(v) => ser.serialize_str(v)?,
            Value::Bytes(v) => ser.serialize_bytes(v)?,
            Value::Option(v) => {
                ser.serialize_option_tag(v.is_some());
                if let Some(v) = v {
                    ser.serialize_u32(*v);
                }
            }
            Value::Variant(v) => ser.serialize_variant_index(*v),
            Value::Seq(values) => ser.with_container(|ser| {
                ser.serialize_len(values.len())?;
                for value in values {
                    value.serialize(ser)?;
                }
                Ok(())
            })?,
        }
        Ok(())
    }

    fn deserialize<F: Format>(&self, de: &mut Deserializer<'_, F>) -> Result<Self, Error> {
        Ok(match self {
            Value::Unit => {
                de.deserialize_unit()?;
                Value::Unit
            }
            Value::Bool(_) => Value::Bool(de.deserialize_bool()?),
            Value::U8(_) => Value::U8(de.deserialize_u8()?),
            Value::U16(_) => Value::U16(de.deserialize_u16()?),
            Value::U32(_) => Value::U32(de.deserialize_u32()?),
            Value::U64(_) => Value::U64(de.deserialize_u64()?),
            Value::U128(_) => Value::U128(de.deserialize_u128()?),
            Value::I8(_) => Value::I8(de.deserialize_i8()?),
            Value::I16(_) => Value::I16(de.deserialize_i16()?),
            Value::I32(_) => Value::I32(de.deserialize_i32()?),
            Value::I64(_) => Value::I64(de.deserialize_i64()?),
            Value::I128(_) => Value::I128(de.deserialize_i128()?),
            Value::Str(_) => Value::Str(de.deserialize_str()?),
            Value::Bytes(_) => Value::Bytes(de.deserialize_bytes()?.to_vec()),
            Value::Option(_) => Value::Option(if de.deserialize_option_tag()? {
                Some(de.deserialize_u32()?)
            } else {
                None
            }),
            Value::Variant(_) => Value::Variant(de.deserialize_variant_index()?),
            Value::Seq(values) => de.with_container(|de| {
                let len = de.deserialize_len()?;
                assert_eq!(len, values.len());
                let mut decoded = Vec::with_capacity(len);
                for value in values {
                    decoded.push(value.deserialize(de)?);
                }
                Ok(Value::Seq(decoded))
            })?,
        })
    }
}

fn random_values(rng: &mut StdRng) -> Vec<Value> {
    let count = rng.gen_range(1..8);
    (0..count).map(|_| Value::random(rng, 3)).collect()
}

fn encode<F: Format>(values: &[Value]) -> Vec<u8> {
    let mut ser = Serializer::<F>::new();
    for value in values {
        value.serialize(&mut ser).unwrap();
    }
    ser.get_bytes().to_vec()
}

fn decode<F: Format>(values: &[Value], input: &[u8]) -> Result<Vec<Value>, Error> {
    let mut de = Deserializer::<F>::new(input);
    let decoded = values
        .iter()
        .map(|value| value.deserialize(&mut de))
        .collect::<Result<Vec<_>, _>>()?;
    de.finish()?;
    Ok(decoded)
}

fn truncation<F: Format>() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..ITERATIONS {
        let values = random_values(&mut rng);
        let encoded = encode::<F>(&values);
        assert_eq!(decode::<F>(&values, &encoded).unwrap(), values);

        if encoded.is_empty() {
            continue;
        }
        let cut = rng.gen_range(1..=encoded.len());
        let truncated = &encoded[..encoded.len() - cut];
        assert_eq!(
            decode::<F>(&values, truncated),
            Err(Error::UnexpectedEndOfInput),
            "{} decoded {values:?} with {cut} bytes removed",
            F::NAME,
        );
    }
}

#[test]
fn test_bincode_truncation() {
    truncation::<Bincode>();
}

#[test]
fn test_postcard_truncation() {
    truncation::<Postcard>();
}

#[test]
fn test_every_cut_of_one_buffer() {
    let values = vec![
        Value::Str("abc".into()),
        Value::Seq(vec![Value::U16(7), Value::Option(Some(1))]),
        Value::I128(-1),
    ];
    let bincode = encode::<Bincode>(&values);
    for len in 0..bincode.len() {
        assert_eq!(
            decode::<Bincode>(&values, &bincode[..len]),
            Err(Error::UnexpectedEndOfInput)
        );
    }
    let postcard = encode::<Postcard>(&values);
    for len in 0..postcard.len() {
        assert_eq!(
            decode::<Postcard>(&values, &postcard[..len]),
            Err(Error::UnexpectedEndOfInput)
        );
    }
}

#[test]
fn test_cobs_truncation() {
    let mut rng = StdRng::seed_from_u64(SEED);
    for _ in 0..ITERATIONS {
        let values = random_values(&mut rng);
        let payload = encode::<Postcard>(&values);
        if payload.is_empty() {
            continue;
        }
        let frame = cobs::encode(&payload);
        assert_eq!(cobs::decode(&frame).unwrap(), payload);

        // Keep at least one byte: an empty frame is the encoding of an empty payload.
        let cut = rng.gen_range(1..frame.len());
        assert_eq!(
            cobs::decode(&frame[..frame.len() - cut]),
            Err(Error::TruncatedFrame)
        );
    }
}

#[test]
fn test_cobs_carries_postcard_stream() {
    let mut rng = StdRng::seed_from_u64(SEED + 1);
    let messages: Vec<Vec<Value>> = (0..20).map(|_| random_values(&mut rng)).collect();

    let mut stream = bytes::BytesMut::new();
    for values in &messages {
        stream.extend_from_slice(&cobs::encode(&encode::<Postcard>(values)));
    }

    for values in &messages {
        let payload = encode::<Postcard>(values);
        if payload.is_empty() {
            continue;
        }
        let frame = cobs::take_frame(&mut stream).unwrap();
        let decoded = cobs::decode(&frame).unwrap();
        assert_eq!(decode::<Postcard>(values, &decoded).unwrap(), *values);
    }
    assert!(stream.is_empty());
}
