#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serdegen_codec::{Bincode, Deserializer, Error, Format, Postcard, Serializer};

#[derive(Arbitrary, Debug, Clone, PartialEq)]
enum Primitive {
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
    Option(Option<u64>),
    Variant(u32),
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    values: Vec<Primitive>,
    cut: usize,
}

fn write<F: Format>(values: &[Primitive]) -> Vec<u8> {
    let mut ser = Serializer::<F>::new();
    for value in values {
        match value {
            Primitive::Unit => ser.serialize_unit(),
            Primitive::Bool(v) => ser.serialize_bool(*v),
            Primitive::U8(v) => ser.serialize_u8(*v),
            Primitive::U16(v) => ser.serialize_u16(*v),
            Primitive::U32(v) => ser.serialize_u32(*v),
            Primitive::U64(v) => ser.serialize_u64(*v),
            Primitive::U128(v) => ser.serialize_u128(*v),
            Primitive::I8(v) => ser.serialize_i8(*v),
            Primitive::I16(v) => ser.serialize_i16(*v),
            Primitive::I32(v) => ser.serialize_i32(*v),
            Primitive::I64(v) => ser.serialize_i64(*v),
            Primitive::I128(v) => ser.serialize_i128(*v),
            Primitive::Str(v) => ser.serialize_str(v).expect("Failed to write string!"),
            Primitive::Bytes(v) => ser.serialize_bytes(v).expect("Failed to write bytes!"),
            Primitive::Option(v) => {
                ser.serialize_option_tag(v.is_some());
                if let Some(v) = v {
                    ser.serialize_u64(*v);
                }
            }
            Primitive::Variant(v) => ser.serialize_variant_index(*v),
        }
    }
    ser.into_bytes().to_vec()
}

fn read<F: Format>(schema: &[Primitive], input: &[u8]) -> Result<Vec<Primitive>, Error> {
    let mut de = Deserializer::<F>::new(input);
    let mut values = Vec::with_capacity(schema.len());
    for value in schema {
        values.push(match value {
            Primitive::Unit => {
                de.deserialize_unit()?;
                Primitive::Unit
            }
            Primitive::Bool(_) => Primitive::Bool(de.deserialize_bool()?),
            Primitive::U8(_) => Primitive::U8(de.deserialize_u8()?),
            Primitive::U16(_) => Primitive::U16(de.deserialize_u16()?),
            Primitive::U32(_) => Primitive::U32(de.deserialize_u32()?),
            Primitive::U64(_) => Primitive::U64(de.deserialize_u64()?),
            Primitive::U128(_) => Primitive::U128(de.deserialize_u128()?),
            Primitive::I8(_) => Primitive::I8(de.deserialize_i8()?),
            Primitive::I16(_) => Primitive::I16(de.deserialize_i16()?),
            Primitive::I32(_) => Primitive::I32(de.deserialize_i32()?),
            Primitive::I64(_) => Primitive::I64(de.deserialize_i64()?),
            Primitive::I128(_) => Primitive::I128(de.deserialize_i128()?),
            Primitive::Str(_) => Primitive::Str(de.deserialize_str()?),
            Primitive::Bytes(_) => Primitive::Bytes(de.deserialize_bytes()?.to_vec()),
            Primitive::Option(_) => Primitive::Option(if de.deserialize_option_tag()? {
                Some(de.deserialize_u64()?)
            } else {
                None
            }),
            Primitive::Variant(_) => Primitive::Variant(de.deserialize_variant_index()?),
        });
    }
    de.finish()?;
    Ok(values)
}

fn roundtrip<F: Format>(input: &FuzzInput) {
    let encoded = write::<F>(&input.values);
    let decoded = read::<F>(&input.values, &encoded).expect("Failed to decode a successfully encoded input!");
    assert_eq!(decoded, input.values);

    // Removing any suffix must fail.
    if encoded.is_empty() {
        return;
    }
    let cut = input.cut % encoded.len() + 1;
    assert_eq!(
        read::<F>(&input.values, &encoded[..encoded.len() - cut]),
        Err(Error::UnexpectedEndOfInput)
    );
}

fn fuzz(input: FuzzInput) {
    roundtrip::<Bincode>(&input);
    roundtrip::<Postcard>(&input);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
