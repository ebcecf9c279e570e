#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use serdegen_codec::{Bincode, Config, Deserializer, Error, Format, Postcard};

#[derive(Arbitrary, Debug)]
enum Op {
    U8,
    U16,
    U32,
    U64,
    U128,
    I128,
    Bool,
    Str,
    Bytes,
    OptionTag,
    Len,
    VariantIndex,
    Enter,
    Leave,
}

#[derive(Arbitrary, Debug)]
struct FuzzInput {
    ops: Vec<Op>,
    max_depth: u8,
    data: Vec<u8>,
}

// Drives a deserializer over untrusted input: it may fail, but never panic or read past the end.
fn decode<F: Format>(input: &FuzzInput) {
    let cfg = Config::default().with_max_container_depth(input.max_depth as usize);
    let mut de = Deserializer::<F>::with_config(&input.data, cfg);
    let mut depth = 0usize;
    for op in &input.ops {
        let before = de.get_buffer_offset();
        let result: Result<(), Error> = match op {
            Op::U8 => de.deserialize_u8().map(drop),
            Op::U16 => de.deserialize_u16().map(drop),
            Op::U32 => de.deserialize_u32().map(drop),
            Op::U64 => de.deserialize_u64().map(drop),
            Op::U128 => de.deserialize_u128().map(drop),
            Op::I128 => de.deserialize_i128().map(drop),
            Op::Bool => de.deserialize_bool().map(drop),
            Op::Str => de.deserialize_str().map(drop),
            Op::Bytes => de.deserialize_bytes().map(drop),
            Op::OptionTag => de.deserialize_option_tag().map(drop),
            Op::Len => de.deserialize_len().map(drop),
            Op::VariantIndex => de.deserialize_variant_index().map(drop),
            Op::Enter => de.increase_container_depth().map(|_| depth += 1),
            Op::Leave => {
                if depth > 0 {
                    de.decrease_container_depth();
                    depth -= 1;
                }
                Ok(())
            }
        };
        assert!(de.get_buffer_offset() >= before);
        assert!(de.get_buffer_offset() <= input.data.len());
        if result.is_err() {
            return;
        }
        assert!(depth <= input.max_depth as usize);
    }
}

fn fuzz(input: FuzzInput) {
    decode::<Bincode>(&input);
    decode::<Postcard>(&input);
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
