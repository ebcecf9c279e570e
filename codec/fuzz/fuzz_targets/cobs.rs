#![no_main]

use arbitrary::Arbitrary;
use bytes::BytesMut;
use libfuzzer_sys::fuzz_target;
use serdegen_codec::{cobs, Error};

#[derive(Arbitrary, Debug)]
enum FuzzInput {
    Roundtrip { payload: Vec<u8>, cut: usize },
    Stream(Vec<Vec<u8>>),
    Decode(Vec<u8>),
}

fn roundtrip(payload: &[u8], cut: usize) {
    let frame = cobs::encode(payload);
    assert!(frame.len() <= cobs::max_encoded_size(payload.len()));
    if payload.is_empty() {
        assert!(frame.is_empty());
        return;
    }
    assert_eq!(frame.iter().filter(|&&b| b == cobs::SENTINEL).count(), 1);
    assert_eq!(frame.last(), Some(&cobs::SENTINEL));
    assert_eq!(cobs::decode(&frame).expect("Failed to decode frame!"), payload);

    let mut in_place = frame.clone();
    let len = cobs::decode_in_place(&mut in_place).expect("Failed to decode in place!");
    assert_eq!(&in_place[..len], payload);

    let cut = cut % (frame.len() - 1) + 1;
    assert_eq!(
        cobs::decode(&frame[..frame.len() - cut]),
        Err(Error::TruncatedFrame)
    );
}

fn stream(payloads: &[Vec<u8>]) {
    let mut buf = BytesMut::new();
    for payload in payloads {
        buf.extend_from_slice(&cobs::encode(payload));
    }
    for payload in payloads.iter().filter(|payload| !payload.is_empty()) {
        let frame = cobs::take_frame(&mut buf).expect("Missing frame!");
        assert_eq!(&cobs::decode(&frame).expect("Failed to decode frame!"), payload);
    }
    assert!(buf.is_empty());
}

fn decode(data: &[u8]) {
    // Arbitrary input must never panic, and the payload never outgrows the frame.
    if let Ok(payload) = cobs::decode(data) {
        assert!(payload.len() <= data.len());
    }
}

fn fuzz(input: FuzzInput) {
    match input {
        FuzzInput::Roundtrip { payload, cut } => roundtrip(&payload, cut),
        FuzzInput::Stream(payloads) => stream(&payloads),
        FuzzInput::Decode(data) => decode(&data),
    }
}

fuzz_target!(|input: FuzzInput| {
    fuzz(input);
});
