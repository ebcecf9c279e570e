use criterion::{black_box, criterion_group, Criterion};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serdegen_codec::cobs;

fn bench_cobs(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0);
    for size in [64, 1024, 16 * 1024] {
        // Roughly one zero every 32 bytes.
        let payload: Vec<u8> = (0..size)
            .map(|_| if rng.gen_ratio(1, 32) { 0 } else { rng.gen_range(1..=255) })
            .collect();
        let frame = cobs::encode(&payload);

        c.bench_function(&format!("{}/encode len={}", module_path!(), size), |b| {
            b.iter(|| cobs::encode(black_box(&payload)));
        });
        c.bench_function(&format!("{}/decode len={}", module_path!(), size), |b| {
            let mut output = vec![0u8; frame.len()];
            b.iter(|| cobs::decode_into(black_box(&frame), &mut output).unwrap());
        });
    }
}

criterion_group!(benches, bench_cobs);
