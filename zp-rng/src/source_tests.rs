use crate::source::{reduce_be, BoundedSource, RandomStream, SEED_LEN};
use crate::RngError;

#[test]
fn same_seed_same_draws() {
    let mut a = RandomStream::from_seed(b"seed-1".to_vec());
    let mut b = RandomStream::from_seed(b"seed-1".to_vec());
    for n in [2u64, 3, 10, 1000, 32768, u64::MAX] {
        assert_eq!(a.draw(n).unwrap(), b.draw(n).unwrap());
    }
}

#[test]
fn different_seeds_diverge() {
    let mut a = RandomStream::from_seed(b"seed-1".to_vec());
    let mut b = RandomStream::from_seed(b"seed-2".to_vec());
    let xs: Vec<u64> = (0..16).map(|_| a.draw(u64::MAX).unwrap()).collect();
    let ys: Vec<u64> = (0..16).map(|_| b.draw(u64::MAX).unwrap()).collect();
    assert_ne!(xs, ys);
}

#[test]
fn counter_advances_once_per_draw() {
    let mut s = RandomStream::from_seed(vec![7u8; 4]);
    assert_eq!(s.draws(), 0);
    s.draw(10).unwrap();
    s.draw(10).unwrap();
    assert_eq!(s.draws(), 2);
}

#[test]
fn draw_of_one_is_zero_and_free() {
    let mut s = RandomStream::from_seed(vec![1u8]);
    for _ in 0..5 {
        assert_eq!(s.draw(1).unwrap(), 0);
    }
    assert_eq!(s.draws(), 0);
}

#[test]
fn draw_of_zero_fails_without_consuming() {
    let mut s = RandomStream::from_seed(vec![1u8]);
    assert_eq!(s.draw(0).unwrap_err(), RngError::ZeroModulus);
    assert_eq!(s.draws(), 0);
}

#[test]
fn draws_stay_in_range() {
    let mut s = RandomStream::from_seed(b"range".to_vec());
    for n in 2..200u64 {
        assert!(s.draw(n).unwrap() < n);
    }
}

#[test]
fn unseeded_streams_get_distinct_os_seeds() {
    let a = RandomStream::new(None);
    let b = RandomStream::new(None);
    assert_eq!(a.seed().len(), SEED_LEN);
    assert_ne!(a.seed(), b.seed());

    let c = RandomStream::new(Some(b"abc"));
    assert_eq!(c.seed(), b"abc");
}

#[test]
fn reduce_be_matches_native_arithmetic() {
    assert_eq!(reduce_be(&[1, 0], 7), 256 % 7);
    assert_eq!(reduce_be(&[], 7), 0);

    let bytes: [u8; 16] = [
        0xde, 0xad, 0xbe, 0xef, 0x01, 0x23, 0x45, 0x67, 0x89, 0xab, 0xcd, 0xef, 0xfe, 0xdc, 0xba,
        0x98,
    ];
    let x = u128::from_be_bytes(bytes);
    for n in [2u64, 3, 10, 32768, 1_000_000_007, u64::MAX] {
        assert_eq!(reduce_be(&bytes, n) as u128, x % n as u128);
    }
}

#[test]
fn draws_are_uniform() {
    // z-score per bucket; 3.72 corresponds to p = 0.0001.
    let mut s = RandomStream::from_seed(b"uniformity".to_vec());
    for &n in &[2u64, 7, 10] {
        let num_samples = 20_000u64;
        let mut counts = vec![0u64; n as usize];
        for _ in 0..num_samples {
            counts[s.draw(n).unwrap() as usize] += 1;
        }
        let p = 1.0 / n as f64;
        let expected = num_samples as f64 * p;
        let std_dev = (num_samples as f64 * p * (1.0 - p)).sqrt();
        for (bucket, &c) in counts.iter().enumerate() {
            let z = (c as f64 - expected) / std_dev;
            assert!(z.abs() < 3.72, "n={} bucket={} count={} z={}", n, bucket, c, z);
        }
    }
}
