#![no_main]

use libfuzzer_sys::fuzz_target;

use fftconv_core::FactorSet;

fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let minimum = usize::from(u16::from_le_bytes([data[0], data[1]])) + 1;
    let factors: Vec<usize> = data[2..].iter().take(6).map(|&b| usize::from(b % 16)).collect();
    let Ok(set) = FactorSet::new(factors) else {
        return;
    };

    let size = set.closest_size(minimum).unwrap();
    assert!(size >= minimum);
    assert!(set.is_factorable(size));
    assert!((minimum..size).all(|n| !set.is_factorable(n)));
});
