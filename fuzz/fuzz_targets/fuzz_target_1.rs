#![no_main]
use libfuzzer_sys::fuzz_target;

use hcdh::hc256::Hc256;

fuzz_target!(|data: &[u8]| {
    if data.len() < 65 {
        return;
    }
    let (key, rest) = data.split_at(32);
    let (nonce, rest) = rest.split_at(32);
    let (split, message) = (rest[0] as usize, &rest[1..]);

    let mut expected = vec![0u8; message.len()];
    Hc256::from_slices(key, nonce)
        .expect("sizes are fixed")
        .xor_keystream(&mut expected, message);

    let mut cipher = Hc256::from_slices(key, nonce).expect("sizes are fixed");
    let mut chunked = vec![0u8; message.len()];
    let mut at = 0;
    while at < message.len() {
        let end = std::cmp::min(at + split + 1, message.len());
        cipher.xor_keystream(&mut chunked[at..end], &message[at..]);
        at = end;
    }
    assert_eq!(chunked, expected);

    let mut roundtrip = expected.clone();
    Hc256::from_slices(key, nonce)
        .expect("sizes are fixed")
        .apply_keystream(&mut roundtrip);
    assert_eq!(roundtrip, message);
});
