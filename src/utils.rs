#[inline]
pub(crate) fn load_u32_le(bytes: &[u8]) -> u32 {
    (bytes[0] as u32) | (bytes[1] as u32) << 8 | (bytes[2] as u32) << 16 | (bytes[3] as u32) << 24
}

#[inline]
pub(crate) fn rotr32(x: u32, b: u32) -> u32 {
    (x >> b) | (x << (32 - b))
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub(crate) fn bytes_for_bits(bits: u64) -> usize {
    ((bits + 7) / 8) as usize
}

/// Writes `value` big-endian into `out`, left-padded with zeros. Returns
/// false, leaving `out` zeroed, if the value doesn't fit.
pub(crate) fn copy_be_padded(out: &mut [u8], value: &[u8]) -> bool {
    let start = value.iter().position(|&b| b != 0).unwrap_or(value.len());
    let value = &value[start..];
    out.fill(0);
    if value.len() > out.len() {
        return false;
    }
    let offset = out.len() - value.len();
    out[offset..].copy_from_slice(value);
    true
}
