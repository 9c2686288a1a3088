use arrayref::array_refs;

/// Reduces a 256-bit random word, read big-endian, modulo `len`.
///
/// The word is folded one 64-bit limb at a time so the result is exactly
/// `word mod len` without needing a 256-bit integer type.
pub fn winner_index(word: &[u8; 32], len: usize) -> Option<usize> {
    if len == 0 {
        return None;
    }

    let modulus = len as u128;
    let (a, b, c, d) = array_refs![word, 8, 8, 8, 8];
    let remainder = [a, b, c, d].iter().fold(0u128, |acc, limb| {
        ((acc << 64) | u64::from_be_bytes(**limb) as u128) % modulus
    });

    Some(remainder as usize)
}

/// Encodes a `u64` as a 256-bit big-endian word.
#[cfg(test)]
pub(crate) fn word_from_u64(value: u64) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&value.to_be_bytes());
    word
}
