//! Order and inquiry reference codes.

use rand::Rng;

/// Characters used in reference codes; omits look-alikes such as `0`/`O`.
const REFERENCE_ALPHABET: &[u8] = b"ABCDEFGHJKLMNPQRSTUVWXYZ23456789";

/// Number of random characters after the prefix.
pub const REFERENCE_CODE_LEN: usize = 8;

/// Generate `<prefix>-<code>` using `rng`.
pub fn generate<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    let code: String = (0..REFERENCE_CODE_LEN)
        .filter_map(|_| {
            REFERENCE_ALPHABET
                .get(rng.gen_range(0..REFERENCE_ALPHABET.len()))
                .copied()
                .map(char::from)
        })
        .collect();

    format!("{prefix}-{code}")
}
