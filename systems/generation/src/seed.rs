use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use sha2::{Digest, Sha256};

/// Derives an independent random stream for `label` from a match seed.
///
/// Streams with different labels never share state, so the generator, the
/// world's jittered operators, and any adapter can each draw from their own
/// stream while the match as a whole stays reproducible from one seed.
#[must_use]
pub fn seed_stream(match_seed: u64, label: &str) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(derive_labeled_seed(match_seed, label))
}

fn derive_labeled_seed(base: u64, label: &str) -> u64 {
    let mut hasher = Sha256::new();
    hasher.update(base.to_le_bytes());
    hasher.update(label.as_bytes());
    let digest = hasher.finalize();
    let mut bytes = [0_u8; 8];
    bytes.copy_from_slice(&digest[..8]);
    u64::from_le_bytes(bytes)
}
