use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub const NONCE_LENGTH: usize = 40;

const NONCE_CHARSET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Source of request nonces, seeded once from OS entropy and owned by a verifier.
pub struct NonceGenerator {
    rng: Mutex<StdRng>,
}

impl NonceGenerator {
    pub fn new() -> Self {
        NonceGenerator {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// 40 characters drawn uniformly from `[0-9a-z]`.
    pub fn generate(&self) -> String {
        let mut rng = self.rng.lock();
        (0..NONCE_LENGTH)
            .map(|_| NONCE_CHARSET[rng.gen_range(0..NONCE_CHARSET.len())] as char)
            .collect()
    }
}

impl Default for NonceGenerator {
    fn default() -> Self {
        NonceGenerator::new()
    }
}
