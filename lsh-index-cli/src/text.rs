use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Token padding both ends of a text, so that edge words form shingles too.
const BOUNDARY: &str = "";

/// Converts texts into features of hashed word shingles.
#[derive(Clone, Copy, Debug)]
pub struct TextFeaturizer {
    window_size: usize,
    seed: u64,
}

impl TextFeaturizer {
    pub fn new(window_size: usize, seed: u64) -> Result<Self, &'static str> {
        if window_size == 0 {
            return Err("window_size must not be 0.");
        }
        Ok(Self { window_size, seed })
    }

    /// Extracts the features of whitespace-separated word shingles into `feature`.
    pub fn extract(&self, text: &str, feature: &mut Vec<i32>) {
        feature.clear();
        let mut tokens = vec![BOUNDARY; self.window_size - 1];
        tokens.extend(text.split_whitespace());
        if tokens.len() < self.window_size {
            return;
        }
        tokens.extend(std::iter::repeat(BOUNDARY).take(self.window_size - 1));
        feature.extend(tokens.windows(self.window_size).map(|w| self.hash(w)));
    }

    fn hash(&self, shingle: &[&str]) -> i32 {
        let mut s = DefaultHasher::new();
        self.seed.hash(&mut s);
        shingle.hash(&mut s);
        let h = s.finish();
        (h ^ (h >> 32)) as i32
    }
}
