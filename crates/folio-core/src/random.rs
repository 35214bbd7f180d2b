#![forbid(unsafe_code)]

//! Injectable randomness.
//!
//! Engines draw random numbers only through these traits so tests can pin a
//! seed or script the exact glyph sequence.

/// Source of uniformly distributed numbers.
pub trait RandomSource {
    /// Next raw 64-bit value.
    fn next_u64(&mut self) -> u64;

    /// Uniform value in `[0, 1)`.
    fn next_f64(&mut self) -> f64 {
        // 53 high bits -> exact f64 mantissa.
        (self.next_u64() >> 11) as f64 * (1.0 / (1u64 << 53) as f64)
    }

    /// Uniform value in `[lo, hi)`; returns `lo` if the range is empty.
    fn range_f64(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64()
    }

    /// Uniform index in `[0, len)`; `None` when `len == 0`.
    fn below(&mut self, len: usize) -> Option<usize> {
        if len == 0 {
            return None;
        }
        Some((self.next_f64() * len as f64) as usize % len)
    }
}

/// Source of substitute glyphs for scramble animations.
pub trait GlyphSource {
    /// Draw one glyph from `alphabet`; `None` if nothing can be drawn.
    fn next_glyph(&mut self, alphabet: &[char]) -> Option<char>;
}

/// Seeded xorshift64* generator. Deterministic for a given seed.
#[derive(Debug, Clone)]
pub struct SeededRandom {
    state: u64,
}

impl SeededRandom {
    const FALLBACK_SEED: u64 = 0x9E37_79B9_7F4A_7C15;

    /// Create a generator. A zero seed is replaced, since xorshift would
    /// otherwise stay at zero forever.
    #[must_use]
    pub const fn new(seed: u64) -> Self {
        Self {
            state: if seed == 0 { Self::FALLBACK_SEED } else { seed },
        }
    }
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(Self::FALLBACK_SEED)
    }
}

impl RandomSource for SeededRandom {
    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x >> 12;
        x ^= x << 25;
        x ^= x >> 27;
        self.state = x;
        x.wrapping_mul(0x2545_F491_4F6C_DD1D)
    }
}

impl GlyphSource for SeededRandom {
    fn next_glyph(&mut self, alphabet: &[char]) -> Option<char> {
        let idx = self.below(alphabet.len())?;
        alphabet.get(idx).copied()
    }
}

/// Replays a fixed glyph script in a loop, ignoring the alphabet.
#[derive(Debug, Clone)]
pub struct ScriptedGlyphs {
    script: Vec<char>,
    cursor: usize,
}

impl ScriptedGlyphs {
    #[must_use]
    pub fn new(script: impl IntoIterator<Item = char>) -> Self {
        Self {
            script: script.into_iter().collect(),
            cursor: 0,
        }
    }

    /// Number of glyphs handed out so far.
    #[must_use]
    pub fn drawn(&self) -> usize {
        self.cursor
    }
}

impl GlyphSource for ScriptedGlyphs {
    fn next_glyph(&mut self, _alphabet: &[char]) -> Option<char> {
        if self.script.is_empty() {
            return None;
        }
        let glyph = self.script[self.cursor % self.script.len()];
        self.cursor += 1;
        Some(glyph)
    }
}
