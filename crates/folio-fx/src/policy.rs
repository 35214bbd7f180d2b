#![forbid(unsafe_code)]

//! Host-level effect policy (reduced motion, deterministic seed, particles).
//!
//! Decisions are deterministic given the environment lookup, so tests pass a
//! closure instead of touching process environment variables.

/// Environment variable forcing reduced motion (`1/0/true/false`).
pub const ENV_REDUCED_MOTION: &str = "FOLIO_REDUCED_MOTION";
/// Environment variable pinning the random seed (`u64`).
pub const ENV_FX_SEED: &str = "FOLIO_FX_SEED";
/// Environment variable enabling or disabling the particle field (`1/0/true/false`).
pub const ENV_PARTICLES: &str = "FOLIO_PARTICLES";

const DEFAULT_SEED: u64 = 0x5EED_F0_11_0F_0C05;

/// Effect policy shared by all engines on a page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FxPolicy {
    /// Skip animation: scrambles reveal instantly, highlights snap, particles
    /// render one static frame.
    pub reduced_motion: bool,
    /// Seed for every random source created under this policy.
    pub seed: u64,
    /// Whether the particle field may activate at all.
    pub particles: bool,
}

impl Default for FxPolicy {
    fn default() -> Self {
        Self {
            reduced_motion: false,
            seed: DEFAULT_SEED,
            particles: true,
        }
    }
}

impl FxPolicy {
    /// Detect policy from process environment variables.
    #[must_use]
    pub fn detect() -> Self {
        Self::from_env_with(|key| std::env::var(key).ok())
    }

    /// Detect policy using a custom environment lookup (for tests and hosts
    /// that read `prefers-reduced-motion` themselves).
    #[must_use]
    pub fn from_env_with<F>(get_env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut policy = Self::default();
        if let Some(value) = env_bool(&get_env, ENV_REDUCED_MOTION) {
            policy.reduced_motion = value;
        }
        if let Some(seed) = get_env(ENV_FX_SEED).and_then(|raw| raw.trim().parse::<u64>().ok()) {
            policy.seed = seed;
        }
        if let Some(value) = env_bool(&get_env, ENV_PARTICLES) {
            policy.particles = value;
        }
        policy
    }

    /// Derive a per-instance seed so sibling engines do not share a stream.
    #[must_use]
    pub fn seed_for(&self, instance: u32) -> u64 {
        self.seed ^ (u64::from(instance).wrapping_add(1)).wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }
}

fn env_bool<F>(get_env: &F, key: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let value = get_env(key)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
