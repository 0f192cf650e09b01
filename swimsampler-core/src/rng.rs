//! Deterministic RNG derivation.
//!
//! A single master seed expands into independent sub-seeds for each sampling
//! site — team selection within a division, swimmer sampling within a team.
//! Derivation is BLAKE3 hash based rather than sequential, so the streams a
//! site sees do not depend on how many draws earlier sites made or on the
//! order divisions are processed in. No ambient global RNG state anywhere.

use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::domain::TeamId;

/// Seed hierarchy rooted at the run's master seed.
#[derive(Debug, Clone, Copy)]
pub struct RngHierarchy {
    master_seed: u64,
}

impl RngHierarchy {
    pub fn new(master_seed: u64) -> Self {
        Self { master_seed }
    }

    pub fn master_seed(&self) -> u64 {
        self.master_seed
    }

    /// Derive the sub-seed for a `(stage, key)` site.
    ///
    /// The NUL separator keeps `("ab", "c")` and `("a", "bc")` distinct.
    fn sub_seed(&self, stage: &str, key: &str) -> u64 {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.master_seed.to_le_bytes());
        hasher.update(stage.as_bytes());
        hasher.update(&[0]);
        hasher.update(key.as_bytes());
        let hash = hasher.finalize();
        u64::from_le_bytes(hash.as_bytes()[..8].try_into().expect("hash is 32 bytes"))
    }

    /// RNG for choosing which teams of a division to sample from.
    pub fn team_selection(&self, division: &str) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed("team-selection", division))
    }

    /// RNG for drawing swimmers from one team's roster.
    pub fn roster_sampling(&self, team: TeamId) -> StdRng {
        StdRng::seed_from_u64(self.sub_seed("roster-sampling", &team.to_string()))
    }
}
