//! Deterministic per-participant case order, guidance split and timing.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Participant id of the public demo; never timed.
pub const DEMO_UID: &str = "demo";

const SEED_MODULUS: u64 = 100_000_000;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct AssignmentPolicy {
    /// Participants who always get the countdown.
    #[serde(default)]
    pub always_timed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Assignment {
    pub seed: u64,
    /// Case indices in display order.
    pub order: Vec<usize>,
    /// Indexed by original case index.
    pub with_guidance: Vec<bool>,
    pub timed: bool,
}

/// SHA-256 of the id read as a big-endian integer, reduced modulo 10^8.
pub fn hash_uid(uid: &str) -> u64 {
    Sha256::digest(uid.as_bytes())
        .iter()
        .fold(0u64, |acc, byte| (acc * 256 + u64::from(*byte)) % SEED_MODULUS)
}

/// Every draw restarts from the same seed, so the guided half is the prefix
/// of the display order.
pub fn assign(uid: &str, case_count: usize, policy: &AssignmentPolicy) -> Assignment {
    let seed = hash_uid(uid);

    let mut order: Vec<usize> = (0..case_count).collect();
    order.shuffle(&mut StdRng::seed_from_u64(seed));

    let mut with_guidance = vec![false; case_count];
    for idx in order.iter().take(case_count / 2) {
        with_guidance[*idx] = true;
    }

    let mut timed = StdRng::seed_from_u64(seed).gen_range(0..2u8) == 1;
    if uid.eq_ignore_ascii_case(DEMO_UID) {
        timed = false;
    }
    if policy.always_timed.iter().any(|listed| listed == uid) {
        timed = true;
    }

    Assignment {
        seed,
        order,
        with_guidance,
        timed,
    }
}
