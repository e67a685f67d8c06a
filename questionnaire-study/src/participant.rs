//! Participant identifiers issued from an email address.

use rand_mt::Mt;
use sha2::{Digest, Sha512};
use uuid::{Builder, Uuid};

/// SHA-512 hex digest of a salt followed by the lower-cased email.
///
/// The salt is a version 4 UUID built from 128 bits of an MT19937 stream
/// seeded with the sum of the email's code points, so the same address
/// always gets the same identifier.
pub fn participant_uid(email: &str) -> String {
    let email = email.to_lowercase();
    let salt = email_salt(&email);
    let digest = Sha512::digest(format!("{salt}{email}").as_bytes());
    format!("{digest:x}")
}

fn email_salt(email: &str) -> Uuid {
    let seed: u64 = email.chars().map(u64::from).sum();
    let mut rng = Mt::new_with_key(seed_key(seed));
    let bits = (0..4).fold(0u128, |acc, word| {
        acc | (u128::from(rng.next_u32()) << (32 * word))
    });
    Builder::from_random_bytes(bits.to_be_bytes()).into_uuid()
}

/// Seed split into 32-bit words, least significant first.
fn seed_key(seed: u64) -> Vec<u32> {
    let mut key = vec![seed as u32];
    let mut rest = seed >> 32;
    while rest > 0 {
        key.push(rest as u32);
        rest >>= 32;
    }
    key
}
