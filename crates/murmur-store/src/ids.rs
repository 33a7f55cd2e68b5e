use rand::Rng;
use uuid::Uuid;

const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

fn random_suffix(len: usize) -> String {
    let mut rng = rand::rng();
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

pub fn user_id() -> String {
    Uuid::new_v4().to_string()
}

pub fn message_id() -> String {
    format!("msg_{}", random_suffix(12))
}

/// Only unique within the owning message.
pub fn reaction_id() -> String {
    format!("react_{}", random_suffix(10))
}
