pub(crate) const MAX_ATTEMPTS: u32 = 3;

const BASE_DELAY_MS: u64 = 250;
const MAX_DELAY_MS: u64 = 2_000;

pub(crate) fn should_retry(attempt: u32) -> bool {
    attempt < MAX_ATTEMPTS
}

/// Deterministic capped exponential backoff. Jitter is derived from a hash
/// of the operation and attempt so repeated runs are reproducible.
pub(crate) fn backoff_ms(operation: &str, attempt: u32) -> u64 {
    let capped_exp = attempt.saturating_sub(1).min(4);
    let baseline = (BASE_DELAY_MS << capped_exp).min(MAX_DELAY_MS);
    let jitter_bound = (baseline / 4).max(1);

    let seed = format!("{operation}:{attempt}");
    let hash = blake3::hash(seed.as_bytes());
    let bytes = hash.as_bytes();
    let rand = u64::from(u16::from_be_bytes([bytes[0], bytes[1]]));
    let jitter = rand % (jitter_bound + 1);

    (baseline + jitter).min(MAX_DELAY_MS)
}
