//! Usage: Security-sensitive helpers (token masking and constant-time equality).

use subtle::ConstantTimeEq;

const MASK_PREFIX_LEN: usize = 4;
const MASK_SUFFIX_LEN: usize = 4;

/// Redact an access token for log output, keeping a short prefix/suffix so
/// distinct tokens stay distinguishable in diagnostics.
pub(crate) fn mask_token(token: &str) -> String {
    let trimmed = token.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    if trimmed.len() <= MASK_PREFIX_LEN + MASK_SUFFIX_LEN {
        return "*".repeat(trimmed.len().min(8));
    }
    format!(
        "{}...{}",
        &trimmed[..MASK_PREFIX_LEN],
        &trimmed[trimmed.len() - MASK_SUFFIX_LEN..]
    )
}

pub(crate) fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}
