//! Process-wide tuning knobs, read once from the environment.

use std::sync::OnceLock;

/// Default smallest version whose mask trials are scored in parallel.
pub const DEFAULT_PARALLEL_MASK_MIN_VERSION: u8 = 10;

fn parse_env_u8(name: &str, default: u8) -> u8 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u8>().ok())
        .unwrap_or(default)
}

static PARALLEL_MASK_MIN_VERSION: OnceLock<u8> = OnceLock::new();

/// Versions at or above this score their eight mask candidates on the rayon pool.
///
/// Set `QRSMITH_PARALLEL_MASK_MIN_VERSION=0` to always go parallel, or any value
/// above 40 to never do so.
pub fn parallel_mask_min_version() -> u8 {
    *PARALLEL_MASK_MIN_VERSION.get_or_init(|| {
        parse_env_u8(
            "QRSMITH_PARALLEL_MASK_MIN_VERSION",
            DEFAULT_PARALLEL_MASK_MIN_VERSION,
        )
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_env_falls_back_on_missing_or_garbage() {
        assert_eq!(parse_env_u8("QRSMITH_TEST_UNSET_VARIABLE", 7), 7);
        std::env::set_var("QRSMITH_TEST_GARBAGE_VARIABLE", "many");
        assert_eq!(parse_env_u8("QRSMITH_TEST_GARBAGE_VARIABLE", 3), 3);
        std::env::set_var("QRSMITH_TEST_PADDED_VARIABLE", " 12 ");
        assert_eq!(parse_env_u8("QRSMITH_TEST_PADDED_VARIABLE", 3), 12);
    }
}
