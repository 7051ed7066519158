//! Built-in resource pools that never leave the source environment.

/// Pool names the platform creates on its own: the cluster's implicit root
/// pool and the cluster-services pool.
pub const RESERVED_POOL_NAMES: [&str; 2] = ["Resources", "vCLS"];

pub fn is_reserved_pool_name(name: &str) -> bool {
    RESERVED_POOL_NAMES.contains(&name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_names_match_exactly() {
        assert!(is_reserved_pool_name("Resources"));
        assert!(is_reserved_pool_name("vCLS"));
        assert!(!is_reserved_pool_name("resources"));
        assert!(!is_reserved_pool_name("vCLS-prod"));
    }
}
