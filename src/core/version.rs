//! Build metadata shared across the application.
//! This includes the generated version.rs from the build script into a core module,
//! providing a single source of truth.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// VK API version sent with every request unless overridden on the command line
pub fn vk_api_version() -> &'static str {
    VK_API_VERSION
}

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Long version string for `--version`
pub fn long_version() -> String {
    format!(
        "{} (api {}, built {}, git {})",
        env!("CARGO_PKG_VERSION"),
        VK_API_VERSION,
        BUILD_TIME,
        GIT_HASH
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vk_api_version_is_populated() {
        assert!(!vk_api_version().is_empty());
        assert!(vk_api_version().contains('.'));
    }

    #[test]
    fn test_long_version_includes_metadata() {
        let version = long_version();
        assert!(version.starts_with(env!("CARGO_PKG_VERSION")));
        assert!(version.contains(git_hash()));
        assert!(version.contains(build_time()));
    }
}
