//! Build metadata embedded by `build.rs`.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, Copy)]
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub built_on: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
}

pub fn current() -> BuildInfo {
    BuildInfo {
        version: VERSION,
        git_hash: env!("TUTOR_CORE_BUILD_HASH"),
        built_on: env!("TUTOR_CORE_BUILD_DATE"),
        target: env!("TUTOR_CORE_BUILD_TARGET"),
        profile: env!("TUTOR_CORE_BUILD_PROFILE"),
    }
}

#[cfg(test)]
mod tests {
    #[test]
    fn metadata_is_populated() {
        let info = super::current();
        assert!(!info.version.is_empty());
        assert!(!info.git_hash.is_empty());
        assert_eq!(info.built_on.len(), 10);
    }
}
