// ── Software version gate ──
//
// Older appliance firmware lacks the JSON play API. A device is accepted if
// its packed version reaches the primary minimum, or if it reaches the
// alternate minimum and its version string carries the alternate build tag.

use argo_api::version::pack_default;

/// Default primary minimum version.
pub const DEFAULT_MINIMUM_VERSION: &str = "1.66.2";

/// Default alternate minimum version for tagged builds.
pub const DEFAULT_ALTERNATE_MINIMUM_VERSION: &str = "1.64.10";

/// Default build tag unlocking the alternate minimum.
pub const DEFAULT_ALTERNATE_BUILD_TAG: &str = ".PH.";

/// Minimum supported software versions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionPolicy {
    minimum: String,
    alternate_minimum: String,
    alternate_build_tag: String,
    minimum_packed: u64,
    alternate_minimum_packed: u64,
}

impl VersionPolicy {
    /// Build a policy from version strings; thresholds are packed once here.
    pub fn new(
        minimum: impl Into<String>,
        alternate_minimum: impl Into<String>,
        alternate_build_tag: impl Into<String>,
    ) -> Self {
        let minimum = minimum.into();
        let alternate_minimum = alternate_minimum.into();
        Self {
            minimum_packed: pack_default(&minimum),
            alternate_minimum_packed: pack_default(&alternate_minimum),
            minimum,
            alternate_minimum,
            alternate_build_tag: alternate_build_tag.into(),
        }
    }

    pub fn minimum(&self) -> &str {
        &self.minimum
    }

    pub fn alternate_minimum(&self) -> &str {
        &self.alternate_minimum
    }

    pub fn alternate_build_tag(&self) -> &str {
        &self.alternate_build_tag
    }

    /// Whether a device reporting `version` is supported.
    pub fn is_supported(&self, version: &str) -> bool {
        let packed = pack_default(version);
        packed >= self.minimum_packed
            || (packed >= self.alternate_minimum_packed
                && !self.alternate_build_tag.is_empty()
                && version.contains(&self.alternate_build_tag))
    }
}

impl Default for VersionPolicy {
    fn default() -> Self {
        Self::new(
            DEFAULT_MINIMUM_VERSION,
            DEFAULT_ALTERNATE_MINIMUM_VERSION,
            DEFAULT_ALTERNATE_BUILD_TAG,
        )
    }
}
