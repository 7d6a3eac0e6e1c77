//! Platform suffixes and the asset names derived from them
//!
//! Releases built with goreleaser-style naming ship one archive per platform:
//! `<app>_<version>_<os>_<arch>.tar.gz`.

use std::fmt;

/// Archive extension every platform asset carries.
pub const ARCHIVE_EXTENSION: &str = ".tar.gz";

/// Target platforms a recipe may declare a download for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    DarwinAmd64,
    DarwinArm64,
    Linux386,
    LinuxAmd64,
    LinuxArm64,
    LinuxArmv7l,
}

impl Platform {
    /// Every platform, in patching order.
    pub const ALL: [Platform; 6] = [
        Self::DarwinAmd64,
        Self::DarwinArm64,
        Self::Linux386,
        Self::LinuxAmd64,
        Self::LinuxArm64,
        Self::LinuxArmv7l,
    ];

    /// The `<os>_<arch>` token used in asset names.
    pub fn suffix(&self) -> &'static str {
        match self {
            Self::DarwinAmd64 => "darwin_amd64",
            Self::DarwinArm64 => "darwin_arm64",
            Self::Linux386 => "linux_386",
            Self::LinuxAmd64 => "linux_amd64",
            Self::LinuxArm64 => "linux_arm64",
            Self::LinuxArmv7l => "linux_armv7l",
        }
    }

    /// Expected asset name, e.g. `devbox_0.16.0_darwin_arm64.tar.gz`.
    pub fn asset_filename(&self, app_name: &str, version: &str) -> String {
        format!("{}_{}_{}{}", app_name, version, self.suffix(), ARCHIVE_EXTENSION)
    }

    /// Whether `filename` is this platform's archive (`..._<suffix>.tar.gz`).
    pub fn matches(&self, filename: &str) -> bool {
        filename
            .strip_suffix(ARCHIVE_EXTENSION)
            .and_then(|stem| stem.strip_suffix(self.suffix()))
            .is_some_and(|rest| rest.ends_with('_'))
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.suffix())
    }
}
