//! Usage: Hosting-provider domain types and REST client.

pub(crate) mod client;

pub use client::ProviderClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Public,
    Private,
}

impl Visibility {
    pub(crate) fn is_private(self) -> bool {
        matches!(self, Visibility::Private)
    }
}

/// The five selectable license keys, plus the explicit no-license choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LicenseChoice {
    Mit,
    Apache2,
    Gpl3,
    Unlicense,
    None,
}

impl LicenseChoice {
    pub const ALL: [LicenseChoice; 5] = [
        LicenseChoice::Mit,
        LicenseChoice::Apache2,
        LicenseChoice::Gpl3,
        LicenseChoice::Unlicense,
        LicenseChoice::None,
    ];

    /// Key understood by the provider's license endpoint; `None` for the
    /// no-license choice, which makes no network call.
    pub fn api_key(self) -> Option<&'static str> {
        match self {
            LicenseChoice::Mit => Some("mit"),
            LicenseChoice::Apache2 => Some("apache-2.0"),
            LicenseChoice::Gpl3 => Some("gpl-3.0"),
            LicenseChoice::Unlicense => Some("unlicense"),
            LicenseChoice::None => None,
        }
    }

    /// Human-readable name for the README.
    pub fn display_name(self) -> Option<&'static str> {
        match self {
            LicenseChoice::Mit => Some("MIT"),
            LicenseChoice::Apache2 => Some("Apache-2.0"),
            LicenseChoice::Gpl3 => Some("GPL-3.0"),
            LicenseChoice::Unlicense => Some("Unlicense"),
            LicenseChoice::None => None,
        }
    }

    pub(crate) fn prompt_key(self) -> &'static str {
        self.api_key().unwrap_or("none")
    }
}

/// The created remote repository. Immutable once created; the clone URL is
/// the canonical target for the "origin" remote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryDescriptor {
    pub name: String,
    pub visibility: Visibility,
    pub clone_url: String,
}
