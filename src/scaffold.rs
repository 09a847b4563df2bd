//! Usage: README.md and LICENSE file writers (pure formatting, no network).

use crate::provider::LicenseChoice;
use crate::shared::error::AppResult;
use std::path::Path;

pub fn render_readme(name: &str, license: LicenseChoice) -> String {
    match license.display_name() {
        Some(label) => {
            format!("# {name}\n\nThis project is licensed under the {label} license.\n")
        }
        None => format!("# {name}\n"),
    }
}

pub fn write_readme(dir: &Path, name: &str, license: LicenseChoice) -> AppResult<()> {
    std::fs::write(dir.join("README.md"), render_readme(name, license))?;
    Ok(())
}

/// Written only when a license other than `none` was chosen; the caller has
/// already fetched `text` from the provider.
pub fn write_license(dir: &Path, text: &str) -> AppResult<()> {
    std::fs::write(dir.join("LICENSE"), text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn readme_mentions_name_and_license() {
        let readme = render_readme("demo", LicenseChoice::Mit);
        assert!(readme.contains("# demo"));
        assert!(readme.contains("MIT license"));
    }

    #[test]
    fn readme_without_license_has_no_license_line() {
        let readme = render_readme("demo", LicenseChoice::None);
        assert_eq!(readme, "# demo\n");
    }

    #[test]
    fn files_land_in_the_target_directory() {
        let dir = tempfile::tempdir().expect("tempdir");
        write_readme(dir.path(), "demo", LicenseChoice::Apache2).expect("readme");
        write_license(dir.path(), "Apache License\n").expect("license");
        let readme = std::fs::read_to_string(dir.path().join("README.md")).expect("read");
        assert!(readme.contains("Apache-2.0"));
        let license = std::fs::read_to_string(dir.path().join("LICENSE")).expect("read");
        assert!(license.starts_with("Apache License"));
    }
}
