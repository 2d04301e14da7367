// ABOUTME: Filesystem workspace inspection
// Decides whether the workspace root already holds a Gatsby site

use crate::host::WorkspaceInspector;
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::debug;

const CONFIG_FILES: &[&str] = &[
    "gatsby-config.js",
    "gatsby-config.ts",
    "gatsby-config.mjs",
    "gatsby-config.cjs",
];

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PackageManifest {
    #[serde(default)]
    dependencies: HashMap<String, String>,
    #[serde(default)]
    dev_dependencies: HashMap<String, String>,
}

pub struct FsWorkspace {
    root: Option<PathBuf>,
}

impl FsWorkspace {
    pub fn new(root: Option<PathBuf>) -> Self {
        Self { root }
    }
}

impl WorkspaceInspector for FsWorkspace {
    fn is_initialized_project(&self) -> bool {
        self.root.as_deref().is_some_and(is_gatsby_site)
    }

    fn root_path(&self) -> Option<PathBuf> {
        self.root.clone()
    }
}

/// A directory is a Gatsby site when it has a gatsby config file or lists
/// `gatsby` as a dependency in its package.json.
pub fn is_gatsby_site(root: &Path) -> bool {
    if CONFIG_FILES.iter().any(|file| root.join(file).is_file()) {
        return true;
    }

    let manifest_path = root.join("package.json");
    let Ok(content) = std::fs::read_to_string(&manifest_path) else {
        return false;
    };

    match serde_json::from_str::<PackageManifest>(&content) {
        Ok(manifest) => {
            manifest.dependencies.contains_key("gatsby")
                || manifest.dev_dependencies.contains_key("gatsby")
        }
        Err(e) => {
            debug!("Ignoring unreadable {}: {}", manifest_path.display(), e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_empty_dir_is_not_a_site() {
        let dir = TempDir::new().unwrap();
        let workspace = FsWorkspace::new(Some(dir.path().to_path_buf()));
        assert!(!workspace.is_initialized_project());
        assert_eq!(workspace.root_path().as_deref(), Some(dir.path()));
    }

    #[test]
    fn test_config_file_marks_site() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("gatsby-config.ts"), "export default {}").unwrap();
        assert!(is_gatsby_site(dir.path()));
    }

    #[test]
    fn test_package_json_dependency_marks_site() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "blog", "dependencies": {"gatsby": "^5.13.0", "react": "^18"}}"#,
        )
        .unwrap();
        assert!(is_gatsby_site(dir.path()));
    }

    #[test]
    fn test_unrelated_package_json_is_not_a_site() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("package.json"),
            r#"{"name": "api", "devDependencies": {"typescript": "^5"}}"#,
        )
        .unwrap();
        assert!(!is_gatsby_site(dir.path()));

        fs::write(dir.path().join("package.json"), "{ not json").unwrap();
        assert!(!is_gatsby_site(dir.path()));
    }

    #[test]
    fn test_no_root() {
        let workspace = FsWorkspace::new(None);
        assert!(!workspace.is_initialized_project());
        assert!(workspace.root_path().is_none());
    }
}
