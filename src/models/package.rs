// ABOUTME: Package metadata model for npm registry documents (plugins, themes, starters)

use serde::{Deserialize, Serialize};

/// Links published alongside an npm package.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageLinks {
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub homepage: Option<String>,
    #[serde(default)]
    pub npm: Option<String>,
}

impl PackageLinks {
    pub fn new(repository: Option<String>, homepage: Option<String>) -> Self {
        Self {
            repository,
            homepage,
            npm: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.repository.is_none() && self.homepage.is_none() && self.npm.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageDescriptor {
    pub name: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub links: PackageLinks,
}

impl PackageDescriptor {
    pub fn is_theme(&self) -> bool {
        is_theme_name(&self.name)
    }
}

/// Themes are published under the `gatsby-theme` prefix.
pub fn is_theme_name(name: &str) -> bool {
    name.starts_with("gatsby-theme")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_links_deserialize_with_missing_fields() {
        let links: PackageLinks =
            serde_json::from_str(r#"{"repository": "https://github.com/a/b"}"#).unwrap();
        assert_eq!(links.repository.as_deref(), Some("https://github.com/a/b"));
        assert!(links.homepage.is_none());
        assert!(!links.is_empty());
        assert!(PackageLinks::default().is_empty());
    }

    #[test]
    fn test_theme_detection() {
        assert!(is_theme_name("gatsby-theme-blog"));
        assert!(!is_theme_name("gatsby-plugin-sharp"));
    }
}
