// ABOUTME: Plugin, theme and starter catalogs built from npm keyword searches
// Results are merged and filtered, never re-ranked

use crate::models::PackageDescriptor;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    Plugins,
    Themes,
    Starters,
}

impl Catalog {
    pub fn keywords(&self) -> &'static [&'static str] {
        match self {
            Catalog::Plugins => &["gatsby-plugin", "gatsby-source", "gatsby-transformer"],
            Catalog::Themes => &["gatsby-theme"],
            Catalog::Starters => &["gatsby-starter"],
        }
    }
}

impl fmt::Display for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Catalog::Plugins => "plugins",
            Catalog::Themes => "themes",
            Catalog::Starters => "starters",
        };
        f.write_str(name)
    }
}

impl FromStr for Catalog {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "plugins" | "plugin" => Ok(Catalog::Plugins),
            "themes" | "theme" => Ok(Catalog::Themes),
            "starters" | "starter" => Ok(Catalog::Starters),
            other => Err(format!(
                "unknown catalog '{other}' (expected plugins, themes or starters)"
            )),
        }
    }
}

/// Strips an npm scope: `@acme/gatsby-plugin-x` -> `gatsby-plugin-x`.
pub fn unscoped_name(name: &str) -> &str {
    match name.strip_prefix('@') {
        Some(scoped) => scoped.split_once('/').map_or(name, |(_, rest)| rest),
        None => name,
    }
}

pub fn has_allowed_prefix(name: &str, keywords: &[&str]) -> bool {
    let name = unscoped_name(name);
    keywords.iter().any(|keyword| name.starts_with(keyword))
}

/// Merges per-keyword result pages into one list: first occurrence of a name
/// wins, packages without a repository or with an off-catalog name are dropped.
/// Registry order is preserved.
pub fn merge_results(
    pages: Vec<Vec<PackageDescriptor>>,
    keywords: &[&str],
) -> Vec<PackageDescriptor> {
    let mut seen = HashSet::new();
    pages
        .into_iter()
        .flatten()
        .filter(|pkg| seen.insert(pkg.name.clone()))
        .filter(|pkg| pkg.links.repository.is_some())
        .filter(|pkg| has_allowed_prefix(&pkg.name, keywords))
        .collect()
}
