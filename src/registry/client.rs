// ABOUTME: npm registry client: package documents, keyword searches and README install hints

use super::catalog::{merge_results, Catalog};
use super::hint::{extract_install_command, normalize_repository_url, readme_url};
use crate::config::RegistryConfig;
use crate::host::InstallHintSource;
use crate::models::{PackageDescriptor, PackageLinks};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const SEARCH_PAGE_SIZE: usize = 250;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Package not found: {0}")]
    NotFound(String),
    #[error("Registry returned {status} for {url}")]
    Status { status: StatusCode, url: String },
}

/// `repository` is either a bare string or `{ type, url, directory }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RepositoryField {
    Url(String),
    Detailed {
        url: String,
        #[serde(default)]
        directory: Option<String>,
    },
}

impl RepositoryField {
    fn to_link(&self) -> String {
        match self {
            RepositoryField::Url(url) => normalize_repository_url(url),
            RepositoryField::Detailed { url, directory } => {
                let base = normalize_repository_url(url);
                match directory.as_deref().map(|d| d.trim_matches('/')) {
                    Some(dir) if !dir.is_empty() && base.contains("github.com") => {
                        format!("{base}/tree/HEAD/{dir}")
                    }
                    _ => base,
                }
            }
        }
    }
}

#[derive(Debug, Deserialize)]
struct PackageDocument {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(rename = "dist-tags", default)]
    dist_tags: HashMap<String, String>,
    #[serde(default)]
    homepage: Option<String>,
    #[serde(default)]
    repository: Option<RepositoryField>,
    #[serde(default)]
    readme: Option<String>,
}

impl PackageDocument {
    fn into_descriptor(self) -> PackageDescriptor {
        let npm = Some(format!("https://www.npmjs.com/package/{}", self.name));
        PackageDescriptor {
            version: self.dist_tags.get("latest").cloned().unwrap_or_default(),
            description: self.description,
            links: PackageLinks {
                repository: self.repository.as_ref().map(RepositoryField::to_link),
                homepage: self.homepage,
                npm,
            },
            name: self.name,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    objects: Vec<SearchObject>,
}

#[derive(Debug, Deserialize)]
struct SearchObject {
    package: PackageDescriptor,
}

/// A package document plus its README, when the registry carries one.
#[derive(Debug, Clone)]
pub struct PackageDetails {
    pub package: PackageDescriptor,
    pub readme: Option<String>,
}

pub struct NpmRegistry {
    client: Client,
    base_url: String,
}

impl NpmRegistry {
    pub fn new(config: &RegistryConfig) -> Result<Self, RegistryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("gatsby-hub/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            base_url: config.url.trim_end_matches('/').to_string(),
        })
    }

    /// Scoped names keep their `@` but the slash must be escaped.
    fn package_url(&self, name: &str) -> String {
        format!("{}/{}", self.base_url, name.replace('/', "%2F"))
    }

    pub async fn fetch_package(&self, name: &str) -> Result<PackageDetails, RegistryError> {
        let url = self.package_url(name);
        debug!("Fetching package document {}", url);

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => return Err(RegistryError::NotFound(name.to_string())),
            status if !status.is_success() => return Err(RegistryError::Status { status, url }),
            _ => {}
        }

        let mut document: PackageDocument = response.json().await?;
        let readme = document.readme.take().filter(|r| !r.trim().is_empty());
        Ok(PackageDetails {
            package: document.into_descriptor(),
            readme,
        })
    }

    pub async fn search_keyword(&self, keyword: &str) -> Result<Vec<PackageDescriptor>, RegistryError> {
        let url = format!("{}/-/v1/search", self.base_url);
        let text = format!("keywords:{keyword} not:deprecated");
        let size = SEARCH_PAGE_SIZE.to_string();

        let response = self
            .client
            .get(&url)
            .query(&[("text", text.as_str()), ("size", size.as_str())])
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(RegistryError::Status {
                status: response.status(),
                url,
            });
        }

        let body: SearchResponse = response.json().await?;
        Ok(body.objects.into_iter().map(|o| o.package).collect())
    }

    pub async fn list(&self, catalog: Catalog) -> Result<Vec<PackageDescriptor>, RegistryError> {
        let keywords = catalog.keywords();
        let mut pages = Vec::with_capacity(keywords.len());
        for keyword in keywords {
            pages.push(self.search_keyword(keyword).await?);
        }

        let merged = merge_results(pages, keywords);
        info!("Listed {} {}", merged.len(), catalog);
        Ok(merged)
    }

    async fn fetch_text(&self, url: &str) -> Result<Option<String>, RegistryError> {
        let response = self.client.get(url).send().await?;
        if !response.status().is_success() {
            debug!("No document at {} ({})", url, response.status());
            return Ok(None);
        }
        Ok(Some(response.text().await?))
    }
}

#[async_trait]
impl InstallHintSource for NpmRegistry {
    /// Homepage first: for monorepo packages it points at the package folder,
    /// the repository link often only at the repo root.
    async fn resolve_install_hint(&self, links: &PackageLinks) -> Option<String> {
        if links.is_empty() {
            return None;
        }
        let candidates = [links.homepage.as_deref(), links.repository.as_deref()];

        for link in candidates.into_iter().flatten() {
            let Some(url) = readme_url(link) else {
                continue;
            };
            match self.fetch_text(&url).await {
                Ok(Some(readme)) => {
                    if let Some(command) = extract_install_command(&readme) {
                        return Some(command);
                    }
                }
                Ok(None) => {}
                Err(e) => warn!("Could not read {}: {}", url, e),
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_package_document_with_detailed_repository() {
        let json = r#"{
            "name": "gatsby-plugin-sharp",
            "description": "Wrapper of the Sharp image manipulation library for Gatsby plugins",
            "dist-tags": {"latest": "5.13.1", "next": "5.14.0-next.0"},
            "homepage": "https://github.com/gatsbyjs/gatsby/tree/master/packages/gatsby-plugin-sharp#readme",
            "repository": {"type": "git", "url": "git+https://github.com/gatsbyjs/gatsby.git", "directory": "packages/gatsby-plugin-sharp"},
            "readme": "npm install gatsby-plugin-sharp"
        }"#;

        let document: PackageDocument = serde_json::from_str(json).unwrap();
        let descriptor = document.into_descriptor();
        assert_eq!(descriptor.version, "5.13.1");
        assert_eq!(
            descriptor.links.repository.as_deref(),
            Some("https://github.com/gatsbyjs/gatsby/tree/HEAD/packages/gatsby-plugin-sharp")
        );
        assert_eq!(
            descriptor.links.npm.as_deref(),
            Some("https://www.npmjs.com/package/gatsby-plugin-sharp")
        );
    }

    #[test]
    fn test_package_document_with_string_repository() {
        let json = r#"{"name": "gatsby-theme-blog", "repository": "github:gatsbyjs/themes"}"#;
        let document: PackageDocument = serde_json::from_str(json).unwrap();
        let descriptor = document.into_descriptor();
        assert_eq!(descriptor.version, "");
        assert_eq!(
            descriptor.links.repository.as_deref(),
            Some("https://github.com/gatsbyjs/themes")
        );
    }

    #[test]
    fn test_search_response_parsing() {
        let json = r#"{"objects": [
            {"package": {"name": "gatsby-source-filesystem", "version": "5.13.0",
                         "links": {"npm": "https://www.npmjs.com/package/gatsby-source-filesystem",
                                   "repository": "https://github.com/gatsbyjs/gatsby",
                                   "bugs": "https://github.com/gatsbyjs/gatsby/issues"}},
             "score": {"final": 0.9}}
        ], "total": 1}"#;

        let body: SearchResponse = serde_json::from_str(json).unwrap();
        assert_eq!(body.objects.len(), 1);
        assert_eq!(body.objects[0].package.name, "gatsby-source-filesystem");
        assert!(body.objects[0].package.links.homepage.is_none());
    }

    #[test]
    fn test_scoped_package_url() {
        let registry = NpmRegistry::new(&RegistryConfig::default()).unwrap();
        assert_eq!(
            registry.package_url("@acme/gatsby-plugin-x"),
            "https://registry.npmjs.org/@acme%2Fgatsby-plugin-x"
        );
    }
}
