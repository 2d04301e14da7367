// ABOUTME: Install-hint extraction from package READMEs and repository URL normalization

use lazy_static::lazy_static;
use regex::Regex;
use tracing::debug;

lazy_static! {
    static ref INSTALL_LINE: Regex = Regex::new(
        r"(?m)^[ \t]*`?(?:\$[ \t]*)?((?:npm[ \t]+(?:install|i|add)|yarn[ \t]+add|pnpm[ \t]+(?:add|install|i))[ \t]+[^`\r\n]+?)`?[ \t]*$"
    )
    .expect("install line pattern is valid");
    static ref SAFE_INSTALL: Regex = Regex::new(
        r"^(?:npm|yarn|pnpm)(?:[ \t]+[@\w./:^~=+-]+)+$"
    )
    .expect("safe install pattern is valid");
    static ref GITHUB_URL: Regex = Regex::new(
        r"^https?://(?:www\.)?github\.com/([^/#?]+)/([^/#?]+?)(?:\.git)?(?:/(?:tree|blob)/([^/#?]+)(/[^#?]*)?)?/?(?:[#?].*)?$"
    )
    .expect("github url pattern is valid");
}

/// Returns the first shell install line found in `markdown`, e.g.
/// `npm install gatsby-plugin-sharp` or `yarn add gatsby-theme-blog`.
///
/// The line is typed into a shell as-is, so it must consist of package specs
/// and flags only. If the first install line carries anything else (`&&`,
/// pipes, redirects, substitutions) there is no hint at all.
pub fn extract_install_command(markdown: &str) -> Option<String> {
    let line = INSTALL_LINE
        .captures(markdown)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())?;

    if SAFE_INSTALL.is_match(&line) {
        Some(line)
    } else {
        debug!("Ignoring install line with shell syntax: {}", line);
        None
    }
}

/// Turns the many spellings of a repository URL into a plain https URL.
pub fn normalize_repository_url(raw: &str) -> String {
    let url = raw.trim();
    let url = url.strip_prefix("git+").unwrap_or(url);

    if let Some(rest) = url.strip_prefix("github:") {
        return format!("https://github.com/{}", rest.trim_end_matches(".git"));
    }
    if let Some(rest) = url.strip_prefix("git@github.com:") {
        return format!("https://github.com/{}", rest.trim_end_matches(".git"));
    }
    if let Some(rest) = url.strip_prefix("git://") {
        return format!("https://{}", rest.trim_end_matches(".git"));
    }
    if let Some(rest) = url.strip_prefix("ssh://git@") {
        return format!("https://{}", rest.trim_end_matches(".git"));
    }

    // Bare "owner/repo" shorthand
    if !url.contains("://") && url.matches('/').count() == 1 && !url.starts_with('@') {
        return format!("https://github.com/{url}");
    }

    url.trim_end_matches(".git").to_string()
}

/// Raw README location for a GitHub repository or tree URL.
pub fn readme_url(link: &str) -> Option<String> {
    let link = normalize_repository_url(link);
    let caps = GITHUB_URL.captures(&link)?;

    let owner = caps.get(1)?.as_str();
    let repo = caps.get(2)?.as_str();
    let branch = caps.get(3).map_or("HEAD", |m| m.as_str());
    let path = caps
        .get(4)
        .map(|m| m.as_str().trim_matches('/'))
        .filter(|p| !p.is_empty());

    // A blob link already points at a file
    if let Some(path) = path {
        if path.to_ascii_lowercase().ends_with(".md") {
            return Some(format!(
                "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}"
            ));
        }
        return Some(format!(
            "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/{path}/README.md"
        ));
    }

    Some(format!(
        "https://raw.githubusercontent.com/{owner}/{repo}/{branch}/README.md"
    ))
}
