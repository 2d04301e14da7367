// ABOUTME: Shell command lines for the actions that are not derived from config

/// Global install of the gatsby CLI.
pub const INSTALL_CLI: &str = "npm install -g gatsby-cli";

/// `gatsby new <name> [<template>] && cd <name>`
pub fn create_site(name: &str, template_repo: Option<&str>) -> String {
    let name = shell_quote(name);
    match template_repo {
        Some(repo) => format!("gatsby new {name} {} && cd {name}", shell_quote(repo)),
        None => format!("gatsby new {name} && cd {name}"),
    }
}

/// Generic fallback used when no registry install hint resolves.
pub fn npm_install(package: &str) -> String {
    format!("npm install {}", shell_quote(package))
}

pub fn elevated(command: &str) -> String {
    format!("sudo {command}")
}

/// Leaves plain words alone and single-quotes anything a shell could split or expand.
pub fn shell_quote(value: &str) -> String {
    let plain = !value.is_empty()
        && value
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '/' | ':' | '@' | '+'));
    if plain {
        value.to_string()
    } else {
        format!("'{}'", value.replace('\'', r"'\''"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_site_default_starter() {
        assert_eq!(create_site("my-site", None), "gatsby new my-site && cd my-site");
    }

    #[test]
    fn test_create_site_with_template() {
        assert_eq!(
            create_site("blog", Some("https://github.com/gatsbyjs/gatsby-starter-blog")),
            "gatsby new blog https://github.com/gatsbyjs/gatsby-starter-blog && cd blog"
        );
    }

    #[test]
    fn test_quoting() {
        assert_eq!(shell_quote("@scope/pkg"), "@scope/pkg");
        assert_eq!(shell_quote("my site"), "'my site'");
        assert_eq!(shell_quote("it's"), r"'it'\''s'");
        assert_eq!(npm_install("foo-pkg"), "npm install foo-pkg");
    }
}
