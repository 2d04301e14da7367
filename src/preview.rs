// ABOUTME: Plain-text package preview: title, version, description, links and a README excerpt

use crate::models::PackageDescriptor;
use std::fmt::Write;

const README_EXCERPT_LINES: usize = 12;

/// `gatsby-plugin-sharp` -> `Gatsby Plugin Sharp`. Scopes are kept as-is.
pub fn title_case(name: &str) -> String {
    name.split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn kind_label(package: &PackageDescriptor) -> &'static str {
    if package.is_theme() {
        "Gatsby Theme"
    } else if package.name.starts_with("gatsby-starter") {
        "Gatsby Starter"
    } else {
        "Gatsby Plugin"
    }
}

/// Renders the package card. README lines are printed verbatim, without
/// any markdown processing.
pub fn render(package: &PackageDescriptor, readme: Option<&str>) -> String {
    let mut out = String::new();
    let title = format!("{}: {}", kind_label(package), title_case(&package.name));

    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    if !package.version.is_empty() {
        let _ = writeln!(out, "Version: {}", package.version);
    }
    if let Some(description) = package.description.as_deref() {
        let _ = writeln!(out, "{description}");
    }

    let links = [
        ("npm", package.links.npm.as_deref()),
        ("repository", package.links.repository.as_deref()),
        ("homepage", package.links.homepage.as_deref()),
    ];
    let mut wrote_link = false;
    for (label, link) in links {
        if let Some(link) = link {
            if !wrote_link {
                out.push('\n');
                wrote_link = true;
            }
            let _ = writeln!(out, "  {label:<11}{link}");
        }
    }

    if let Some(readme) = readme {
        let excerpt: Vec<&str> = readme
            .lines()
            .map(str::trim_end)
            .skip_while(|line| line.is_empty())
            .take(README_EXCERPT_LINES)
            .collect();
        if !excerpt.is_empty() {
            out.push('\n');
            for line in excerpt {
                if line.is_empty() {
                    out.push_str("  │\n");
                } else {
                    let _ = writeln!(out, "  │ {line}");
                }
            }
        }
    }

    let _ = writeln!(out, "\nInstall with: gatsby-hub install {}", package.name);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PackageLinks;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("gatsby-plugin-sharp"), "Gatsby Plugin Sharp");
        assert_eq!(title_case("gatsby-source_wordpress"), "Gatsby Source Wordpress");
        assert_eq!(title_case("@acme/gatsby-plugin-x"), "@acme/gatsby Plugin X");
        assert_eq!(title_case(""), "");
    }

    #[test]
    fn test_render_card() {
        let package = PackageDescriptor {
            name: "gatsby-theme-blog".to_string(),
            version: "4.0.0".to_string(),
            description: Some("A Gatsby theme for blogs".to_string()),
            links: PackageLinks {
                repository: Some("https://github.com/gatsbyjs/themes".to_string()),
                homepage: None,
                npm: Some("https://www.npmjs.com/package/gatsby-theme-blog".to_string()),
            },
        };

        let card = render(&package, Some("\n# gatsby-theme-blog\n\nA blog theme.\n"));
        let expected = "\
Gatsby Theme: Gatsby Theme Blog
===============================
Version: 4.0.0
A Gatsby theme for blogs

  npm        https://www.npmjs.com/package/gatsby-theme-blog
  repository https://github.com/gatsbyjs/themes

  │ # gatsby-theme-blog
  │
  │ A blog theme.

Install with: gatsby-hub install gatsby-theme-blog
";
        assert_eq!(card, expected);
    }
}
