// ABOUTME: Validated command requests built once at the input boundary
// Blank parameters are rejected here so dispatch never sees half-filled input

use super::package::PackageLinks;
use crate::error::DispatchError;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateSite,
    Develop,
    Dispose,
    Build,
    Serve,
    InstallDependency,
    InstallCli,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Action::CreateSite => "create site",
            Action::Develop => "develop",
            Action::Dispose => "dispose",
            Action::Build => "build",
            Action::Serve => "serve",
            Action::InstallDependency => "install dependency",
            Action::InstallCli => "install gatsby-cli",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    /// `None` means "ask the user".
    pub site_name: Option<String>,
    pub template_repo: Option<String>,
    pub package_name: Option<String>,
    pub links: PackageLinks,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    action: Action,
    params: RequestParams,
}

impl CommandRequest {
    /// Builds a request for an action that takes no parameters.
    pub fn simple(action: Action) -> Result<Self, DispatchError> {
        match action {
            Action::CreateSite => Self::create_site(None, None),
            Action::InstallDependency => Err(DispatchError::MissingParameter("package name")),
            _ => Ok(Self {
                action,
                params: RequestParams::default(),
            }),
        }
    }

    pub fn create_site(
        name: Option<String>,
        template_repo: Option<String>,
    ) -> Result<Self, DispatchError> {
        let site_name = match name {
            Some(name) => Some(non_blank(name, "site name")?),
            None => None,
        };
        let template_repo = template_repo.and_then(|repo| {
            let repo = repo.trim().to_string();
            (!repo.is_empty()).then_some(repo)
        });

        Ok(Self {
            action: Action::CreateSite,
            params: RequestParams {
                site_name,
                template_repo,
                ..RequestParams::default()
            },
        })
    }

    pub fn install_dependency(name: &str, links: PackageLinks) -> Result<Self, DispatchError> {
        let package_name = non_blank(name.to_string(), "package name")?;
        Ok(Self {
            action: Action::InstallDependency,
            params: RequestParams {
                package_name: Some(package_name),
                links,
                ..RequestParams::default()
            },
        })
    }

    pub fn action(&self) -> Action {
        self.action
    }

    pub fn params(&self) -> &RequestParams {
        &self.params
    }
}

fn non_blank(value: String, what: &'static str) -> Result<String, DispatchError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DispatchError::MissingParameter(what));
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_site_name_rejected() {
        let err = CommandRequest::create_site(Some("   ".to_string()), None).unwrap_err();
        assert!(matches!(err, DispatchError::MissingParameter("site name")));
    }

    #[test]
    fn test_absent_site_name_is_deferred_to_prompt() {
        let request = CommandRequest::create_site(None, Some("".to_string())).unwrap();
        assert_eq!(request.action(), Action::CreateSite);
        assert!(request.params().site_name.is_none());
        assert!(request.params().template_repo.is_none());
    }

    #[test]
    fn test_install_requires_package_name() {
        assert!(CommandRequest::install_dependency("", PackageLinks::default()).is_err());
        assert!(CommandRequest::simple(Action::InstallDependency).is_err());

        let request =
            CommandRequest::install_dependency(" gatsby-plugin-sharp ", PackageLinks::default())
                .unwrap();
        assert_eq!(
            request.params().package_name.as_deref(),
            Some("gatsby-plugin-sharp")
        );
    }
}
