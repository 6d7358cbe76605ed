//! Browsable URLs for the hosting web UI

/// Builds absolute links into the repository browser
pub trait LinkBuilder: Send + Sync {
    /// Absolute URL of the commit list page of a repository
    fn commit_list_url(&self, project: &str, repo: &str) -> String;
}

/// Links of the form `<base>/projects/<project>/repos/<repo>/commits`
#[derive(Debug, Clone)]
pub struct BaseUrlLinks {
    base_url: String,
}

impl BaseUrlLinks {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }
}

impl LinkBuilder for BaseUrlLinks {
    fn commit_list_url(&self, project: &str, repo: &str) -> String {
        format!(
            "{}/projects/{}/repos/{}/commits",
            self.base_url, project, repo
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commit_list_url() {
        let links = BaseUrlLinks::new("https://git.example.com/");
        assert_eq!(
            links.commit_list_url("OPS", "deploy-tools"),
            "https://git.example.com/projects/OPS/repos/deploy-tools/commits"
        );
    }
}
