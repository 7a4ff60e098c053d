use crate::error::{Result, ToolupError};
use std::time::Duration;

/// Supplies short-lived download URLs for release assets.
///
/// Implemented against the GitHub API in production; tests substitute a fake
/// to observe which assets get requested.
pub trait ReleaseSource {
    fn download_release_asset(&self, org: &str, repo: &str, asset_id: u64) -> Result<String>;
}

pub struct GitHubClient {
    github_token: Option<String>,
    client: reqwest::blocking::Client,
}

impl GitHubClient {
    pub fn new(github_token: Option<String>) -> Result<Self> {
        // Redirects are not followed: the Location header of the asset
        // endpoint is the download URL we are after.
        let client = reqwest::blocking::Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .user_agent(concat!("toolup/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ToolupError::metadata_fetch(e.to_string()))?;

        Ok(Self {
            github_token,
            client,
        })
    }
}

impl ReleaseSource for GitHubClient {
    fn download_release_asset(&self, org: &str, repo: &str, asset_id: u64) -> Result<String> {
        let url = format!("https://api.github.com/repos/{org}/{repo}/releases/assets/{asset_id}");

        let mut request = self
            .client
            .get(&url)
            .header("Accept", "application/octet-stream");
        if let Some(token) = &self.github_token {
            request = request.header("Authorization", format!("Bearer {token}"));
        }

        let response = request
            .send()
            .map_err(|e| ToolupError::metadata_fetch(format!("GET {url}: {e}")))?;
        let status = response.status();

        if status == reqwest::StatusCode::FORBIDDEN
            || status == reqwest::StatusCode::TOO_MANY_REQUESTS
        {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|value| value.to_str().ok())
                .and_then(|value| value.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(ToolupError::RateLimited {
                message: format!("GET {url} returned {status}"),
                retry_after,
            });
        }

        if status.is_redirection() {
            if let Some(location) = response
                .headers()
                .get("location")
                .and_then(|value| value.to_str().ok())
            {
                return Ok(location.to_string());
            }
            return Err(ToolupError::metadata_fetch(format!(
                "GET {url} redirected without a Location header"
            )));
        }

        Err(ToolupError::metadata_fetch(format!(
            "GET {url} returned {status}"
        )))
    }
}
