use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::github::GitHubClient;
use crate::core::install::{GoInstaller, Installer};
use crate::error::{Result, ToolupError};
use crate::output::Console;
use crate::utils::fs;
use std::path::Path;

pub fn install_tool(name: &str, path: Option<&Path>, from_source: bool) -> Result<()> {
    let config = Config::load()?;
    let catalog = Catalog::load(&config.catalog_path())?;
    let tool = catalog.find(name)?;

    let dest = match path {
        Some(path) => path.to_path_buf(),
        None => config.bin_dir(),
    };
    fs::ensure_dir_exists(&dest)?;

    let output = Console;
    let result = if from_source {
        GoInstaller::new(catalog.organization.as_str(), &output).install(tool, &dest)
    } else {
        let client = GitHubClient::new(config.github_api_token.clone())?;
        Installer::new(catalog.organization.as_str(), &client, &output).install(tool, &dest)
    };

    match result {
        Ok(_version) => Ok(()),
        Err(ToolupError::AlreadyInstalled { name }) => {
            println!("{name} is already installed, skipping");
            Ok(())
        }
        Err(err) => Err(err),
    }
}
