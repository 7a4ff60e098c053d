use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::platform;
use crate::error::Result;

pub fn list_tools() -> Result<()> {
    let config = Config::load()?;
    let catalog = Catalog::load(&config.catalog_path())?;
    let bin_dir = config.bin_dir();

    if catalog.tools.is_empty() {
        println!("Catalog is empty");
        return Ok(());
    }

    println!("Available tools:");
    for tool in &catalog.tools {
        let executable = bin_dir.join(platform::executable_file_name(&tool.name));
        let marker = if executable.exists() { "* " } else { "  " };
        println!("{marker}{} {}", tool.name, tool.version);
    }

    Ok(())
}
