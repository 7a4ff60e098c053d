use crate::core::catalog::Catalog;
use crate::core::config::Config;
use crate::core::platform;
use crate::core::requirements;
use crate::error::Result;

pub fn check_tool(name: &str) -> Result<()> {
    let config = Config::load()?;
    let catalog = Catalog::load(&config.catalog_path())?;
    let tool = catalog.find(name)?;

    println!("🔍 Requirement check for {}", tool.name);
    println!();

    let specs = requirements::specs_for(tool, platform::host_os());
    if specs.is_empty() {
        println!("  no requirements declared for {}", platform::host_os());
        return Ok(());
    }

    let mut unmet = 0;
    for spec in specs {
        let status = if spec.required { "required" } else { "optional" };
        if requirements::is_satisfied(&spec.name) {
            println!("  ✅ {} ({status})", spec.name);
        } else {
            unmet += 1;
            println!("  ❌ {} ({status})", spec.name);
            println!("     {}", requirements::formatted_instruction(spec));
        }
    }

    println!();
    if unmet == 0 {
        println!("All requirements for {} are satisfied.", tool.name);
    } else {
        println!("Found {unmet} unmet requirement(s) for {}.", tool.name);
    }

    Ok(())
}
