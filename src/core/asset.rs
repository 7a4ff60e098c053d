use crate::core::catalog::Tool;
use crate::core::platform;
use crate::error::{Result, ToolupError};

/// Container format of a release asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetFormat {
    TarGz,
    Zip,
}

/// Asset chosen for one platform/architecture pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AssetSelection {
    pub id: u64,
    pub format: AssetFormat,
}

/// Pick the release asset matching `os`/`arch` from the tool's asset map.
///
/// The expected name follows the publisher convention
/// `{name}_{version}_{os}_{arch}` with the `v` prefix dropped from the
/// version and `darwin` rendered as `macOS`. Comparison is case-insensitive
/// and the container format comes from the asset's own suffix. At most one
/// asset per platform pair is expected in a release; the sorted asset map
/// makes the first match stable either way.
pub fn select_asset(tool: &Tool, os: &str, arch: &str) -> Result<AssetSelection> {
    let stem = format!(
        "{}_{}_{}_{}",
        tool.name,
        tool.version.trim_start_matches('v'),
        platform::platform_label(os),
        arch
    );

    for (asset_name, asset_id) in &tool.assets {
        let format = if asset_name.contains(".zip") {
            AssetFormat::Zip
        } else if asset_name.contains(".tar.gz") {
            AssetFormat::TarGz
        } else {
            continue;
        };

        let expected = match format {
            AssetFormat::Zip => format!("{stem}.zip"),
            AssetFormat::TarGz => format!("{stem}.tar.gz"),
        };

        if asset_name.eq_ignore_ascii_case(&expected) {
            // An ID that does not parse to a positive integer cannot be
            // requested from the release host, so it cannot be selected.
            if let Ok(id) = asset_id.parse::<u64>() {
                if id != 0 {
                    return Ok(AssetSelection { id, format });
                }
            }
        }
    }

    Err(ToolupError::NoAssetFound {
        os: os.to_string(),
        arch: arch.to_string(),
    })
}
