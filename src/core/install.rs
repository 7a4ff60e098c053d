use crate::core::asset;
use crate::core::catalog::Tool;
use crate::core::extract;
use crate::core::github::ReleaseSource;
use crate::core::platform;
use crate::core::requirements;
use crate::error::{Result, ToolupError};
use crate::output::Output;
use std::path::Path;
use std::process::Command;

/// Installs release binaries from archive assets.
///
/// One `install` call performs one blocking resolve/download/extract sequence
/// and shares no state with other calls. Two concurrent installs of the same
/// tool into the same directory race on the final executable; serializing
/// that is the caller's job.
pub struct Installer<'a> {
    org: String,
    release_source: &'a dyn ReleaseSource,
    output: &'a dyn Output,
}

impl<'a> Installer<'a> {
    pub fn new(
        org: impl Into<String>,
        release_source: &'a dyn ReleaseSource,
        output: &'a dyn Output,
    ) -> Self {
        Self {
            org: org.into(),
            release_source,
            output,
        }
    }

    /// Install `tool` into `dest`, returning the installed version string.
    ///
    /// Returns `AlreadyInstalled` without touching the network when the
    /// executable is present; callers may treat that as a benign no-op.
    pub fn install(&self, tool: &Tool, dest: &Path) -> Result<String> {
        ensure_not_installed(tool, dest)?;

        self.output.info(&format!("installing {}...", tool.name));
        self.print_requirement_info(tool);

        let selection = asset::select_asset(tool, platform::host_os(), platform::host_arch())?;

        let url = match self
            .release_source
            .download_release_asset(&self.org, &tool.repo, selection.id)
        {
            Ok(url) => url,
            Err(ToolupError::RateLimited {
                message,
                retry_after,
            }) => {
                if let Some(retry_after) = retry_after {
                    self.output.warn(&format!(
                        "release host rate limit hit, retry after {}s",
                        retry_after.as_secs()
                    ));
                }
                return Err(ToolupError::RateLimited {
                    message,
                    retry_after,
                });
            }
            Err(err) => return Err(err),
        };

        let response = reqwest::blocking::get(url.as_str())
            .map_err(|_| ToolupError::Download { url: url.clone() })?;
        if response.status() != reqwest::StatusCode::OK {
            return Err(ToolupError::Download { url });
        }

        extract::extract(response, selection.format, &tool.name, dest)?;

        self.output.info(&format!(
            "installed {} {} (latest)",
            tool.name, tool.version
        ));
        Ok(tool.version.clone())
    }

    fn print_requirement_info(&self, tool: &Tool) {
        let report =
            requirements::unmet_report(tool, platform::host_os(), requirements::is_satisfied);
        if let Some(report) = report {
            self.output.info(report.trim_end());
        }
    }
}

/// Builds a tool from source with the Go toolchain instead of downloading a
/// release archive. Shares only the already-installed pre-check with the
/// archive path.
pub struct GoInstaller<'a> {
    org: String,
    output: &'a dyn Output,
}

impl<'a> GoInstaller<'a> {
    pub fn new(org: impl Into<String>, output: &'a dyn Output) -> Self {
        Self {
            org: org.into(),
            output,
        }
    }

    pub fn install(&self, tool: &Tool, dest: &Path) -> Result<String> {
        ensure_not_installed(tool, dest)?;

        self.output
            .info(&format!("installing {} with go install...", tool.name));

        let module = match tool.go_install_path.as_deref() {
            Some(suffix) if !suffix.is_empty() => {
                format!("github.com/{}/{}/{suffix}", self.org, tool.name)
            }
            _ => format!("github.com/{}/{}", self.org, tool.name),
        };

        let result = Command::new("go")
            .args(["install", "-v", &module])
            .env("GOBIN", dest)
            .output()?;
        if !result.status.success() {
            let mut combined = String::from_utf8_lossy(&result.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&result.stderr));
            return Err(ToolupError::SourceBuild { output: combined });
        }

        self.output.info(&format!(
            "installed {} {} (latest)",
            tool.name, tool.version
        ));
        Ok(tool.version.clone())
    }
}

fn ensure_not_installed(tool: &Tool, dest: &Path) -> Result<()> {
    let executable = dest.join(platform::executable_file_name(&tool.name));
    if executable.exists() {
        return Err(ToolupError::AlreadyInstalled {
            name: tool.name.clone(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::Mutex;
    use std::time::Duration;

    struct FakeReleaseSource {
        url: Option<String>,
        rate_limited: bool,
        requested: Mutex<Vec<u64>>,
    }

    impl FakeReleaseSource {
        fn returning(url: &str) -> Self {
            Self {
                url: Some(url.to_string()),
                rate_limited: false,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn unused() -> Self {
            Self {
                url: None,
                rate_limited: false,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn rate_limited() -> Self {
            Self {
                url: None,
                rate_limited: true,
                requested: Mutex::new(Vec::new()),
            }
        }

        fn requested_ids(&self) -> Vec<u64> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl ReleaseSource for FakeReleaseSource {
        fn download_release_asset(&self, _org: &str, _repo: &str, asset_id: u64) -> Result<String> {
            self.requested.lock().unwrap().push(asset_id);
            if self.rate_limited {
                return Err(ToolupError::RateLimited {
                    message: "secondary rate limit".to_string(),
                    retry_after: Some(Duration::from_secs(30)),
                });
            }
            match &self.url {
                Some(url) => Ok(url.clone()),
                None => panic!("release source should not have been called"),
            }
        }
    }

    struct RecordingOutput {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingOutput {
        fn new() -> Self {
            Self {
                lines: Mutex::new(Vec::new()),
            }
        }

        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl Output for RecordingOutput {
        fn info(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("info: {message}"));
        }

        fn warn(&self, message: &str) {
            self.lines.lock().unwrap().push(format!("warn: {message}"));
        }
    }

    fn tool(assets: &[(&str, &str)]) -> Tool {
        Tool {
            name: "foo".to_string(),
            version: "v1.2.0".to_string(),
            repo: "foo".to_string(),
            assets: assets
                .iter()
                .map(|(name, id)| (name.to_string(), id.to_string()))
                .collect::<BTreeMap<_, _>>(),
            requirements: vec![],
            go_install_path: None,
        }
    }

    fn host_asset_name() -> String {
        format!(
            "foo_1.2.0_{}_{}.tar.gz",
            platform::platform_label(platform::host_os()),
            platform::host_arch()
        )
    }

    fn build_tar_gz(entries: &[(&str, &[u8])]) -> Vec<u8> {
        use flate2::write::GzEncoder;
        use flate2::Compression;

        let mut builder = tar::Builder::new(Vec::new());
        for (name, data) in entries {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            builder.append_data(&mut header, name, *data).unwrap();
        }
        let tar_bytes = builder.into_inner().unwrap();

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&tar_bytes).unwrap();
        encoder.finish().unwrap()
    }

    /// Serve one HTTP response on a local port and return its URL.
    fn serve_once(status_line: &'static str, body: Vec<u8>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        std::thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = [0u8; 4096];
            let _ = stream.read(&mut request);
            let header = format!(
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n",
                body.len()
            );
            stream.write_all(header.as_bytes()).unwrap();
            stream.write_all(&body).unwrap();
        });

        format!("http://{addr}/asset")
    }

    #[test]
    fn test_install_end_to_end_extracts_only_the_binary() {
        let archive = build_tar_gz(&[("foo", b"binary".as_slice()), ("LICENSE", b"MIT".as_slice())]);
        let url = serve_once("HTTP/1.1 200 OK", archive);

        let asset_name = host_asset_name();
        let tool = tool(&[(&asset_name, "42")]);
        let source = FakeReleaseSource::returning(&url);
        let output = RecordingOutput::new();
        let dest = tempfile::tempdir().unwrap();

        let version = Installer::new("exampleorg", &source, &output)
            .install(&tool, dest.path())
            .unwrap();

        assert_eq!(version, "v1.2.0");
        assert_eq!(source.requested_ids(), vec![42]);
        assert!(dest.path().join("foo").exists());
        assert!(!dest.path().join("LICENSE").exists());
        assert!(output
            .lines()
            .contains(&"info: installed foo v1.2.0 (latest)".to_string()));
    }

    #[test]
    fn test_no_asset_fails_before_any_metadata_request() {
        let tool = tool(&[("foo_1.2.0_plan9_386.tar.gz", "42")]);
        let source = FakeReleaseSource::unused();
        let output = RecordingOutput::new();
        let dest = tempfile::tempdir().unwrap();

        let err = Installer::new("exampleorg", &source, &output)
            .install(&tool, dest.path())
            .unwrap_err();

        assert!(matches!(err, ToolupError::NoAssetFound { .. }));
        assert!(source.requested_ids().is_empty());
    }

    #[test]
    fn test_second_install_is_already_installed_without_network() {
        let asset_name = host_asset_name();
        let tool = tool(&[(&asset_name, "42")]);
        let source = FakeReleaseSource::unused();
        let output = RecordingOutput::new();
        let dest = tempfile::tempdir().unwrap();

        let executable = dest
            .path()
            .join(platform::executable_file_name(&tool.name));
        std::fs::write(&executable, b"binary").unwrap();

        let err = Installer::new("exampleorg", &source, &output)
            .install(&tool, dest.path())
            .unwrap_err();

        assert!(matches!(err, ToolupError::AlreadyInstalled { .. }));
        assert!(source.requested_ids().is_empty());
    }

    #[test]
    fn test_rate_limit_is_surfaced_and_propagated() {
        let asset_name = host_asset_name();
        let tool = tool(&[(&asset_name, "42")]);
        let source = FakeReleaseSource::rate_limited();
        let output = RecordingOutput::new();
        let dest = tempfile::tempdir().unwrap();

        let err = Installer::new("exampleorg", &source, &output)
            .install(&tool, dest.path())
            .unwrap_err();

        assert!(matches!(err, ToolupError::RateLimited { .. }));
        assert!(output
            .lines()
            .iter()
            .any(|line| line.starts_with("warn:") && line.contains("retry after 30s")));
    }

    #[test]
    fn test_non_200_download_is_a_hard_failure() {
        let url = serve_once("HTTP/1.1 404 Not Found", Vec::new());

        let asset_name = host_asset_name();
        let tool = tool(&[(&asset_name, "42")]);
        let source = FakeReleaseSource::returning(&url);
        let output = RecordingOutput::new();
        let dest = tempfile::tempdir().unwrap();

        let err = Installer::new("exampleorg", &source, &output)
            .install(&tool, dest.path())
            .unwrap_err();

        assert!(matches!(err, ToolupError::Download { .. }));
        assert!(!dest.path().join("foo").exists());
    }

    #[test]
    fn test_go_installer_shares_already_installed_check() {
        let tool = tool(&[]);
        let output = RecordingOutput::new();
        let dest = tempfile::tempdir().unwrap();

        let executable = dest
            .path()
            .join(platform::executable_file_name(&tool.name));
        std::fs::write(&executable, b"binary").unwrap();

        let err = GoInstaller::new("exampleorg", &output)
            .install(&tool, dest.path())
            .unwrap_err();

        assert!(matches!(err, ToolupError::AlreadyInstalled { .. }));
    }
}
