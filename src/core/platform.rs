//! Platform naming rules for release assets and shared libraries.
//!
//! Release publishers tag assets with Go-style platform names
//! (`linux`/`darwin`/`windows`, `amd64`/`arm64`), so the host OS and
//! architecture are reported in that vocabulary.

/// OS label as it appears in release asset filenames. Publishers tag macOS
/// assets `macOS` rather than `darwin`; every other OS name passes through.
pub fn platform_label(os: &str) -> &str {
    if os.eq_ignore_ascii_case("darwin") {
        "macOS"
    } else {
        os
    }
}

/// Candidate filenames for a shared-library requirement, OS-specific
/// extension first, bare name as a fallback.
pub fn library_candidate_names(os: &str, base: &str) -> Vec<String> {
    match os {
        "windows" => vec![format!("{base}.dll"), base.to_string()],
        "linux" => vec![format!("{base}.so"), base.to_string()],
        "darwin" | "macos" => vec![format!("{base}.dylib"), base.to_string()],
        _ => vec![base.to_string()],
    }
}

/// Host OS in release-asset vocabulary.
pub fn host_os() -> &'static str {
    if cfg!(target_os = "macos") {
        "darwin"
    } else {
        std::env::consts::OS
    }
}

/// Host architecture in release-asset vocabulary.
pub fn host_arch() -> &'static str {
    match std::env::consts::ARCH {
        "x86_64" => "amd64",
        "aarch64" => "arm64",
        other => other,
    }
}

/// Executable filename for a tool on the current platform.
pub fn executable_file_name(tool_name: &str) -> String {
    if cfg!(windows) {
        format!("{tool_name}.exe")
    } else {
        tool_name.to_string()
    }
}

/// Strip a trailing `.exe` regardless of case. Archives built on Windows
/// carry the suffix even when the rest of the name matches the tool.
pub fn strip_exe_suffix(name: &str) -> &str {
    let len = name.len();
    if len >= 4 && name.is_char_boundary(len - 4) && name[len - 4..].eq_ignore_ascii_case(".exe") {
        &name[..len - 4]
    } else {
        name
    }
}
