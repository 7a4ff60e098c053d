use crate::core::catalog::{RequirementSpec, Tool};
use crate::core::platform;

/// True when the named requirement resolves on this host.
///
/// Names with a `lib` prefix are probed through the dynamic-library loader,
/// OS-specific filename first and the bare name as a fallback; anything else
/// is looked up on the executable search path. This never installs anything.
pub fn is_satisfied(name: &str) -> bool {
    if name.starts_with("lib") {
        return platform::library_candidate_names(platform::host_os(), name)
            .iter()
            .any(|candidate| library_resolves(candidate));
    }
    which::which(name).is_ok()
}

fn library_resolves(name: &str) -> bool {
    // The library is opened only to test resolvability and dropped
    // immediately; nothing from it is called.
    unsafe { libloading::Library::new(name).is_ok() }
}

/// Requirement specs declared for `os`, in catalog order.
pub fn specs_for<'a>(tool: &'a Tool, os: &str) -> Vec<&'a RequirementSpec> {
    tool.requirements
        .iter()
        .filter(|requirement| requirement.os == os)
        .flat_map(|requirement| requirement.specification.iter())
        .collect()
}

/// Remediation text with the `$CMD` placeholder filled in.
pub fn formatted_instruction(spec: &RequirementSpec) -> String {
    spec.instruction.replacen("$CMD", &spec.command, 1)
}

/// Render the unmet-requirements block for `tool`, or `None` when everything
/// resolves. The satisfaction predicate is injected so rendering stays
/// testable without host probes.
pub fn unmet_report(tool: &Tool, os: &str, satisfied: impl Fn(&str) -> bool) -> Option<String> {
    let mut report = String::new();

    for spec in specs_for(tool, os) {
        if satisfied(&spec.name) {
            continue;
        }
        if report.is_empty() {
            report.push_str(&format!("{} requirements:\n", tool.name));
        }
        let status = if spec.required { "required" } else { "optional" };
        report.push_str(&format!("{status} {}\n", formatted_instruction(spec)));
    }

    if report.is_empty() {
        None
    } else {
        Some(report)
    }
}
