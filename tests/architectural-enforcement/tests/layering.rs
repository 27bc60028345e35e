//! Integration Test: Layering
//!
//! **Policy**: `summoner-core` is headless. It must not depend on a terminal
//! library and must not sleep; delays are returned as `Effect::After` and
//! executed by the surface. The surface must not block the tokio runtime.

use std::fs;

use architectural_enforcement::{find_violations, workspace_root, SourceLine};

fn report(title: &str, violations: &[SourceLine]) {
    if violations.is_empty() {
        return;
    }
    eprintln!("\n❌ {title}\n");
    for violation in violations {
        eprintln!("  ❌ {violation}");
    }
    panic!(
        "\nFound {} violation(s): {title}.\nFix these before merging!",
        violations.len()
    );
}

#[test]
fn test_core_has_no_terminal_imports() {
    let violations = find_violations("summoner/core/src", &["crossterm", "ratatui", "termion"]);
    report("terminal library used in the core", &violations);
}

#[test]
fn test_core_manifest_has_no_terminal_crates() {
    let manifest = fs::read_to_string(workspace_root().join("summoner/core/Cargo.toml"))
        .expect("core manifest is readable");
    for name in ["crossterm", "ratatui", "termion"] {
        assert!(
            !manifest.lines().any(|line| line.trim_start().starts_with(name)),
            "summoner-core must not depend on {name}"
        );
    }
}

#[test]
fn test_core_never_sleeps() {
    let violations = find_violations(
        "summoner/core/src",
        &["thread::sleep", "time::sleep", "sleep_until"],
    );
    report("sleep in the core (return Effect::After instead)", &violations);
}

#[test]
fn test_surface_never_blocks_runtime() {
    let violations = find_violations("tui/src", &["thread::sleep", "std::sync::mpsc"]);
    report("blocking call in the terminal surface", &violations);
}
