//! Integration Test: Headless Core
//!
//! **Policy**: `flightboard-core` MUST NOT depend on a terminal UI. Hosts
//! draw through `TileSurface`; ratatui and crossterm belong to the TUI.

use std::fs;

use architectural_enforcement::{code_part, read_lines, rust_sources, workspace_root};

const UI_CRATES: &[&str] = &["ratatui", "crossterm"];

#[test]
fn test_core_manifest_has_no_ui_dependencies() {
    let manifest = fs::read_to_string(workspace_root().join("board/core/Cargo.toml"))
        .expect("core manifest should be readable");

    let offending: Vec<&str> = manifest
        .lines()
        .map(|line| line.trim())
        .filter(|line| !line.starts_with('#'))
        .filter(|line| {
            UI_CRATES
                .iter()
                .any(|krate| line.starts_with(&format!("{krate} ")) || line.starts_with(&format!("{krate}=")))
        })
        .collect();

    assert!(
        offending.is_empty(),
        "flightboard-core must stay headless, found: {offending:?}"
    );
}

#[test]
fn test_core_sources_do_not_use_ui_crates() {
    let mut violations = Vec::new();

    for file in rust_sources("board/core/src") {
        for (idx, line) in read_lines(&file).iter().enumerate() {
            let code = code_part(line);
            if UI_CRATES
                .iter()
                .any(|krate| code.contains(&format!("{krate}::")))
            {
                violations.push(format!("{}:{} - {}", file.display(), idx + 1, line.trim()));
            }
        }
    }

    assert!(
        violations.is_empty(),
        "UI crates used in flightboard-core:\n{}",
        violations.join("\n")
    );
}

#[test]
fn test_core_sources_found() {
    assert!(
        !rust_sources("board/core/src").is_empty(),
        "expected to scan core sources"
    );
}
