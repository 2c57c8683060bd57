//! Integration Test: Sleep Prohibition
//!
//! **Policy**: Production code in the core and the TUI MUST NOT call sleep
//! methods. Animation time is fed in through `FlightBoard::tick`; the TUI
//! paces frames with `tokio::time::interval`.
//! **Exceptions**: Test code

use std::path::Path;

use architectural_enforcement::{code_part, read_lines, rust_sources, PRODUCTION_DIRS};

/// Test that production code does not contain sleep() calls
#[test]
fn test_no_sleep_in_production_code() {
    let violations = find_sleep_violations();

    if !violations.is_empty() {
        eprintln!("\n❌ CRITICAL: Sleep calls found in production code!\n");

        for violation in &violations {
            eprintln!("  ❌ {}", violation);
        }

        eprintln!("\n✅ ACCEPTABLE:");
        eprintln!("  - Test code (#[test] or #[tokio::test] functions)");
        eprintln!("  - Periodic frames using tokio::time::interval()");
        eprintln!("\n❌ FORBIDDEN:");
        eprintln!("  - Sleep to wait for a flip to finish (drive tick instead)");
        eprintln!("  - Sleep as a repeat timer");

        panic!(
            "\nFound {} sleep violation(s) in production code.\nFix these before merging!",
            violations.len()
        );
    }
}

/// Find all sleep() calls in production code
fn find_sleep_violations() -> Vec<String> {
    let mut violations = Vec::new();
    for dir in PRODUCTION_DIRS {
        for file in rust_sources(dir) {
            check_file(&file, &mut violations);
        }
    }
    violations
}

fn check_file(path: &Path, violations: &mut Vec<String>) {
    let lines = read_lines(path);
    let lines: Vec<&str> = lines.iter().map(String::as_str).collect();

    for (idx, line) in lines.iter().enumerate() {
        let code = code_part(line);
        if !(code.contains("::sleep(") || code.contains(".sleep(")) {
            continue;
        }
        if is_in_test_function(&lines, idx) {
            continue;
        }

        violations.push(format!("{}:{} - {}", path.display(), idx + 1, line.trim()));
    }
}

/// Check if line is inside a test function
fn is_in_test_function(lines: &[&str], current_idx: usize) -> bool {
    // Scan backwards to the enclosing function header
    for i in (0..current_idx).rev() {
        let line = lines[i].trim();

        if line.starts_with("fn ") || line.contains(" fn ") || line.starts_with("async fn ") {
            return lines[..i]
                .iter()
                .rev()
                .map(|l| l.trim())
                .take_while(|l| l.starts_with("#["))
                .any(|l| l.starts_with("#[test]") || l.starts_with("#[tokio::test"));
        }

        // Stop at module boundaries
        if line.starts_with("mod ") || line.starts_with("impl ") {
            return false;
        }
    }
    false
}

#[test]
fn test_sleep_detection_outside_tests() {
    let code = vec![
        "fn wait_for_flip() {",
        "    std::thread::sleep(Duration::from_millis(10));",
        "}",
    ];
    assert!(!is_in_test_function(&code, 1));
}

#[test]
fn test_sleep_detection_inside_tests() {
    let code = vec![
        "#[tokio::test]",
        "async fn test_timing() {",
        "    tokio::time::sleep(Duration::from_millis(10)).await;",
        "}",
    ];
    assert!(is_in_test_function(&code, 2));
}
