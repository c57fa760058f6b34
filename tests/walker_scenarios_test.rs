//! End-to-end walks over fixture scripts through the public API

use scriptwalk::{
    analyze_script, AnalysisOptions, Binding, Breakpoint, BreakpointKind, Scope,
    ScriptAnalyzer, SharedShellcodeRegistry, ShellcodeCandidate,
};
use std::sync::Arc;

const HEAP_SPRAY: &str = include_str!("fixtures/scripts/heap_spray.js");
const BROKEN: &str = include_str!("fixtures/scripts/broken.js");

fn analyze(code: &str) -> scriptwalk::AnalysisResult {
    analyze_script(code, &AnalysisOptions::default()).unwrap()
}

#[test]
fn test_heap_spray_bindings() {
    let result = analyze(HEAP_SPRAY);

    let bindings: Vec<_> = result
        .bindings
        .iter()
        .map(|b| (b.name.as_str(), b.scope.as_str()))
        .collect();
    assert_eq!(
        bindings,
        vec![
            ("shellcode", "global"),
            ("block", "global"),
            ("spray", "global"),
            ("chunk", "fill"),
            ("trigger", "global"),
        ]
    );
}

#[test]
fn test_heap_spray_breakpoints() {
    let result = analyze(HEAP_SPRAY);
    let global = Scope::global();
    let fill = Scope::function("fill");

    assert_eq!(
        result.breakpoints,
        vec![
            Breakpoint::new(BreakpointKind::Assignment, 2, global.clone()),
            Breakpoint::new(BreakpointKind::Assignment, 3, global.clone()),
            Breakpoint::new(BreakpointKind::Assignment, 4, global.clone()),
            Breakpoint::new(BreakpointKind::Assignment, 7, fill.clone()),
            Breakpoint::new(BreakpointKind::Loop, 10, fill),
            Breakpoint::new(BreakpointKind::Loop, 16, global.clone()),
            Breakpoint::new(BreakpointKind::Assignment, 19, global),
        ]
    );
}

#[test]
fn test_heap_spray_shellcodes() {
    let result = analyze(HEAP_SPRAY);

    assert_eq!(result.shellcodes.len(), 2);
    assert_eq!(result.shellcodes[0], ShellcodeCandidate::Bytes(vec![0x90; 32]));
    match &result.shellcodes[1] {
        ShellcodeCandidate::Bytes(bytes) => assert!(bytes.len() >= 32 && bytes.iter().all(|b| *b == b'A')),
        other => panic!("expected bytes, got {:?}", other),
    }

    // the unescape() argument sits inside a declarator initializer call, not a bare call statement
    assert!(!result
        .shellcodes
        .iter()
        .any(|c| c.as_bytes().starts_with(b"%u9090")));
}

#[test]
fn test_heap_spray_value_assignments() {
    let result = analyze(HEAP_SPRAY);
    assert_eq!(result.value_assignments.len(), 1);
    assert_eq!(result.value_assignments[0].name, "block");
    assert!(result.value_assignments[0].raw.starts_with("\"\\x90"));
}

#[test]
fn test_broken_script_is_tolerated() {
    let result = analyze(BROKEN);
    assert!(result.bindings.contains(&Binding::new("ok", Scope::global())));
}

#[test]
fn test_broken_script_strict_mode_yields_nothing() {
    let options = AnalysisOptions::default().with_reject_syntax_errors(true);
    let result = analyze_script(BROKEN, &options).unwrap();
    assert!(result.is_empty());
}

#[test]
fn test_empty_and_garbage_input() {
    assert!(analyze("").is_empty());
    assert!(analyze("\u{0}\u{1}\u{2}}}}}}((((").bindings.is_empty());
}

#[test]
fn test_deep_nesting_does_not_overflow() {
    let depth = 5_000;
    let script = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let result = analyze(&script);
    assert!(result.has_binding("x", "global"));
}

#[test]
fn test_registry_correlates_across_analyzers() {
    let registry = Arc::new(SharedShellcodeRegistry::new());
    let payload = "E".repeat(50);

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let registry = Arc::clone(&registry);
            let script = format!("function f{i}() {{ return '{payload}'; }}\nlog('{}');", i.to_string().repeat(40));
            std::thread::spawn(move || {
                let analyzer = ScriptAnalyzer::new(AnalysisOptions::default())
                    .unwrap()
                    .with_registry(registry);
                analyzer.analyze(&script)
            })
        })
        .collect();

    for handle in handles {
        let result = handle.join().unwrap();
        assert_eq!(result.shellcodes.len(), 2);
    }

    // shared payload once, plus one distinct payload per script
    assert_eq!(registry.len(), 5);
    assert!(registry.contains(&ShellcodeCandidate::Bytes(payload.into_bytes())));
}
