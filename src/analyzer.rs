//! Script analyzer: parse, lower, walk
//!
//! Parsing runs under `catch_unwind` because hostile input has been known to
//! crash tree-sitter grammars. Any parse failure is logged and turned into an
//! empty [`AnalysisResult`]; nothing here returns an error for a bad script.

use crate::ast::{self, Program};
use crate::config::AnalysisOptions;
use crate::error::{Result, ScriptWalkError};
use crate::shellcode::ShellcodeRegistry;
use crate::types::AnalysisResult;
use crate::walker;
use std::any::Any;
use std::cell::RefCell;
use std::sync::Arc;
use tracing::{debug, error, trace, warn};
use tree_sitter::Parser;

/// Opaque handle to whatever environment the script will later execute in.
/// Carried alongside the analysis, never inspected.
pub type ExecutionContext = Arc<dyn Any + Send + Sync>;

/// Analyzes scripts one at a time.
///
/// Holds its parser in a `RefCell`, so use one analyzer per thread; share a
/// registry between them to correlate candidates across scripts.
pub struct ScriptAnalyzer {
    parser: RefCell<Parser>,
    options: AnalysisOptions,
    registry: Option<Arc<dyn ShellcodeRegistry>>,
    context: Option<ExecutionContext>,
}

impl ScriptAnalyzer {
    pub fn new(options: AnalysisOptions) -> Result<Self> {
        options.validate()?;

        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_javascript::LANGUAGE.into())
            .map_err(|e| ScriptWalkError::grammar(e.to_string()))?;

        Ok(Self {
            parser: RefCell::new(parser),
            options,
            registry: None,
            context: None,
        })
    }

    /// Forward every shellcode candidate to `registry` as well
    pub fn with_registry(mut self, registry: Arc<dyn ShellcodeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn with_context(mut self, context: ExecutionContext) -> Self {
        self.context = Some(context);
        self
    }

    pub fn context(&self) -> Option<&ExecutionContext> {
        self.context.as_ref()
    }

    pub fn options(&self) -> &AnalysisOptions {
        &self.options
    }

    /// Analyze one script. Never fails: unparseable input yields an empty result.
    pub fn analyze(&self, source: &str) -> AnalysisResult {
        let program = match self.parse(source) {
            Ok(program) => program,
            Err(e) if e.is_hostile_input() => {
                warn!("script parsing error, skipping analysis: {}", e);
                return AnalysisResult::default();
            }
            Err(e) => {
                error!("analysis failed, returning empty result: {}", e);
                return AnalysisResult::default();
            }
        };

        if program.truncated {
            warn!(
                max_depth = self.options.max_depth,
                "script nests deeper than the depth limit, result is incomplete"
            );
        }

        let result = walker::walk_program(&program, &self.options, self.registry.as_deref());
        debug!(
            bindings = result.bindings.len(),
            breakpoints = result.breakpoints.len(),
            shellcodes = result.shellcodes.len(),
            "walk complete"
        );
        result
    }

    /// Parse and lower `source` into the node model
    pub fn parse(&self, source: &str) -> Result<Program> {
        let start = std::time::Instant::now();

        let parse_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            self.parser.borrow_mut().parse(source, None)
        }));

        let tree = match parse_result {
            Ok(Some(tree)) => tree,
            Ok(None) => {
                return Err(ScriptWalkError::parse("parser returned no tree"));
            }
            Err(_panic_info) => {
                error!("tree-sitter-javascript crashed while parsing script ({} bytes)", source.len());
                // parser state is unknown after a panic
                self.parser.borrow_mut().reset();
                return Err(ScriptWalkError::ParserCrash);
            }
        };

        trace!(
            "parsed {} bytes in {}ms",
            source.len(),
            start.elapsed().as_millis()
        );

        let program = ast::lower_tree(&tree, source, self.options.max_depth);
        if program.has_errors {
            if self.options.reject_syntax_errors {
                return Err(ScriptWalkError::parse("script contains syntax errors"));
            }
            debug!("script has syntax errors, walking the recovered tree");
        }

        Ok(program)
    }
}

/// Analyze a single script with a throwaway analyzer
pub fn analyze_script(source: &str, options: &AnalysisOptions) -> Result<AnalysisResult> {
    let analyzer = ScriptAnalyzer::new(options.clone())?;
    Ok(analyzer.analyze(source))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shellcode::SharedShellcodeRegistry;
    use crate::types::ShellcodeCandidate;

    #[test]
    fn test_syntax_errors_tolerated_by_default() {
        let analyzer = ScriptAnalyzer::new(AnalysisOptions::default()).unwrap();
        let result = analyzer.analyze("var a = 1;\nvar = = ;\n");
        assert!(result.has_binding("a", "global"));
    }

    #[test]
    fn test_strict_mode_degrades_to_empty_result() {
        let options = AnalysisOptions::default().with_reject_syntax_errors(true);
        let analyzer = ScriptAnalyzer::new(options).unwrap();

        assert!(analyzer.parse("var a = 1;\nvar = = ;\n").is_err());
        let result = analyzer.analyze("var a = 1;\nvar = = ;\n");
        assert!(result.is_empty());

        // the analyzer stays usable afterwards
        assert!(analyzer.analyze("var b = 2;").has_binding("b", "global"));
    }

    #[test]
    fn test_invalid_options_rejected() {
        let options = AnalysisOptions::default().with_shellcode_min_length(0);
        assert!(ScriptAnalyzer::new(options).is_err());
    }

    #[test]
    fn test_registry_receives_candidates() {
        let registry = Arc::new(SharedShellcodeRegistry::new());
        let analyzer = ScriptAnalyzer::new(AnalysisOptions::default())
            .unwrap()
            .with_registry(registry.clone());

        let payload = "C".repeat(48);
        let result = analyzer.analyze(&format!("unescape('{payload}');"));

        let expected = ShellcodeCandidate::Bytes(payload.into_bytes());
        assert_eq!(result.shellcodes, vec![expected.clone()]);
        assert!(registry.contains(&expected));
    }

    struct RejectingRegistry;

    impl ShellcodeRegistry for RejectingRegistry {
        fn add(&self, _candidate: &ShellcodeCandidate) -> Result<bool> {
            Err(ScriptWalkError::registry("store unavailable"))
        }
    }

    #[test]
    fn test_registry_failure_keeps_local_candidates() {
        let analyzer = ScriptAnalyzer::new(AnalysisOptions::default())
            .unwrap()
            .with_registry(Arc::new(RejectingRegistry));

        let payload = "D".repeat(40);
        let result = analyzer.analyze(&format!("run('{payload}');
x = 1;"));

        assert_eq!(result.shellcodes, vec![ShellcodeCandidate::Bytes(payload.into_bytes())]);
        assert!(result.has_binding("x", "global"));
    }

    fn nested_ifs(levels: usize) -> String {
        format!("{}x = 1;{}", "if (a) { ".repeat(levels), " }".repeat(levels))
    }

    #[test]
    fn test_nesting_past_depth_limit_is_flagged() {
        let analyzer = ScriptAnalyzer::new(AnalysisOptions::default()).unwrap();
        let script = nested_ifs(300);

        let program = analyzer.parse(&script).unwrap();
        assert!(!program.has_errors);
        assert!(program.truncated);
        assert!(analyzer.analyze(&script).bindings.is_empty());
    }

    #[test]
    fn test_nesting_within_depth_limit_is_complete() {
        let analyzer = ScriptAnalyzer::new(AnalysisOptions::default()).unwrap();
        let script = nested_ifs(50);

        assert!(!analyzer.parse(&script).unwrap().truncated);
        assert!(analyzer.analyze(&script).has_binding("x", "global"));
    }

    #[test]
    fn test_context_is_carried_untouched() {
        let context: ExecutionContext = Arc::new(String::from("window#1"));
        let analyzer = ScriptAnalyzer::new(AnalysisOptions::default())
            .unwrap()
            .with_context(context);

        let stored = analyzer.context().unwrap();
        assert_eq!(stored.downcast_ref::<String>().map(String::as_str), Some("window#1"));
    }
}
