use std::path::Path;

use crate::checker::{CheckerError, SyntaxChecker};
use crate::config::GateConfig;

/// Outcome of one gate invocation. Mapped to a process exit code only at the
/// outermost boundary, in main.
#[derive(Debug)]
pub enum Verdict {
    /// Out-of-scope path, missing file, or valid syntax: let the edit stand.
    Allow,
    /// Syntax check failed: surface the diagnostics and block.
    Block { path: String, diagnostics: String },
    /// The checker itself could not run. Neither a pass nor a block.
    Unavailable { detail: String },
}

impl Verdict {
    /// Exit-code contract: 0 allow, 2 block, 1 infrastructure error.
    pub fn exit_code(&self) -> u8 {
        match self {
            Verdict::Allow => 0,
            Verdict::Unavailable { .. } => 1,
            Verdict::Block { .. } => 2,
        }
    }
}

/// Decide the verdict for one file-change event.
///
/// Stateless and single-pass: the same event against the same file contents
/// always yields the same verdict.
pub fn evaluate(
    file_path: Option<&str>,
    config: &GateConfig,
    checker: &dyn SyntaxChecker,
) -> Verdict {
    let Some(path_str) = file_path else {
        tracing::debug!("event names no file, allowing");
        return Verdict::Allow;
    };

    let Some(rule) = config.rule_for(path_str) else {
        tracing::debug!(path = path_str, "no language rule matches, allowing");
        return Verdict::Allow;
    };

    // The write may have been rejected upstream; nothing to validate then.
    let path = Path::new(path_str);
    if !path.exists() {
        tracing::debug!(path = path_str, "file missing at check time, allowing");
        return Verdict::Allow;
    }

    match checker.check(rule, path) {
        Ok(outcome) if outcome.ok => Verdict::Allow,
        Ok(outcome) => Verdict::Block {
            path: path_str.to_string(),
            diagnostics: outcome.diagnostics,
        },
        Err(err @ CheckerError::Unavailable { .. }) => {
            tracing::warn!(%err, "checker unavailable");
            Verdict::Unavailable {
                detail: err.to_string(),
            }
        }
        Err(err) => {
            tracing::warn!(%err, "checker failed to run");
            Verdict::Unavailable {
                detail: err.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::checker::CheckOutcome;
    use crate::config::LanguageRule;
    use std::cell::Cell;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    enum FakeResult {
        Pass,
        Fail(&'static str),
        Unavailable,
    }

    struct FakeChecker {
        result: FakeResult,
        calls: Cell<usize>,
    }

    impl FakeChecker {
        fn new(result: FakeResult) -> Self {
            FakeChecker {
                result,
                calls: Cell::new(0),
            }
        }
    }

    impl SyntaxChecker for FakeChecker {
        fn check(&self, _rule: &LanguageRule, _path: &Path) -> Result<CheckOutcome, CheckerError> {
            self.calls.set(self.calls.get() + 1);
            match self.result {
                FakeResult::Pass => Ok(CheckOutcome {
                    ok: true,
                    diagnostics: String::new(),
                }),
                FakeResult::Fail(diag) => Ok(CheckOutcome {
                    ok: false,
                    diagnostics: diag.to_string(),
                }),
                FakeResult::Unavailable => Err(CheckerError::Unavailable {
                    program: "swiftc".to_string(),
                    source: io::Error::new(io::ErrorKind::NotFound, "not found"),
                }),
            }
        }
    }

    fn existing_swift_file(temp: &TempDir) -> String {
        let path = temp.path().join("main.swift");
        fs::write(&path, "let x = 1\n").unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_no_path_allows_without_checking() {
        let checker = FakeChecker::new(FakeResult::Fail("boom"));
        let verdict = evaluate(None, &GateConfig::default_rules(), &checker);
        assert!(matches!(verdict, Verdict::Allow));
        assert_eq!(checker.calls.get(), 0);
    }

    #[test]
    fn test_foreign_extension_allows_without_checking() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("readme.txt");
        fs::write(&path, "hello").unwrap();

        let checker = FakeChecker::new(FakeResult::Fail("boom"));
        let verdict = evaluate(
            path.to_str(),
            &GateConfig::default_rules(),
            &checker,
        );
        assert!(matches!(verdict, Verdict::Allow));
        assert_eq!(checker.calls.get(), 0);
    }

    #[test]
    fn test_missing_file_allows_without_checking() {
        let checker = FakeChecker::new(FakeResult::Fail("boom"));
        let verdict = evaluate(
            Some("/nonexistent/dir/missing.swift"),
            &GateConfig::default_rules(),
            &checker,
        );
        assert!(matches!(verdict, Verdict::Allow));
        assert_eq!(checker.calls.get(), 0);
    }

    #[test]
    fn test_valid_syntax_allows() {
        let temp = TempDir::new().unwrap();
        let path = existing_swift_file(&temp);

        let checker = FakeChecker::new(FakeResult::Pass);
        let verdict = evaluate(Some(&path), &GateConfig::default_rules(), &checker);
        assert!(matches!(verdict, Verdict::Allow));
        assert_eq!(checker.calls.get(), 1);
    }

    #[test]
    fn test_invalid_syntax_blocks_with_diagnostics() {
        let temp = TempDir::new().unwrap();
        let path = existing_swift_file(&temp);

        let checker = FakeChecker::new(FakeResult::Fail("error: expected '}'"));
        let verdict = evaluate(Some(&path), &GateConfig::default_rules(), &checker);
        match verdict {
            Verdict::Block {
                path: blocked,
                diagnostics,
            } => {
                assert_eq!(blocked, path);
                assert_eq!(diagnostics, "error: expected '}'");
            }
            other => panic!("expected Block, got {:?}", other),
        }
    }

    #[test]
    fn test_unavailable_checker_is_not_pass_or_block() {
        let temp = TempDir::new().unwrap();
        let path = existing_swift_file(&temp);

        let checker = FakeChecker::new(FakeResult::Unavailable);
        let verdict = evaluate(Some(&path), &GateConfig::default_rules(), &checker);
        match verdict {
            Verdict::Unavailable { detail } => assert!(detail.contains("swiftc")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[test]
    fn test_exit_code_mapping() {
        assert_eq!(Verdict::Allow.exit_code(), 0);
        assert_eq!(
            Verdict::Unavailable {
                detail: String::new()
            }
            .exit_code(),
            1
        );
        assert_eq!(
            Verdict::Block {
                path: String::new(),
                diagnostics: String::new()
            }
            .exit_code(),
            2
        );
    }

    #[test]
    fn test_evaluate_is_idempotent() {
        let temp = TempDir::new().unwrap();
        let path = existing_swift_file(&temp);
        let config = GateConfig::default_rules();

        let checker = FakeChecker::new(FakeResult::Fail("boom"));
        let first = evaluate(Some(&path), &config, &checker);
        let second = evaluate(Some(&path), &config, &checker);
        assert_eq!(first.exit_code(), second.exit_code());
        assert_eq!(checker.calls.get(), 2);
    }
}
