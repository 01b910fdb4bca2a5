use std::io;
use std::path::Path;
use std::process::Command;
use thiserror::Error;

use crate::config::LanguageRule;

/// Failure to run the checker at all, as opposed to the checker running and
/// rejecting the file. Both variants surface as an infrastructure error, never
/// as a pass or a block.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("syntax checker '{program}' is not available: {source}")]
    Unavailable {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("failed to run syntax checker '{program}': {source}")]
    Io {
        program: String,
        #[source]
        source: io::Error,
    },
}

/// What the checker said about one file.
#[derive(Debug)]
pub struct CheckOutcome {
    pub ok: bool,
    /// Combined stdout + stderr of the checker, trailing whitespace trimmed
    pub diagnostics: String,
}

/// A syntax-only validation capability. The gate's decision logic depends on
/// this trait so it can be exercised without a real compiler on the box.
pub trait SyntaxChecker {
    fn check(&self, rule: &LanguageRule, path: &Path) -> Result<CheckOutcome, CheckerError>;
}

/// Real adapter: spawns the rule's command with the file path appended and
/// maps its exit status. One subprocess per invocation, no retries, no
/// internal timeout (the hook registration owns the wall-clock budget).
pub struct CommandChecker;

impl SyntaxChecker for CommandChecker {
    fn check(&self, rule: &LanguageRule, path: &Path) -> Result<CheckOutcome, CheckerError> {
        let Some((program, args)) = rule.command.split_first() else {
            return Err(CheckerError::Io {
                program: format!("<rule '{}'>", rule.name),
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty checker command"),
            });
        };

        tracing::debug!(rule = %rule.name, %program, path = %path.display(), "running syntax check");

        let output = Command::new(program)
            .args(args)
            .arg(path)
            .output()
            .map_err(|source| {
                if source.kind() == io::ErrorKind::NotFound {
                    CheckerError::Unavailable {
                        program: program.clone(),
                        source,
                    }
                } else {
                    CheckerError::Io {
                        program: program.clone(),
                        source,
                    }
                }
            })?;

        // Checkers split diagnostics between streams; the verdict carries both.
        let mut diagnostics = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.is_empty() {
            if !diagnostics.is_empty() && !diagnostics.ends_with('\n') {
                diagnostics.push('\n');
            }
            diagnostics.push_str(&stderr);
        }

        Ok(CheckOutcome {
            ok: output.status.success(),
            diagnostics: diagnostics.trim_end().to_string(),
        })
    }
}
