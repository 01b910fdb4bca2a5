use std::fs::OpenOptions;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Mutex;

use tracing_subscriber::EnvFilter;

mod checker;
mod config;
mod gate;
mod input;
mod presets;

use checker::CommandChecker;
use gate::Verdict;

/// Route tracing output to the file named by SWIFTGATE_LOG.
///
/// stderr is part of the hook's output contract (it must stay empty except on
/// a block), so diagnostics never go there.
fn init_logging() {
    let Ok(path) = std::env::var("SWIFTGATE_LOG") else {
        return;
    };
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };

    let filter = EnvFilter::try_from_env("SWIFTGATE_LOG_LEVEL")
        .unwrap_or_else(|_| EnvFilter::new("debug"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

fn main() -> ExitCode {
    init_logging();

    if std::env::args().nth(1).as_deref() == Some("install") {
        #[allow(clippy::print_stdout)]
        {
            println!("{}", install_snippet());
        }
        return ExitCode::SUCCESS;
    }

    let input = input::parse(&read_stdin());
    tracing::debug!(
        event = input.hook_event_name.as_deref().unwrap_or("<none>"),
        tool = input.tool_name.as_deref().unwrap_or("<none>"),
        session = input.session_id.as_deref().unwrap_or("<none>"),
        "hook invoked"
    );

    let start_dir = input
        .cwd
        .as_deref()
        .map(PathBuf::from)
        .or_else(|| std::env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    let config = config::resolve(&start_dir);

    let verdict = gate::evaluate(input.file_path(), &config, &CommandChecker);
    report(&verdict);
    ExitCode::from(verdict.exit_code())
}

/// The whole payload arrives on stdin before the hook runs; an unreadable
/// stream degrades to an empty event rather than a crash.
fn read_stdin() -> String {
    let mut buffer = String::new();
    if let Err(err) = io::stdin().read_to_string(&mut buffer) {
        tracing::warn!(%err, "failed to read stdin, treating as empty event");
        buffer.clear();
    }
    buffer
}

/// Write the verdict's user-visible output. Silent on allow; on block, a
/// marker line naming the file followed by the checker's raw diagnostics.
#[allow(clippy::print_stderr)]
fn report(verdict: &Verdict) {
    match verdict {
        Verdict::Allow => {}
        Verdict::Block { path, diagnostics } => {
            eprintln!("Syntax errors in {}:", path);
            if !diagnostics.is_empty() {
                eprintln!("{}", diagnostics);
            }
        }
        Verdict::Unavailable { detail } => {
            eprintln!("swiftgate: {}", detail);
        }
    }
}

/// Hook registration for .claude/settings.json, printed by `swiftgate install`.
fn install_snippet() -> String {
    let snippet = serde_json::json!({
        "hooks": {
            "PostToolUse": [
                {
                    "matcher": "Write|Edit|MultiEdit",
                    "hooks": [
                        {
                            "type": "command",
                            "command": "swiftgate",
                            "timeout": 10
                        }
                    ]
                }
            ]
        }
    });
    serde_json::to_string_pretty(&snippet).unwrap_or_default()
}
