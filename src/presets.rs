use crate::config::LanguageRule;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Built-in language rules that can be referenced in swiftgate.yaml via
/// `presets: ["name"]`. Each command must be a syntax-only mode of the
/// language's toolchain: parse the file, touch nothing, signal via exit
/// status.
pub static PRESETS: LazyLock<HashMap<&'static str, Vec<LanguageRule>>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    m.insert(
        "swift",
        vec![LanguageRule {
            name: "swift".to_string(),
            paths: vec!["**/*.swift".to_string(), "*.swift".to_string()],
            command: vec!["swiftc".to_string(), "-parse".to_string()],
        }],
    );

    m.insert(
        "python",
        vec![LanguageRule {
            name: "python".to_string(),
            paths: vec!["**/*.py".to_string(), "*.py".to_string()],
            command: vec![
                "python3".to_string(),
                "-m".to_string(),
                "py_compile".to_string(),
            ],
        }],
    );

    m.insert(
        "ruby",
        vec![LanguageRule {
            name: "ruby".to_string(),
            paths: vec!["**/*.rb".to_string(), "*.rb".to_string()],
            command: vec!["ruby".to_string(), "-c".to_string()],
        }],
    );

    m.insert(
        "bash",
        vec![LanguageRule {
            name: "bash".to_string(),
            paths: vec!["**/*.sh".to_string(), "*.sh".to_string()],
            command: vec!["bash".to_string(), "-n".to_string()],
        }],
    );

    m
});
