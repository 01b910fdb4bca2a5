use anyhow::{bail, Context, Result};
use glob::Pattern;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::presets::PRESETS;

const CONFIG_FILENAME: &str = "swiftgate.yaml";

/// One language the gate checks: which paths are in scope, and the
/// syntax-only command to run against them. The file path is appended as the
/// command's final argument.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageRule {
    /// Name of the rule (for error messages)
    pub name: String,
    /// Glob patterns for files this rule applies to
    pub paths: Vec<String>,
    /// Checker argv; must signal validity via its exit status
    pub command: Vec<String>,
}

/// Raw configuration structure (as parsed from YAML)
#[derive(Debug, Deserialize)]
struct GateConfigRaw {
    /// Built-in preset names to include
    presets: Option<Vec<String>>,
    /// Custom language rules
    languages: Option<Vec<LanguageRule>>,
}

/// Resolved configuration (presets expanded, rules always defined)
#[derive(Debug)]
pub struct GateConfig {
    pub languages: Vec<LanguageRule>,
}

impl GateConfig {
    /// Built-in behavior when no config file is found: Swift only.
    pub fn default_rules() -> Self {
        let languages = PRESETS.get("swift").cloned().unwrap_or_default();
        GateConfig { languages }
    }

    /// Find the first rule whose patterns match the given path.
    pub fn rule_for(&self, file_path: &str) -> Option<&LanguageRule> {
        self.languages.iter().find(|rule| {
            rule.paths.iter().any(|raw| match Pattern::new(raw) {
                Ok(pattern) => file_matches_pattern(file_path, &pattern),
                Err(_) => false,
            })
        })
    }
}

/// Parsed config with its location
#[derive(Debug)]
pub struct LoadedConfig {
    pub config: GateConfig,
    /// Directory containing the config file
    #[allow(dead_code)]
    pub config_dir: PathBuf,
}

/// Check if a file path matches a glob pattern.
/// Tries the path as-is, then just the filename for simple patterns.
fn file_matches_pattern(file_path: &str, pattern: &Pattern) -> bool {
    if pattern.matches(file_path) {
        return true;
    }

    if let Some(filename) = Path::new(file_path).file_name() {
        if pattern.matches(filename.to_string_lossy().as_ref()) {
            return true;
        }
    }

    false
}

/// Resolves preset names to their rule definitions
fn resolve_presets(preset_names: &[String], config_path: &Path) -> Result<Vec<LanguageRule>> {
    let mut rules = Vec::new();

    for name in preset_names {
        match PRESETS.get(name.as_str()) {
            Some(preset_rules) => rules.extend(preset_rules.iter().cloned()),
            None => {
                bail!(
                    "Invalid config at {}: unknown preset '{}'",
                    config_path.display(),
                    name
                );
            }
        }
    }

    Ok(rules)
}

/// Validates a language rule definition
fn validate_rule(rule: &LanguageRule, config_path: &Path) -> Result<()> {
    if rule.name.is_empty() {
        bail!(
            "Invalid config at {}: language rule missing 'name'",
            config_path.display()
        );
    }
    if rule.paths.is_empty() {
        bail!(
            "Invalid config at {}: rule '{}' missing 'paths'",
            config_path.display(),
            rule.name
        );
    }
    for pattern in &rule.paths {
        if Pattern::new(pattern).is_err() {
            bail!(
                "Invalid config at {}: rule '{}' has invalid glob pattern '{}'",
                config_path.display(),
                rule.name,
                pattern
            );
        }
    }
    if rule.command.is_empty() {
        bail!(
            "Invalid config at {}: rule '{}' missing 'command'",
            config_path.display(),
            rule.name
        );
    }
    Ok(())
}

/// Loads and parses a swiftgate.yaml config file.
/// Resolves presets and merges them with custom language rules.
pub fn load_config(config_path: &Path) -> Result<GateConfig> {
    let content = fs::read_to_string(config_path)
        .with_context(|| format!("Failed to read config: {}", config_path.display()))?;

    let parsed: GateConfigRaw = serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config: {}", config_path.display()))?;

    // Resolve presets first
    let preset_rules = if let Some(presets) = &parsed.presets {
        resolve_presets(presets, config_path)?
    } else {
        Vec::new()
    };

    let user_rules = parsed.languages.unwrap_or_default();

    // Merge: presets first, then user rules
    let mut merged = preset_rules;
    merged.extend(user_rules.iter().cloned());

    if merged.is_empty() {
        bail!(
            "Invalid config at {}: no languages defined (add 'presets' or 'languages')",
            config_path.display()
        );
    }

    // Validate user rules (preset rules are trusted)
    for rule in &user_rules {
        validate_rule(rule, config_path)?;
    }

    Ok(GateConfig { languages: merged })
}

/// Finds the nearest swiftgate.yaml by walking up from a directory.
///
/// An invalid config file is skipped with a warning and the walk continues,
/// so a broken config degrades to the built-in rules instead of changing the
/// exit-code contract.
pub fn find_nearest_config(start_dir: &Path) -> Option<LoadedConfig> {
    let mut current = start_dir.to_path_buf();

    loop {
        let config_path = current.join(CONFIG_FILENAME);

        if config_path.exists() {
            match load_config(&config_path) {
                Ok(config) => {
                    return Some(LoadedConfig {
                        config,
                        config_dir: current,
                    });
                }
                Err(err) => {
                    tracing::warn!(path = %config_path.display(), %err, "skipping invalid config");
                }
            }
        }

        // Move up
        if !current.pop() {
            return None;
        }
    }
}

/// Config for this invocation: nearest swiftgate.yaml above `start_dir`, or
/// the built-in rules.
pub fn resolve(start_dir: &Path) -> GateConfig {
    match find_nearest_config(start_dir) {
        Some(loaded) => loaded.config,
        None => GateConfig::default_rules(),
    }
}
