use serde::Deserialize;

/// Input JSON from the Claude Code hook system.
///
/// Every field is optional: the hook must not fail on payloads from older or
/// newer orchestrator versions, and a missing field just means "nothing to
/// check" for this invocation.
#[derive(Debug, Default, Deserialize)]
pub struct HookInput {
    pub hook_event_name: Option<String>,
    /// Tool name (present for PreToolUse/PostToolUse events)
    pub tool_name: Option<String>,
    pub session_id: Option<String>,
    pub cwd: Option<String>,
    pub tool_input: Option<ToolInput>,
}

/// Payload of the tool call that triggered the event. Only file-mutation
/// tools (Write/Edit/MultiEdit) carry a `file_path`.
#[derive(Debug, Default, Deserialize)]
pub struct ToolInput {
    pub file_path: Option<String>,
}

impl HookInput {
    /// Path of the file the triggering tool call mutated, if any.
    pub fn file_path(&self) -> Option<&str> {
        self.tool_input.as_ref()?.file_path.as_deref()
    }
}

/// Parse a hook payload, degrading to an empty event on malformed input.
///
/// Invalid JSON or a truncated stream must not turn into a non-zero exit:
/// the exit code is this process's entire output contract, and anything the
/// payload fails to name is simply out of scope for the check.
pub fn parse(raw: &str) -> HookInput {
    match serde_json::from_str(raw) {
        Ok(input) => input,
        Err(err) => {
            tracing::warn!(%err, "malformed hook payload, treating as empty event");
            HookInput::default()
        }
    }
}
