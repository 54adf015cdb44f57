//! Tool authorization against the agent's allow-list.

use crate::config::AgentConfig;

/// A tool name was absent from the agent's allow-list.
#[derive(Debug, thiserror::Error)]
#[error("tool '{tool}' is not allowed for this agent")]
pub struct PermissionDenied {
    pub tool: String,
}

/// Pure membership test of a tool name against `AgentConfig::allowed_tools`.
///
/// No external state, no caching, no side effects; safe under concurrency.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermissionPolicy;

impl PermissionPolicy {
    pub fn check(&self, config: &AgentConfig, tool_name: &str) -> Result<(), PermissionDenied> {
        if config.allowed_tools.contains(tool_name) {
            Ok(())
        } else {
            Err(PermissionDenied {
                tool: tool_name.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_tool_passes() {
        let config = AgentConfig::new("m", "i", ["create_workflow"]);
        PermissionPolicy.check(&config, "create_workflow").unwrap();
    }

    #[test]
    fn test_unlisted_tool_denied() {
        let config = AgentConfig::new("m", "i", ["other_tool"]);
        let err = PermissionPolicy.check(&config, "create_workflow").unwrap_err();
        assert_eq!(err.tool, "create_workflow");
    }

    #[test]
    fn test_empty_allow_list_denies_everything() {
        let config = AgentConfig::new("m", "i", Vec::<String>::new());
        assert!(PermissionPolicy.check(&config, "anything").is_err());
    }
}
