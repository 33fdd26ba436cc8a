use crate::core::commands::Escapes;
use crate::core::env::{expand_env_vars, EnvVarManager};

/// Prompt used when the prompt variable is unset.
pub(crate) const DEFAULT_PROMPT: &str = "$PWD> ";

pub(crate) trait EnvironmentHandler {
    fn render_prompt(&self) -> String;
}

impl EnvironmentHandler for super::Shell {
    fn render_prompt(&self) -> String {
        render_prompt(self.state.env(), self.config.prompt_var(), self.config.escapes())
    }
}

/// Expand the prompt template held in `prompt_var`.
///
/// The template goes through the same variable expansion as command lines,
/// and the space escape turns into a real space. A template that cannot be
/// expanded is shown as written.
pub(crate) fn render_prompt(env: &EnvVarManager, prompt_var: &str, escapes: Escapes) -> String {
    let template = env.get(prompt_var).unwrap_or(DEFAULT_PROMPT);
    let expanded = expand_env_vars(template, env).unwrap_or_else(|_| template.to_string());
    expanded.replace(escapes.space, " ")
}
