use lmtools_types::PluginSettings;
use std::collections::BTreeMap;

/// Values substituted into a prompt template.
#[derive(Debug, Clone, Default)]
pub struct PromptVars {
    pub username: String,
    pub conversation: String,
    /// Additional `{{name}}` placeholders.
    pub extra: BTreeMap<String, String>,
}

impl PromptVars {
    pub fn new(username: impl Into<String>, conversation: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            conversation: conversation.into(),
            extra: BTreeMap::new(),
        }
    }

    pub fn with_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.insert(name.into(), value.into());
        self
    }
}

/// Where a resolved template came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateSource {
    Channel,
    UserDefault,
    BuiltIn,
}

/// Render `template`, replacing every occurrence of each placeholder.
///
/// A non-blank `draft` appends an instruction to steer suggestions toward
/// what the user is already writing.
pub fn compose(template: &str, vars: &PromptVars, draft: Option<&str>) -> String {
    let mut prompt = template
        .replace("{{username}}", &vars.username)
        .replace("{{conversation}}", &vars.conversation);
    for (name, value) in &vars.extra {
        prompt = prompt.replace(&format!("{{{{{}}}}}", name), value);
    }

    if let Some(draft) = draft.map(str::trim).filter(|d| !d.is_empty()) {
        prompt.push_str(&format!(
            "\n\nThe user has started writing this reply:\n\"\"\"\n{}\n\"\"\"\n\
             Take it into account and shape the suggested replies toward what the user is trying to say.",
            draft
        ));
    }

    prompt
}

/// Channel override, then the user's default, then `builtin`.
/// Blank entries count as unset.
pub fn resolve_template<'a>(
    settings: &'a PluginSettings,
    channel_id: &str,
    builtin: &'a str,
) -> (&'a str, TemplateSource) {
    let non_blank = |s: &&str| !s.trim().is_empty();

    if let Some(template) = settings.channel_prompt(channel_id).filter(non_blank) {
        return (template, TemplateSource::Channel);
    }
    if non_blank(&settings.default_prompt.as_str()) {
        return (settings.default_prompt.as_str(), TemplateSource::UserDefault);
    }
    (builtin, TemplateSource::BuiltIn)
}
