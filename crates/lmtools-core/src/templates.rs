//! Built-in prompt templates and system prompts.
//!
//! Placeholders: `{{username}}`, `{{conversation}}` and, for translation,
//! `{{unread}}` and `{{language}}`.

pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an assistant that summarizes chat conversations concisely and \
suggests natural replies that fit the tone of the conversation.";

pub const DEFAULT_SUMMARY_TEMPLATE: &str = r#"Summarize the following chat conversation for {{username}}.

Conversation:
```
{{conversation}}
```

Cover the main topics, any decisions or open questions, and anything that needs {{username}}'s attention.
Then suggest up to three short replies {{username}} could send next.

Respond in JSON using exactly this shape:
```json
{
  "summary": "summary of the conversation",
  "suggested_replies": ["reply 1", "reply 2", "reply 3"]
}
```"#;

pub const TRANSLATION_SYSTEM_PROMPT: &str = "You are a professional translator. Use the context of the conversation \
to produce natural, accurate translations.";

pub const DEFAULT_TRANSLATION_TEMPLATE: &str = r#"Translate the messages {{username}} has not read yet into {{language}}, taking the whole chat conversation into account.

User name: {{username}}

Conversation:
```
{{conversation}}
```

Unread messages:
```
{{unread}}
```

When translating:
1. Keep the flow and context of the conversation so the translation reads naturally.
2. Render internet slang and abbreviations with expressions that fit the target culture.
3. Use the commonly accepted {{language}} terms for technical vocabulary.
4. Explain any slang, idioms and abbreviations in detail.

Return the result as JSON, for example:
```json
{
  "originalLastMessage": "original message",
  "translatedLastMessage": "translated message",
  "slangAndIdioms": [
    {
      "original": "slang or idiom",
      "meaning": "actual meaning",
      "equivalent": "equivalent expression in {{language}}",
      "usage": "when it is used",
      "formality": "formal/informal/slang"
    }
  ],
  "abbreviations": [
    {
      "abbr": "abbreviation",
      "fullForm": "full form",
      "meaning": "meaning",
      "commonUsage": "common usage"
    }
  ],
  "grammarNotes": [
    {
      "pattern": "grammar pattern",
      "explanation": "explanation",
      "examples": ["example 1", "example 2"]
    }
  ]
}
```"#;

/// English name for a language code, or the code itself when unknown.
pub fn language_name(code: &str) -> &str {
    match code.to_ascii_lowercase().as_str() {
        "ko" => "Korean",
        "en" => "English",
        "ja" => "Japanese",
        "zh" => "Chinese",
        "es" => "Spanish",
        "fr" => "French",
        "de" => "German",
        _ => code,
    }
}
