//! Page-level lookups outside the message list: the composer draft, the
//! signed-in user's display name and the channel id in the location path.

use crate::cascade::SelectorCascade;
use crate::dom::Element;
use crate::error::SelectorError;
use crate::selector::Selector;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSelectors {
    pub editor: String,
    pub editor_text_nodes: String,
    pub editor_fallback_container: String,
    pub editor_fallback_editable: String,
    pub self_name: Vec<String>,
}

impl Default for PageSelectors {
    fn default() -> Self {
        Self {
            editor: r#"[data-slate-editor="true"]"#.to_string(),
            editor_text_nodes: r#"[data-slate-node="text"]"#.to_string(),
            editor_fallback_container: r#"[class*="slateTextArea"]"#.to_string(),
            editor_fallback_editable: r#"[contenteditable="true"]"#.to_string(),
            self_name: vec![
                r#"[class*="nameTag"] [class*="username"]"#.to_string(),
                r#"[class*="accountProfileCard"] [class*="userTag"]"#.to_string(),
                r#"[class*="panelTitle"]"#.to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone)]
pub struct PageReader {
    editor: Selector,
    editor_text_nodes: Selector,
    editor_fallback_container: Selector,
    editor_fallback_editable: Selector,
    self_name: SelectorCascade,
}

impl PageReader {
    pub fn new(selectors: &PageSelectors) -> Result<Self, SelectorError> {
        Ok(Self {
            editor: Selector::parse(&selectors.editor)?,
            editor_text_nodes: Selector::parse(&selectors.editor_text_nodes)?,
            editor_fallback_container: Selector::parse(&selectors.editor_fallback_container)?,
            editor_fallback_editable: Selector::parse(&selectors.editor_fallback_editable)?,
            self_name: SelectorCascade::parse("self name", &selectors.self_name)?,
        })
    }

    pub fn with_default_selectors() -> Result<Self, SelectorError> {
        Self::new(&PageSelectors::default())
    }

    /// Text the user has typed but not sent yet, trimmed. Empty if none.
    pub fn draft_input(&self, document: &Element) -> String {
        let text = match document.query_selector(&self.editor) {
            Some(editor) => editor
                .query_selector_all(&self.editor_text_nodes)
                .into_iter()
                .map(Element::text_content)
                .collect::<String>(),
            None => document
                .query_selector(&self.editor_fallback_container)
                .and_then(|container| container.query_selector(&self.editor_fallback_editable))
                .map(Element::text_content)
                .unwrap_or_default(),
        };
        text.trim().to_string()
    }

    /// Display name shown in the account panel, if rendered.
    pub fn self_name(&self, document: &Element) -> Option<String> {
        self.self_name.first_in(document).and_then(|(el, _)| {
            let name = el.text_content().trim().to_string();
            (!name.is_empty()).then_some(name)
        })
    }
}

/// Channel id from a location path such as `/channels/<guild>/<channel>`.
///
/// Returns the leading digits of the segment after the guild segment.
pub fn channel_id_from_path(path: &str) -> Option<String> {
    let mut rest = path;
    while let Some(pos) = rest.find("/channels/") {
        rest = &rest[pos + "/channels/".len()..];

        let Some((guild, after)) = rest.split_once('/') else {
            return None;
        };
        if guild.is_empty() {
            continue;
        }
        let digits: String = after.chars().take_while(char::is_ascii_digit).collect();
        if !digits.is_empty() {
            return Some(digits);
        }
    }
    None
}

/// Convenience wrapper over [`PageReader::draft_input`] with default selectors.
pub fn read_draft_input(document: &Element) -> String {
    PageReader::with_default_selectors()
        .map(|reader| reader.draft_input(document))
        .unwrap_or_default()
}

/// Convenience wrapper over [`PageReader::self_name`] with default selectors.
pub fn read_self_name(document: &Element) -> Option<String> {
    PageReader::with_default_selectors()
        .ok()
        .and_then(|reader| reader.self_name(document))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_id_from_path() {
        assert_eq!(
            channel_id_from_path("/channels/1234/5678"),
            Some("5678".to_string())
        );
        assert_eq!(
            channel_id_from_path("/channels/@me/99887766"),
            Some("99887766".to_string())
        );
        assert_eq!(
            channel_id_from_path("/channels/1/22/33"),
            Some("22".to_string())
        );
        assert_eq!(channel_id_from_path("/channels/1234"), None);
        assert_eq!(channel_id_from_path("/store"), None);
        assert_eq!(channel_id_from_path("/channels/1234/general"), None);
    }

    #[test]
    fn test_draft_from_slate_text_nodes() {
        let doc = Element::new("body").with_child(
            Element::new("div")
                .with_attr("data-slate-editor", "true")
                .with_child(Element::new("span").with_attr("data-slate-node", "text").with_text("  see you "))
                .with_child(Element::new("span").with_attr("data-slate-node", "text").with_text("tomorrow  ")),
        );
        assert_eq!(read_draft_input(&doc), "see you tomorrow");
    }

    #[test]
    fn test_draft_fallback_contenteditable() {
        let doc = Element::new("body").with_child(
            Element::new("div").with_class("slateTextArea_ec4baf").with_child(
                Element::new("div")
                    .with_attr("contenteditable", "true")
                    .with_text("draft reply"),
            ),
        );
        assert_eq!(read_draft_input(&doc), "draft reply");
        assert_eq!(read_draft_input(&Element::new("body")), "");
    }

    #[test]
    fn test_self_name_from_account_panel() {
        let doc = Element::new("body").with_child(
            Element::new("section").with_class("nameTag_b2ca13").with_child(
                Element::new("div").with_class("username_a1b2c3").with_text(" Sam "),
            ),
        );
        assert_eq!(read_self_name(&doc), Some("Sam".to_string()));
        assert_eq!(read_self_name(&Element::new("body")), None);
    }
}
