use crate::error::{LmToolsError, Result};
use crate::host::ModuleLocator;
use lmtools_extract::{channel_id_from_path, Element, PageReader};
use tracing::{debug, warn};

/// Used when no source yields a name.
pub const DEFAULT_SELF_NAME: &str = "User";

/// Display name of the signed-in user.
///
/// Host user record first (`global_name`, then `username`), then the
/// account panel in `document`, then [`DEFAULT_SELF_NAME`].
pub fn resolve_self_name(
    locator: &dyn ModuleLocator,
    page: &PageReader,
    document: Option<&Element>,
) -> String {
    if let Some(user) = locator.current_user() {
        let name = [user.global_name, user.username]
            .into_iter()
            .flatten()
            .find(|name| !name.trim().is_empty());
        if let Some(name) = name {
            debug!(name = %name, "Resolved self name from user store");
            return name;
        }
    }

    if let Some(name) = document.and_then(|doc| page.self_name(doc)) {
        debug!(name = %name, "Resolved self name from account panel");
        return name;
    }

    warn!("Could not resolve self name, using '{}'", DEFAULT_SELF_NAME);
    DEFAULT_SELF_NAME.to_string()
}

/// Selected channel from the host, else parsed from the location path.
pub fn resolve_channel_id(locator: &dyn ModuleLocator) -> Result<String> {
    if let Some(id) = locator.selected_channel_id().filter(|id| !id.is_empty()) {
        return Ok(id);
    }

    locator
        .location_path()
        .as_deref()
        .and_then(channel_id_from_path)
        .ok_or(LmToolsError::NoChannel)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::CurrentUser;

    #[derive(Default)]
    struct FakeLocator {
        user: Option<CurrentUser>,
        channel: Option<String>,
        path: Option<String>,
    }

    impl ModuleLocator for FakeLocator {
        fn current_user(&self) -> Option<CurrentUser> {
            self.user.clone()
        }

        fn selected_channel_id(&self) -> Option<String> {
            self.channel.clone()
        }

        fn location_path(&self) -> Option<String> {
            self.path.clone()
        }
    }

    fn page() -> PageReader {
        PageReader::with_default_selectors().unwrap()
    }

    #[test]
    fn test_self_name_prefers_global_name() {
        let locator = FakeLocator {
            user: Some(CurrentUser {
                global_name: Some("Sam Lee".into()),
                username: Some("sam_l".into()),
            }),
            ..Default::default()
        };
        assert_eq!(resolve_self_name(&locator, &page(), None), "Sam Lee");
    }

    #[test]
    fn test_self_name_falls_back_to_username_then_panel() {
        let locator = FakeLocator {
            user: Some(CurrentUser {
                global_name: Some("  ".into()),
                username: Some("sam_l".into()),
            }),
            ..Default::default()
        };
        assert_eq!(resolve_self_name(&locator, &page(), None), "sam_l");

        let doc = Element::new("body").with_child(
            Element::new("div")
                .with_class("panelTitle_x1")
                .with_text("Panel Name"),
        );
        assert_eq!(
            resolve_self_name(&FakeLocator::default(), &page(), Some(&doc)),
            "Panel Name"
        );
        assert_eq!(resolve_self_name(&FakeLocator::default(), &page(), None), DEFAULT_SELF_NAME);
    }

    #[test]
    fn test_channel_id_sources() {
        let locator = FakeLocator {
            channel: Some("111".into()),
            path: Some("/channels/1/222".into()),
            ..Default::default()
        };
        assert_eq!(resolve_channel_id(&locator).unwrap(), "111");

        let locator = FakeLocator {
            path: Some("/channels/1/222".into()),
            ..Default::default()
        };
        assert_eq!(resolve_channel_id(&locator).unwrap(), "222");

        let locator = FakeLocator {
            path: Some("/settings".into()),
            ..Default::default()
        };
        assert!(matches!(resolve_channel_id(&locator), Err(LmToolsError::NoChannel)));
    }
}
