//! Capabilities the hosting chat client provides to the plugin.
//!
//! Every host service is injected through one of these traits instead of
//! being looked up globally, so orchestrators and tests can swap them out.

use crate::error::Result;
use serde_json::Value;

/// Registers and removes plugin stylesheets.
pub trait StyleRegistry: Send + Sync {
    fn add_style(&self, id: &str, css: &str);
    fn remove_style(&self, id: &str);
}

/// Key-value persistence scoped by plugin name.
pub trait SettingsStore: Send + Sync {
    fn load(&self, plugin: &str, key: &str) -> Option<Value>;
    fn save(&self, plugin: &str, key: &str, value: &Value) -> Result<()>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastKind {
    Info,
    Success,
    Error,
    Warning,
}

pub trait Notifier: Send + Sync {
    fn toast(&self, message: &str, kind: ToastKind);
}

/// Identity record of the signed-in user as the host exposes it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurrentUser {
    pub global_name: Option<String>,
    pub username: Option<String>,
}

/// Lookup of internal host state.
///
/// Each method returns `None` when the backing module could not be found.
pub trait ModuleLocator: Send + Sync {
    fn current_user(&self) -> Option<CurrentUser>;
    fn selected_channel_id(&self) -> Option<String>;
    /// Path portion of the current location, e.g. `/channels/1/2`.
    fn location_path(&self) -> Option<String>;
}

/// Injection of the plugin's controls into the message composer toolbar.
pub trait UiPatcher: Send + Sync {
    /// Patch the toolbar component. `false` when no patch target was found.
    fn patch_toolbar(&self) -> bool;
    /// Insert controls directly into a rendered toolbar container, if present.
    fn inject_into_container(&self) -> bool;
    fn unpatch_all(&self);
}
