/// User interface module
///
/// This module handles every view of the window:
/// - Link, review and WiFi input forms (forms.rs)
/// - The appearance panel (customization.rs)
/// - The current code and its export actions (result.rs)
/// - The recent codes list (history.rs)
/// - Transient notifications (toast.rs)
pub mod customization;
pub mod forms;
pub mod history;
pub mod result;
pub mod toast;

use std::fmt;

use crate::state::data::ContentKind;

/// Input tabs, one per content kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Link,
    Review,
    Wifi,
}

impl Tab {
    pub const ALL: [Tab; 3] = [Tab::Link, Tab::Review, Tab::Wifi];

    pub fn for_kind(kind: ContentKind) -> Self {
        match kind {
            ContentKind::Link => Tab::Link,
            ContentKind::Review => Tab::Review,
            ContentKind::Wifi => Tab::Wifi,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tab::Link => "Link",
            Tab::Review => "Google Review",
            Tab::Wifi => "WiFi",
        })
    }
}
