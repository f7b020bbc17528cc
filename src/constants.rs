//! Shared crate-wide constants.
//!
//! Class names, attribute names and element ids form the contract with the
//! surrounding page: external stylesheets target them, so they must stay
//! stable across releases.

/// Class of the floating window shell.
pub const CLASS_WINDOW: &str = "v-window";
/// Class of the title bar inside a shell.
pub const CLASS_TITLE: &str = "v-window-title";
/// Class of the container that hosts the floated element.
pub const CLASS_CONTENT_CONTAINER: &str = "v-window-content-container";
/// Class of the bottom-right resize handle.
pub const CLASS_RESIZE: &str = "v-window-resize";
/// Class of the stand-in left at the element's docked position.
pub const CLASS_PLACEHOLDER: &str = "v-window-placeholder";
/// Class of the label box inside the placeholder.
pub const CLASS_PLACEHOLDER_LABEL: &str = "v-window-placeholder-label";
/// Class of the title bar's button panel.
pub const CLASS_BUTTON_PANEL: &str = "v-window-button-panel";
/// Class of the close button.
pub const CLASS_CLOSE_BUTTON: &str = "v-window-close-button";
/// Class of the shared "open as window" affordance.
pub const CLASS_TRIGGER: &str = "v-window-trigger";

/// Element id of the shared trigger. At most one element carries it.
pub const TRIGGER_ELEMENT_ID: &str = "v-window-trigger";
/// Tooltip shown on the shared trigger.
pub const TRIGGER_TITLE: &str = "Open as a window";

/// Boolean attribute present on an element for as long as it floats.
pub const FLOATING_MARKER: &str = "v-windowed";

/// Stacking value every shell starts from and falls back to on reset.
pub const Z_INDEX_BASELINE: i64 = 999;

/// The counter is reset before an increment would exceed this value.
pub const Z_INDEX_CEILING: i64 = 5_000_000;

/// Stacking value of the shared trigger; it sits below every shell.
pub const TRIGGER_Z_INDEX: i64 = 99;
