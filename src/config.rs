//! Chrome metrics and policy knobs for a [`Popout`](crate::Popout) service.
//!
//! The defaults are expressed in CSS pixels. Hosts that lay out in other
//! units (the terminal demo works in cells) pick a preset or override the
//! fields directly.

use std::time::Duration;

use crate::constants::{TRIGGER_Z_INDEX, Z_INDEX_BASELINE, Z_INDEX_CEILING};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopoutConfig {
    /// Height of a shell's title bar.
    pub title_bar_height: i32,
    /// Border width on every side of a shell.
    pub border_width: i32,
    /// Smallest width a resize may produce.
    pub min_width: i32,
    /// Smallest height a resize may produce.
    pub min_height: i32,
    /// Edge length of the square trigger affordance.
    pub trigger_size: i32,
    /// Edge length of the square resize handle.
    pub resize_handle_size: i32,
    /// Edge length of the square close button.
    pub close_button_size: i32,
    /// Gap between the close button and the right edge of the title bar.
    pub close_button_margin: i32,
    /// How long the trigger stays visible after a hover.
    pub auto_hide_delay: Duration,
    pub z_index_baseline: i64,
    pub z_index_ceiling: i64,
    pub trigger_z_index: i64,
}

impl PopoutConfig {
    /// Preset for hosts whose unit is one terminal cell.
    pub fn terminal() -> Self {
        Self {
            title_bar_height: 1,
            border_width: 1,
            min_width: 12,
            min_height: 4,
            trigger_size: 1,
            resize_handle_size: 1,
            close_button_size: 1,
            close_button_margin: 1,
            ..Self::default()
        }
    }

    /// Horizontal space the decoration adds around the content.
    pub fn chrome_width(&self) -> i32 {
        self.border_width.saturating_mul(2)
    }

    /// Vertical space the decoration adds around the content.
    pub fn chrome_height(&self) -> i32 {
        self.title_bar_height
            .saturating_add(self.border_width.saturating_mul(2))
    }
}

impl Default for PopoutConfig {
    fn default() -> Self {
        Self {
            title_bar_height: 25,
            border_width: 1,
            min_width: 100,
            min_height: 100,
            trigger_size: 20,
            resize_handle_size: 5,
            close_button_size: 15,
            close_button_margin: 5,
            auto_hide_delay: Duration::from_millis(5000),
            z_index_baseline: Z_INDEX_BASELINE,
            z_index_ceiling: Z_INDEX_CEILING,
            trigger_z_index: TRIGGER_Z_INDEX,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_chrome_matches_pixel_metrics() {
        let cfg = PopoutConfig::default();
        assert_eq!(cfg.chrome_width(), 2);
        assert_eq!(cfg.chrome_height(), 27);
        assert_eq!(cfg.auto_hide_delay, Duration::from_millis(5000));
    }

    #[test]
    fn terminal_preset_keeps_policy_values() {
        let cfg = PopoutConfig::terminal();
        assert_eq!(cfg.chrome_height(), 3);
        assert_eq!(cfg.z_index_baseline, Z_INDEX_BASELINE);
        assert_eq!(cfg.z_index_ceiling, Z_INDEX_CEILING);
    }
}
