//! Shared crate-wide constants.

use std::time::Duration;

/// After the combo box scrolls its dropdown to keep the highlighted row
/// visible, hover events are ignored for this long.
///
/// Scrolling moves rows underneath a stationary pointer, which produces
/// `mouseover` events the user did not cause. Without the window the
/// highlight would jump to whatever row slid under the pointer.
pub const HOVER_SUPPRESS_AFTER_SCROLL: Duration = Duration::from_millis(250);

/// Quiet period before the filter control reports free-text edits.
pub const FILTER_TEXT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Splitter divider height used when the `dividerHeight` property is absent.
///
/// Units: rows.
pub const DEFAULT_DIVIDER_HEIGHT: f64 = 1.0;

/// Row height assumed for dropdown items that have not been laid out yet.
pub const DEFAULT_DROPDOWN_ROW_HEIGHT: f64 = 1.0;

/// Rows a dropdown occupies at most before it scrolls.
pub const DROPDOWN_MAX_ROWS: u16 = 8;

/// Upper bound on timer turns run by [`crate::dom::Dom::run_until_idle`].
pub const MAX_TIMER_DRAIN_PASSES: usize = 64;

/// Default host tick when no timer is pending.
pub const DEFAULT_TICK: Duration = Duration::from_millis(50);
