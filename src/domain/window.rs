use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::series::TimeSeriesTable;

#[cfg(debug_assertions)]
use crate::config::DEBUG_FLAGS;

/// Inclusive `[min, max]` range of indices into a table's date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexWindow {
    pub min: usize,
    pub max: usize,
}

impl IndexWindow {
    pub fn new(min: usize, max: usize) -> Self {
        Self { min, max }
    }

    /// Whole axis of a table with `len` rows. `None` for an empty table.
    pub fn full(len: usize) -> Option<Self> {
        len.checked_sub(1).map(|last| Self::new(0, last))
    }

    /// Bring the window inside `[0, len - 1]`, swapping inverted bounds.
    /// Tables and windows often come from different snapshots, so this never fails
    /// for a non-empty table.
    pub fn clamp_to(self, len: usize) -> Option<Self> {
        let last = len.checked_sub(1)?;
        let (lo, hi) = if self.min <= self.max {
            (self.min, self.max)
        } else {
            (self.max, self.min)
        };
        Some(Self::new(lo.min(last), hi.min(last)))
    }

    pub fn is_full(&self, len: usize) -> bool {
        Self::full(len) == Some(*self)
    }

    /// Number of rows covered.
    pub fn span(&self) -> usize {
        self.max.saturating_sub(self.min) + 1
    }

    pub fn contains(&self, index: usize) -> bool {
        (self.min..=self.max).contains(&index)
    }
}

/// Who is asking to move the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowSource {
    /// User dragged a slider handle.
    Slider,
    /// User drag-zoomed on the price chart.
    ChartZoom,
    /// Reset button.
    Reset,
    /// A new ticker was loaded.
    Load,
}

impl WindowSource {
    fn is_user_slider(self) -> bool {
        matches!(self, WindowSource::Slider)
    }
}

// ============================================================================
// WindowSync: single owner of the selected window
// ============================================================================

/// Owns the selected window for the loaded table. The slider and the chart both
/// propose changes through [`WindowSync::propose`]; neither writes the window
/// directly.
///
/// Two one-shot tokens keep the two views from echoing each other:
/// - after a programmatic change, slider proposals are ignored until
///   [`WindowSync::end_frame`], since they would only restate the old value;
/// - after any change that did not come from the chart, the chart is asked to
///   re-apply the window once via [`WindowSync::take_chart_sync`].
#[derive(Debug, Default, Clone)]
pub struct WindowSync {
    window: Option<IndexWindow>,
    len: usize,
    suppress_slider: bool,
    chart_sync_pending: bool,
}

impl WindowSync {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly loaded table of `len` rows at full range.
    pub fn load(&mut self, len: usize) -> bool {
        self.len = len;
        self.window = None;
        match IndexWindow::full(len) {
            Some(full) => self.propose(WindowSource::Load, full),
            None => false,
        }
    }

    pub fn window(&self) -> Option<IndexWindow> {
        self.window
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn is_full_range(&self) -> bool {
        self.window.map(|w| w.is_full(self.len)).unwrap_or(true)
    }

    pub fn is_slider_suppressed(&self) -> bool {
        self.suppress_slider
    }

    /// Single update path for the window. Returns `true` when the stored window changed.
    pub fn propose(&mut self, source: WindowSource, window: IndexWindow) -> bool {
        if source.is_user_slider() && self.suppress_slider {
            #[cfg(debug_assertions)]
            if DEBUG_FLAGS.print_window_sync {
                log::info!("[window] ignored slider echo {:?}", window);
            }
            return false;
        }

        let Some(clamped) = window.clamp_to(self.len) else {
            return false;
        };

        let changed = self.window != Some(clamped);
        self.window = Some(clamped);

        if !source.is_user_slider() {
            self.suppress_slider = true;
        }
        if source != WindowSource::ChartZoom && changed {
            self.chart_sync_pending = true;
        }

        #[cfg(debug_assertions)]
        if DEBUG_FLAGS.print_window_sync && changed {
            log::info!("[window] {:?} -> {:?}", source, clamped);
        }

        changed
    }

    pub fn reset(&mut self) -> bool {
        match IndexWindow::full(self.len) {
            Some(full) => self.propose(WindowSource::Reset, full),
            None => false,
        }
    }

    /// Consume the pending request for the chart to apply the window.
    pub fn take_chart_sync(&mut self) -> bool {
        std::mem::take(&mut self.chart_sync_pending)
    }

    /// Called once per rendered frame; releases the slider suppression token.
    pub fn end_frame(&mut self) {
        self.suppress_slider = false;
    }

    /// Dates shown under the two slider handles.
    pub fn caption_dates(&self, table: &TimeSeriesTable) -> Option<(NaiveDate, NaiveDate)> {
        let window = self.window?.clamp_to(table.len())?;
        Some((table.date(window.min)?, table.date(window.max)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::time_utils::parse_date;

    #[test]
    fn clamp_is_defensive() {
        assert_eq!(IndexWindow::new(2, 50).clamp_to(10), Some(IndexWindow::new(2, 9)));
        assert_eq!(IndexWindow::new(7, 3).clamp_to(10), Some(IndexWindow::new(3, 7)));
        assert_eq!(IndexWindow::new(20, 30).clamp_to(10), Some(IndexWindow::new(9, 9)));
        assert_eq!(IndexWindow::new(0, 3).clamp_to(0), None);
    }

    #[test]
    fn full_window() {
        assert_eq!(IndexWindow::full(5), Some(IndexWindow::new(0, 4)));
        assert_eq!(IndexWindow::full(0), None);
        assert!(IndexWindow::new(0, 4).is_full(5));
        assert!(!IndexWindow::new(1, 4).is_full(5));
        assert_eq!(IndexWindow::new(2, 4).span(), 3);
    }

    #[test]
    fn load_starts_at_full_range() {
        let mut sync = WindowSync::new();
        assert!(sync.load(100));
        assert_eq!(sync.window(), Some(IndexWindow::new(0, 99)));
        assert!(sync.is_full_range());
        assert!(sync.take_chart_sync());
        assert!(!sync.take_chart_sync());
    }

    #[test]
    fn chart_zoom_suppresses_slider_echo_for_one_frame() {
        let mut sync = WindowSync::new();
        sync.load(100);
        sync.end_frame();
        sync.take_chart_sync();

        assert!(sync.propose(WindowSource::ChartZoom, IndexWindow::new(10, 40)));
        // Zoom came from the chart, so the chart does not need to re-apply it
        assert!(!sync.take_chart_sync());

        // Slider still reporting its stale value in the same frame
        assert!(!sync.propose(WindowSource::Slider, IndexWindow::new(0, 99)));
        assert_eq!(sync.window(), Some(IndexWindow::new(10, 40)));

        sync.end_frame();
        assert!(sync.propose(WindowSource::Slider, IndexWindow::new(12, 40)));
        assert_eq!(sync.window(), Some(IndexWindow::new(12, 40)));
        assert!(sync.take_chart_sync());
    }

    #[test]
    fn slider_and_chart_converge() {
        let mut sync = WindowSync::new();
        sync.load(50);
        sync.end_frame();

        sync.propose(WindowSource::Slider, IndexWindow::new(5, 20));
        sync.end_frame();
        // Chart re-applies the window and reports the same bounds back
        assert!(sync.take_chart_sync());
        assert!(!sync.propose(WindowSource::ChartZoom, IndexWindow::new(5, 20)));
        assert_eq!(sync.window(), Some(IndexWindow::new(5, 20)));
    }

    #[test]
    fn reset_returns_to_full_range() {
        let mut sync = WindowSync::new();
        sync.load(10);
        sync.end_frame();
        sync.propose(WindowSource::Slider, IndexWindow::new(3, 4));
        assert!(!sync.is_full_range());
        assert!(sync.reset());
        assert!(sync.is_full_range());
        assert!(sync.is_slider_suppressed());
    }

    #[test]
    fn out_of_bounds_proposals_are_clamped() {
        let mut sync = WindowSync::new();
        sync.load(10);
        sync.end_frame();
        sync.propose(WindowSource::Slider, IndexWindow::new(4, 500));
        assert_eq!(sync.window(), Some(IndexWindow::new(4, 9)));
    }

    #[test]
    fn captions_follow_the_window() {
        let dates = ["2023-01-02", "2023-01-03", "2023-01-04", "2023-01-05"]
            .iter()
            .map(|s| parse_date(s).unwrap())
            .collect();
        let table = TimeSeriesTable::from_columns(dates, []).unwrap();
        let mut sync = WindowSync::new();
        sync.load(table.len());
        sync.end_frame();
        sync.propose(WindowSource::Slider, IndexWindow::new(1, 2));

        let (lo, hi) = sync.caption_dates(&table).unwrap();
        assert_eq!(lo, parse_date("2023-01-03").unwrap());
        assert_eq!(hi, parse_date("2023-01-04").unwrap());
    }
}
