//! Root layout computation for header + progress + step view + status bar.

use ratatui::layout::{Constraint, Layout, Rect};

/// Widest the step view grows; wider terminals center it.
pub const MAX_CONTENT_WIDTH: u16 = 100;

/// Computed layout regions for a single frame.
pub struct AppLayout {
    /// Step title row.
    pub header: Rect,
    /// Progress gauge row.
    pub progress: Rect,
    /// Step view.
    pub main: Rect,
    /// Status bar (bottom row).
    pub status: Rect,
}

impl AppLayout {
    /// Compute layout regions from the terminal area.
    pub fn compute(area: Rect) -> Self {
        let rows = Layout::vertical([
            Constraint::Length(1), // Header
            Constraint::Length(1), // Progress
            Constraint::Min(1),    // Step view
            Constraint::Length(1), // Status bar
        ])
        .split(area);

        let main = if rows[2].width > MAX_CONTENT_WIDTH {
            let margin = (rows[2].width - MAX_CONTENT_WIDTH) / 2;
            Rect {
                x: rows[2].x + margin,
                width: MAX_CONTENT_WIDTH,
                ..rows[2]
            }
        } else {
            rows[2]
        };

        AppLayout {
            header: rows[0],
            progress: rows[1],
            main,
            status: rows[3],
        }
    }
}
