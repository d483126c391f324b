//! Viewport geometry (pure).
//!
//! Maps an unbounded entry sequence onto a fixed number of terminal rows.

/// Rows reserved for chrome: header, status, top rule, bottom rule, footer.
pub const RESERVED_ROWS: u16 = 5;

/// Columns taken by the selection marker column at the start of each row.
pub const ROW_PREFIX_WIDTH: usize = 2;

/// Size used when the terminal cannot be queried at all.
pub const FALLBACK_SIZE: TermSize = TermSize { rows: 40, cols: 80 };

/// Terminal dimensions in character cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TermSize {
    /// Number of rows.
    pub rows: u16,
    /// Number of columns.
    pub cols: u16,
}

impl TermSize {
    /// Content area left after the fixed chrome rows.
    pub fn viewport(self) -> ViewportDimensions {
        ViewportDimensions::new(
            usize::from(self.cols),
            usize::from(self.rows.saturating_sub(RESERVED_ROWS)),
        )
    }
}

/// Size of the scrolling content area.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewportDimensions {
    /// Columns available per row.
    pub width: usize,
    /// Content rows.
    pub height: usize,
}

impl ViewportDimensions {
    /// Both dimensions are clamped to at least 1.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }
}

/// Half-open range of entry indices shown in the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    /// First visible index.
    pub start: usize,
    /// One past the last visible index.
    pub end: usize,
}

impl VisibleWindow {
    /// Number of entries in the window.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// True when nothing is visible.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// True when `index` is inside the window.
    pub fn contains(&self, index: usize) -> bool {
        (self.start..self.end).contains(&index)
    }
}

/// Window of `height` entries centered on `current`.
///
/// Near the end of the sequence the window is pulled back so it still holds
/// `height` entries; it is shorter only when the sequence itself is.
pub fn visible_window(current: usize, len: usize, height: usize) -> VisibleWindow {
    if len == 0 {
        return VisibleWindow { start: 0, end: 0 };
    }
    let height = height.max(1);
    let current = current.min(len - 1);

    let mut start = current.saturating_sub(height / 2);
    let end = (start + height).min(len);
    if end - start < height {
        start = end.saturating_sub(height);
    }
    VisibleWindow { start, end }
}

/// Largest useful horizontal offset for a line of `line_width` columns.
pub fn max_hscroll(line_width: usize, view_width: usize) -> usize {
    line_width.saturating_sub(view_width)
}

/// Clamp a horizontal offset to `[0, max(0, line_width - view_width)]`.
pub fn clamp_hscroll(offset: usize, line_width: usize, view_width: usize) -> usize {
    offset.min(max_hscroll(line_width, view_width))
}
