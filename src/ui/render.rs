//! Device-list renderer.
//!
//! Turns a registry snapshot into one text row per device:
//!
//! ```text
//! BLE Devices              <- optional title row
//! Keyboard K380 (-48 dBm)
//! 4C:0A:11:22:33:44 (-71 dBm)   <- unnamed devices show their address
//! ```
//!
//! The renderer is a pure function of (snapshot, metrics, state).  Scroll
//! position lives in the caller-owned [`RenderState`]; every call to
//! [`ListRenderer::render`] counts as one tick of the auto-scroll clock.

use core::fmt::Write;

use heapless::String;

use crate::ble::registry::DeviceRecord;
use crate::config::{DEFAULT_SCROLL_INTERVAL_TICKS, EMPTY_PLACEHOLDER, LINE_CAPACITY, TITLE_CAPACITY};
use crate::ui::input_logic::{max_offset, scroll_down, scroll_up};
use crate::ui::surface::{DisplaySurface, Font, SurfaceError};

/// Scroll position carried between render passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RenderState {
    /// Index of the first record shown.
    pub scroll_offset: usize,
    /// List rows that fit on the surface, as of the last render.
    pub visible_rows: usize,
    /// Render passes since the offset last moved.
    pub ticks_since_advance: u32,
}

impl RenderState {
    pub const fn new() -> Self {
        Self {
            scroll_offset: 0,
            visible_rows: 0,
            ticks_since_advance: 0,
        }
    }

    /// Manual navigation: one row up.  Restarts the auto-scroll interval.
    pub fn scroll_up(&mut self) {
        self.scroll_offset = scroll_up(self.scroll_offset);
        self.ticks_since_advance = 0;
    }

    /// Manual navigation: one row down, stopping at the last full page.
    pub fn scroll_down(&mut self, record_count: usize) {
        let max = max_offset(record_count, self.visible_rows.max(1));
        self.scroll_offset = scroll_down(self.scroll_offset, max);
        self.ticks_since_advance = 0;
    }

    /// Back to the top of the list.
    pub fn reset(&mut self) {
        self.scroll_offset = 0;
        self.ticks_since_advance = 0;
    }
}

/// Row geometry derived from the font and surface.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Layout {
    /// Row index of the first list entry (1 when a title is shown).
    pub first_list_row: u32,
    /// Rows available to list entries, at least one.
    pub visible_rows: usize,
    /// Characters per row, if the font is monospaced.
    pub columns: Option<usize>,
}

/// Draws the device list and drives auto-scroll.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ListRenderer {
    scroll_interval: u32,
    title: Option<String<TITLE_CAPACITY>>,
}

impl ListRenderer {
    pub const fn new() -> Self {
        Self {
            scroll_interval: DEFAULT_SCROLL_INTERVAL_TICKS,
            title: None,
        }
    }

    /// Advance the list one row every `ticks` render passes (minimum 1).
    pub fn with_scroll_interval(mut self, ticks: u32) -> Self {
        self.scroll_interval = ticks.max(1);
        self
    }

    /// Reserve the top row for `title` (truncated to fit).
    pub fn with_title(mut self, title: &str) -> Self {
        let mut s = String::new();
        for c in title.chars() {
            if s.push(c).is_err() {
                break;
            }
        }
        self.title = Some(s);
        self
    }

    pub fn scroll_interval(&self) -> u32 {
        self.scroll_interval
    }

    pub fn layout<F, S>(&self, font: &F, surface: &S) -> Layout
    where
        F: Font + ?Sized,
        S: DisplaySurface + ?Sized,
    {
        let (width, height) = surface.dimensions();
        let line_height = font.line_height().max(1);
        let total_rows = (height / line_height).max(1);
        let first_list_row = if self.title.is_some() && total_rows >= 2 {
            1
        } else {
            0
        };
        let columns = font
            .char_width()
            .filter(|w| *w > 0)
            .map(|w| (width / w) as usize);

        Layout {
            first_list_row,
            visible_rows: (total_rows - first_list_row) as usize,
            columns,
        }
    }

    /// Draw the visible slice of `records` and return the next state.
    ///
    /// `records` must already be in display order (see
    /// [`DeviceRegistry::snapshot`](crate::ble::registry::DeviceRegistry::snapshot)).
    /// On error the surface may hold a partial frame; the caller should
    /// keep its previous state and retry on the next tick.
    pub fn render<F, S>(
        &self,
        records: &[DeviceRecord],
        font: &F,
        surface: &mut S,
        state: RenderState,
    ) -> Result<RenderState, SurfaceError>
    where
        F: Font + ?Sized,
        S: DisplaySurface + ?Sized,
    {
        let layout = self.layout(font, &*surface);
        let count = records.len();
        let max = max_offset(count, layout.visible_rows);

        let mut next = RenderState {
            scroll_offset: state.scroll_offset.min(max),
            visible_rows: layout.visible_rows,
            ticks_since_advance: state.ticks_since_advance,
        };

        surface.clear()?;

        if let Some(title) = &self.title {
            if layout.first_list_row > 0 {
                draw_line(surface, 0, title, layout.columns)?;
            }
        }

        if records.is_empty() {
            draw_line(surface, layout.first_list_row, EMPTY_PLACEHOLDER, layout.columns)?;
            next.ticks_since_advance = 0;
            return Ok(next);
        }

        let visible = records
            .iter()
            .skip(next.scroll_offset)
            .take(layout.visible_rows);
        for (row, record) in (layout.first_list_row..).zip(visible) {
            let line = format_row(record);
            draw_line(surface, row, &line, layout.columns)?;
        }

        if count <= layout.visible_rows {
            next.scroll_offset = 0;
            next.ticks_since_advance = 0;
        } else {
            next.ticks_since_advance = next.ticks_since_advance.saturating_add(1);
            if next.ticks_since_advance >= self.scroll_interval {
                next.ticks_since_advance = 0;
                next.scroll_offset = if next.scroll_offset >= max {
                    0
                } else {
                    next.scroll_offset + 1
                };
            }
        }

        Ok(next)
    }
}

impl Default for ListRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `"<name> (<rssi> dBm)"`, with the address standing in for a missing name.
pub fn format_row(record: &DeviceRecord) -> String<LINE_CAPACITY> {
    let mut line = String::new();
    let _ = if record.has_name() {
        write!(line, "{} ({} dBm)", record.name, record.rssi)
    } else {
        write!(line, "{} ({} dBm)", record.address, record.rssi)
    };
    line
}

/// Longest prefix of `text` with at most `columns` characters.
pub fn truncate_columns(text: &str, columns: usize) -> &str {
    match text.char_indices().nth(columns) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

fn draw_line<S>(surface: &mut S, row: u32, text: &str, columns: Option<usize>) -> Result<(), SurfaceError>
where
    S: DisplaySurface + ?Sized,
{
    let text = match columns {
        Some(columns) => truncate_columns(text, columns),
        None => text,
    };
    surface.draw_text(row, text)
}
