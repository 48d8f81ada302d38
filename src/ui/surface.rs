//! Capabilities the list renderer draws through.
//!
//! The renderer never touches pixels.  It asks a [`Font`] how tall a text
//! line is (and, for monospaced fonts, how wide a character is) and hands
//! whole rows of text to a [`DisplaySurface`].

/// Errors a surface can report while drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SurfaceError {
    /// The surface is in use (e.g. a flush is in flight); try next tick.
    Busy,
    /// The underlying display rejected the operation.
    Unavailable,
}

/// Font metrics, in the same units as the surface dimensions.
pub trait Font {
    /// Height of one text row.
    fn line_height(&self) -> u32;

    /// Advance width of one character, if the font is monospaced.
    fn char_width(&self) -> Option<u32> {
        None
    }
}

/// A row-addressed text surface.
pub trait DisplaySurface {
    /// `(width, height)` of the drawable area.
    fn dimensions(&self) -> (u32, u32);

    /// Blank the whole surface before a new frame.
    fn clear(&mut self) -> Result<(), SurfaceError> {
        Ok(())
    }

    /// Draw `text` starting at the left edge of text row `row`.
    ///
    /// Text wider than the surface is clipped by the surface.
    fn draw_text(&mut self, row: u32, text: &str) -> Result<(), SurfaceError>;
}

impl<T: Font + ?Sized> Font for &T {
    fn line_height(&self) -> u32 {
        (**self).line_height()
    }

    fn char_width(&self) -> Option<u32> {
        (**self).char_width()
    }
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for &mut T {
    fn dimensions(&self) -> (u32, u32) {
        (**self).dimensions()
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        (**self).clear()
    }

    fn draw_text(&mut self, row: u32, text: &str) -> Result<(), SurfaceError> {
        (**self).draw_text(row, text)
    }
}

/// A character-cell font: every glyph is one unit wide and one unit tall.
///
/// Pair with surfaces whose dimensions are given in cells (text-mode LCDs,
/// terminal-style displays).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellFont;

impl Font for CellFont {
    fn line_height(&self) -> u32 {
        1
    }

    fn char_width(&self) -> Option<u32> {
        Some(1)
    }
}
