//! `embedded-graphics` adapters for the surface capabilities.
//!
//! Any `DrawTarget` (the SSD1306 buffer on target, `MockDisplay` in tests)
//! becomes a [`DisplaySurface`]; any `MonoFont` becomes a [`Font`].

use embedded_graphics::mono_font::{MonoFont, MonoTextStyle};
use embedded_graphics::prelude::*;
use embedded_graphics::text::{Baseline, Text};

use crate::ui::surface::{DisplaySurface, Font, SurfaceError};

impl<'a> Font for MonoFont<'a> {
    fn line_height(&self) -> u32 {
        self.character_size.height
    }

    fn char_width(&self) -> Option<u32> {
        Some(self.character_size.width + self.character_spacing)
    }
}

/// Text-row surface over an `embedded-graphics` draw target.
pub struct GraphicsSurface<'f, D: DrawTarget> {
    target: D,
    style: MonoTextStyle<'f, D::Color>,
    background: D::Color,
    line_height: u32,
}

impl<'f, D: DrawTarget> GraphicsSurface<'f, D> {
    pub fn new(target: D, font: &'f MonoFont<'f>, foreground: D::Color, background: D::Color) -> Self {
        Self {
            target,
            style: MonoTextStyle::new(font, foreground),
            background,
            line_height: font.character_size.height,
        }
    }

    /// Access the draw target, e.g. to flush a buffered display.
    pub fn target_mut(&mut self) -> &mut D {
        &mut self.target
    }

    pub fn into_inner(self) -> D {
        self.target
    }
}

impl<D: DrawTarget> DisplaySurface for GraphicsSurface<'_, D> {
    fn dimensions(&self) -> (u32, u32) {
        let size = self.target.bounding_box().size;
        (size.width, size.height)
    }

    fn clear(&mut self) -> Result<(), SurfaceError> {
        self.target
            .clear(self.background)
            .map_err(|_| SurfaceError::Unavailable)
    }

    fn draw_text(&mut self, row: u32, text: &str) -> Result<(), SurfaceError> {
        let origin = self.target.bounding_box().top_left;
        let y = origin.y + (row * self.line_height) as i32;
        Text::with_baseline(text, Point::new(origin.x, y), self.style, Baseline::Top)
            .draw(&mut self.target)
            .map(|_| ())
            .map_err(|_| SurfaceError::Unavailable)
    }
}
