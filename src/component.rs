//! The BLE list display component.
//!
//! Binds a validated configuration to the font, surface and registry it
//! refers to, and exposes the two callbacks the firmware scheduler drives:
//! a periodic tick and button input.

use embassy_sync::blocking_mutex::raw::RawMutex;

use crate::ble::registry::DeviceRegistry;
use crate::schema::ValidatedConfig;
use crate::ui::render::{ListRenderer, RenderState};
use crate::ui::surface::{DisplaySurface, Font, SurfaceError};
use crate::ui::ButtonEvent;

pub struct BleListDisplay<'a, F, S, M, const N: usize>
where
    F: Font + ?Sized,
    S: DisplaySurface + ?Sized,
    M: RawMutex,
{
    id: &'a str,
    font: &'a F,
    surface: &'a mut S,
    registry: &'a DeviceRegistry<M, N>,
    renderer: ListRenderer,
    state: RenderState,
    skipped_frames: u32,
}

impl<'a, F, S, M, const N: usize> BleListDisplay<'a, F, S, M, N>
where
    F: Font + ?Sized,
    S: DisplaySurface + ?Sized,
    M: RawMutex,
{
    pub fn new(
        config: &ValidatedConfig<'a>,
        font: &'a F,
        surface: &'a mut S,
        registry: &'a DeviceRegistry<M, N>,
    ) -> Self {
        let mut renderer = ListRenderer::new().with_scroll_interval(config.scroll_interval);
        if let Some(title) = config.title {
            renderer = renderer.with_title(title);
        }

        Self {
            id: config.id,
            font,
            surface,
            registry,
            renderer,
            state: RenderState::new(),
            skipped_frames: 0,
        }
    }

    /// Render one frame from a fresh snapshot.
    ///
    /// On failure the frame is skipped: the scroll state is left as it was
    /// and the error is returned so the scheduler can retry next tick.
    pub fn on_tick(&mut self) -> Result<(), SurfaceError> {
        let snapshot = self.registry.snapshot();
        match self
            .renderer
            .render(&snapshot, self.font, &mut *self.surface, self.state)
        {
            Ok(next) => {
                self.state = next;
                Ok(())
            }
            Err(e) => {
                self.skipped_frames = self.skipped_frames.saturating_add(1);
                #[cfg(feature = "defmt")]
                defmt::debug!("{}: frame skipped ({})", self.id, e);
                Err(e)
            }
        }
    }

    /// Apply a debounced button press.
    pub fn on_button(&mut self, event: ButtonEvent) {
        match event {
            ButtonEvent::Up => self.state.scroll_up(),
            ButtonEvent::Down => self.state.scroll_down(self.registry.len()),
            ButtonEvent::Select => {
                self.registry.clear();
                self.state.reset();
                #[cfg(feature = "defmt")]
                defmt::info!("{}: device list cleared", self.id);
            }
        }
    }

    pub fn id(&self) -> &str {
        self.id
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    /// Frames dropped because the surface failed.
    pub fn skipped_frames(&self) -> u32 {
        self.skipped_frames
    }

    /// The borrowed surface, e.g. to flush a buffered display after a tick.
    pub fn surface_mut(&mut self) -> &mut S {
        self.surface
    }
}
