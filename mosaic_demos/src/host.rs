// Copyright 2026 the Mosaic Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Clocks, presenters, and trace sinks for running demos.

use std::time::Instant;

use mosaic_core::backend::{Clock, Presenter};
use mosaic_core::damage::DamageRegion;
use mosaic_core::error::PresentError;
use mosaic_core::image::Image;
use mosaic_core::time::HostTime;
use mosaic_core::trace::{
    DamageRect, FrameBeginEvent, FrameSummary, PhaseBeginEvent, PhaseEndEvent, PresentEvent,
    SpriteChange, TraceSink,
};
use mosaic_debug::pretty::PrettyPrintSink;
use mosaic_debug::recorder::RecorderSink;

use crate::intent::{Input, InputSource, Script};

/// Nanoseconds since the clock was created.
#[derive(Clone, Copy, Debug)]
pub(crate) struct StdClock {
    origin: Instant,
}

impl StdClock {
    pub(crate) fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Clock for StdClock {
    fn now(&self) -> HostTime {
        HostTime(u64::try_from(self.origin.elapsed().as_nanos()).unwrap_or(u64::MAX))
    }
}

/// Presents nowhere; keeps damage statistics for the run summary.
#[derive(Clone, Debug, Default)]
pub(crate) struct HeadlessPresenter {
    pub(crate) frames: u64,
    pub(crate) full_frames: u64,
    pub(crate) damage_rects: u64,
}

impl Presenter for HeadlessPresenter {
    fn present(&mut self, _frame: &Image, damage: &DamageRegion) -> Result<(), PresentError> {
        self.frames += 1;
        match damage.rects() {
            None => self.full_frames += 1,
            Some(rects) => self.damage_rects += rects.len() as u64,
        }
        Ok(())
    }
}

/// Scripted input paired with a [`HeadlessPresenter`].
#[derive(Debug, Default)]
pub(crate) struct HeadlessHost {
    pub(crate) script: Script,
    pub(crate) presenter: HeadlessPresenter,
}

impl InputSource for HeadlessHost {
    fn poll(&mut self, frame_index: u64) -> Input {
        self.script.poll(frame_index)
    }
}

impl Presenter for HeadlessHost {
    fn present(&mut self, frame: &Image, damage: &DamageRegion) -> Result<(), PresentError> {
        self.presenter.present(frame, damage)
    }
}

/// Forwards events to a pretty printer and a recorder, either optional.
#[derive(Debug, Default)]
pub(crate) struct DemoSink {
    pub(crate) pretty: Option<PrettyPrintSink>,
    pub(crate) recorder: Option<RecorderSink>,
}

impl DemoSink {
    pub(crate) fn is_active(&self) -> bool {
        self.pretty.is_some() || self.recorder.is_some()
    }

    fn each(&mut self, mut f: impl FnMut(&mut dyn TraceSink)) {
        if let Some(pretty) = &mut self.pretty {
            f(pretty);
        }
        if let Some(recorder) = &mut self.recorder {
            f(recorder);
        }
    }
}

impl TraceSink for DemoSink {
    fn on_frame_begin(&mut self, e: &FrameBeginEvent) {
        self.each(|s| s.on_frame_begin(e));
    }

    fn on_phase_begin(&mut self, e: &PhaseBeginEvent) {
        self.each(|s| s.on_phase_begin(e));
    }

    fn on_phase_end(&mut self, e: &PhaseEndEvent) {
        self.each(|s| s.on_phase_end(e));
    }

    fn on_present(&mut self, e: &PresentEvent) {
        self.each(|s| s.on_present(e));
    }

    fn on_frame_summary(&mut self, summary: &FrameSummary) {
        self.each(|s| s.on_frame_summary(summary));
    }

    fn on_sprite_changes(&mut self, frame_index: u64, changes: &[SpriteChange]) {
        self.each(|s| s.on_sprite_changes(frame_index, changes));
    }

    fn on_damage_rects(&mut self, frame_index: u64, rects: &[DamageRect]) {
        self.each(|s| s.on_damage_rects(frame_index, rects));
    }
}

#[cfg(feature = "window")]
pub(crate) use window::WindowHost;

#[cfg(feature = "window")]
mod window {
    use std::collections::BTreeSet;

    use minifb::{Key as WinKey, Window, WindowOptions};
    use mosaic_core::backend::Presenter;
    use mosaic_core::damage::DamageRegion;
    use mosaic_core::error::PresentError;
    use mosaic_core::image::Image;

    use crate::intent::{Input, InputSource, Key};

    /// A desktop window showing the backbuffer and reading the keyboard.
    pub(crate) struct WindowHost {
        window: Window,
        buffer: Vec<u32>,
    }

    impl std::fmt::Debug for WindowHost {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("WindowHost").finish_non_exhaustive()
        }
    }

    impl WindowHost {
        pub(crate) fn open(title: &str, width: u32, height: u32) -> anyhow::Result<Self> {
            let window = Window::new(
                title,
                width as usize,
                height as usize,
                WindowOptions::default(),
            )
            .map_err(|e| anyhow::anyhow!("cannot open window: {e}"))?;
            Ok(Self {
                window,
                buffer: Vec::new(),
            })
        }
    }

    fn map_key(key: WinKey) -> Option<Key> {
        Some(match key {
            WinKey::Left => Key::Left,
            WinKey::Right => Key::Right,
            WinKey::Up => Key::Up,
            WinKey::Down => Key::Down,
            WinKey::A => Key::A,
            WinKey::S => Key::S,
            WinKey::D => Key::D,
            WinKey::Z => Key::Z,
            WinKey::X => Key::X,
            WinKey::Space => Key::Space,
            WinKey::Key1 => Key::Num1,
            WinKey::Key2 => Key::Num2,
            WinKey::Key3 => Key::Num3,
            WinKey::Escape => Key::Escape,
            WinKey::Q => Key::Q,
            _ => return None,
        })
    }

    impl InputSource for WindowHost {
        // Key state is refreshed by `update_with_buffer` in `present`.
        fn poll(&mut self, _frame_index: u64) -> Input {
            let held: BTreeSet<Key> = self
                .window
                .get_keys()
                .into_iter()
                .filter_map(map_key)
                .collect();
            let released = self
                .window
                .get_keys_released()
                .into_iter()
                .filter_map(map_key)
                .collect();
            Input {
                held,
                released,
                closed: !self.window.is_open(),
            }
        }
    }

    impl Presenter for WindowHost {
        fn present(&mut self, frame: &Image, _damage: &DamageRegion) -> Result<(), PresentError> {
            if !self.window.is_open() {
                return Err(PresentError {
                    message: String::from("window closed"),
                });
            }
            self.buffer = frame.to_argb_u32();
            self.window
                .update_with_buffer(
                    &self.buffer,
                    frame.width() as usize,
                    frame.height() as usize,
                )
                .map_err(|e| PresentError {
                    message: e.to_string(),
                })
        }
    }
}
