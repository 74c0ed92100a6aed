// Copyright (c) 2026 rezky_nightky

use std::time::{Duration, Instant};

use crossterm::style::Color;
use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    audio::{AudioBackend, MusicPlayer, MusicState, SoundEffect},
    canvas::Layer,
    config::ColorBg,
    fireworks::Fireworks,
    frame::{Cell, Frame},
    geom::{Point, Viewport},
    interaction::Interaction,
    overlay::{Overlay, TextStyle},
    palette::{self, quantize, FireworkTheme, Rgb, BLACK, HINT_AMBER, TEXT_CREAM, TITLE_GOLD},
    runtime::ColorMode,
    snow::SnowField,
};

/// Below this a dot counts as empty on a terminal-coloured background.
const EMPTY_ALPHA: f32 = 1.0 / 255.0;
/// Mono mode lights a dot above this luma.
const MONO_LIT: f32 = 0.3;

pub struct SceneOptions {
    pub color_mode: ColorMode,
    pub color_bg: ColorBg,
    pub theme: FireworkTheme,
    pub cell_w: f32,
    pub cell_h: f32,
    pub snow_area: f32,
    pub message: Option<String>,
    pub message_border: bool,
    pub show_status: bool,
    /// Milliseconds between automatic launches, when enabled.
    pub auto_fire_ms: Option<(u16, u16)>,
    pub seed: Option<u64>,
}

/// Owns both simulations, their layers and the audio; turns input into
/// simulation state and each tick into a terminal frame.
pub struct Scene<B: AudioBackend> {
    vp: Viewport,
    color_mode: ColorMode,
    color_bg: ColorBg,
    colors: &'static [Rgb],
    show_status: bool,
    auto_fire_ms: Option<(u16, u16)>,

    rng: StdRng,
    snow: SnowField,
    snow_layer: Layer,
    fireworks: Fireworks,
    fire_layer: Layer,
    interaction: Interaction,
    overlay: Overlay,
    music: MusicPlayer<B>,
    sfx: SoundEffect<B>,

    paused: bool,
    launches: u64,
    next_auto_fire: Option<Instant>,
    started: Instant,
    status_shown: Option<MusicState>,
}

impl<B: AudioBackend> Scene<B> {
    pub fn new(
        opts: SceneOptions,
        cols: u16,
        rows: u16,
        music: MusicPlayer<B>,
        sfx: SoundEffect<B>,
        now: Instant,
    ) -> Self {
        let vp = Viewport::new(cols, rows, opts.cell_w, opts.cell_h);
        let rng = match opts.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        let mut scene = Self {
            vp,
            color_mode: opts.color_mode,
            color_bg: opts.color_bg,
            colors: opts.theme.colors(),
            show_status: opts.show_status,
            auto_fire_ms: opts.auto_fire_ms,
            rng,
            snow: SnowField::new(opts.snow_area),
            snow_layer: Layer::new(vp),
            fireworks: Fireworks::new(),
            fire_layer: Layer::new(vp),
            interaction: Interaction::default(),
            overlay: Overlay::new(opts.message, opts.message_border),
            music,
            sfx,
            paused: false,
            launches: 0,
            next_auto_fire: None,
            started: now,
            status_shown: None,
        };
        scene.resize(cols, rows);
        scene.schedule_auto_fire(now);
        scene
    }

    #[cfg(test)]
    pub fn viewport(&self) -> Viewport {
        self.vp
    }

    pub fn fireworks(&self) -> &Fireworks {
        &self.fireworks
    }

    #[cfg(test)]
    pub fn snow(&self) -> &SnowField {
        &self.snow
    }

    pub fn launches(&self) -> u64 {
        self.launches
    }

    #[cfg(test)]
    pub fn music_state(&self) -> MusicState {
        self.music.state()
    }

    /// Resizes both layers and scatters a fresh batch of snow.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.vp = Viewport::new(cols, rows, self.vp.cell_w, self.vp.cell_h);
        self.snow_layer.resize(self.vp);
        self.fire_layer.resize(self.vp);
        self.snow
            .reset(&mut self.rng, self.vp.width(), self.vp.height());
        self.overlay.layout(cols, rows);
        self.status_shown = None;
        log::debug!(
            "resize: {}x{} cells, {:.0}x{:.0}px",
            cols,
            rows,
            self.vp.width(),
            self.vp.height()
        );
    }

    /// A mouse button went down on a cell. The music indicator toggles music;
    /// anywhere else pushes snow and fires a rocket at the pointer.
    pub fn pointer_down(&mut self, col: u16, row: u16, now: Instant) {
        if self.overlay.status_hit(col, row) {
            self.toggle_music();
            return;
        }
        let pos = self.vp.cell_center(col, row);
        self.interaction.record(pos, now);
        self.launch_at(pos);
    }

    pub fn launch_random(&mut self) {
        let target = self.random_target();
        self.launch_at(target);
    }

    pub fn clear_fireworks(&mut self) {
        self.fireworks.clear();
        self.fire_layer.clear();
    }

    pub fn toggle_music(&mut self) {
        self.music.toggle();
    }

    pub fn play_music(&mut self) {
        self.music.play();
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
        log::debug!("simulation {}", if self.paused { "paused" } else { "resumed" });
    }

    pub fn stop_audio(&mut self) {
        self.music.pause();
        self.sfx.stop_all();
    }

    fn launch_at(&mut self, target: Point) {
        let origin = self.vp.launch_origin();
        self.fireworks
            .launch(&mut self.rng, origin, target, self.colors);
        self.sfx.trigger();
        self.launches += 1;
    }

    fn random_target(&mut self) -> Point {
        let (w, h) = (self.vp.width(), self.vp.height());
        Point::new(
            w * self.rng.random_range(0.1f32..0.9),
            h * self.rng.random_range(0.1f32..0.5),
        )
    }

    fn schedule_auto_fire(&mut self, now: Instant) {
        self.next_auto_fire = self.auto_fire_ms.map(|(low, high)| {
            let (low, high) = (low.min(high), low.max(high));
            now + Duration::from_millis(self.rng.random_range(low..=high) as u64)
        });
    }

    /// Runs one frame: audio housekeeping, both simulations, then composes
    /// everything into `frame`.
    pub fn tick(&mut self, now: Instant, frame: &mut Frame) {
        self.music.poll();
        self.sfx.reap();

        if !self.paused {
            if self.next_auto_fire.is_some_and(|at| now >= at) {
                self.launch_random();
                self.schedule_auto_fire(now);
            }

            let push = self.interaction.fresh_at(now);
            self.snow.step(&mut self.rng, push);
            self.snow.paint(&mut self.snow_layer);

            self.fireworks.step(&mut self.rng);
            self.fireworks.paint(&mut self.fire_layer);
        }

        self.refresh_status();
        self.compose(now, frame);
    }

    fn refresh_status(&mut self) {
        if !self.show_status {
            return;
        }
        let state = self.music.state();
        if self.status_shown == Some(state) {
            return;
        }
        let text = match state {
            MusicState::Playing => "\u{266a} music on  [m]",
            MusicState::Paused => "\u{266a} music off [m]",
            MusicState::Unavailable => "\u{266a} music unavailable",
        };
        self.overlay.set_status(text, self.vp.cols, self.vp.rows);
        self.status_shown = Some(state);
    }

    fn backdrop(&self, dot_row: usize) -> Option<Rgb> {
        match self.color_bg {
            ColorBg::Gradient => {
                let rows = self.vp.dot_rows().saturating_sub(1).max(1) as f32;
                Some(palette::night_sky(dot_row as f32 / rows))
            }
            ColorBg::Black => Some(BLACK),
            ColorBg::DefaultBackground | ColorBg::Transparent => None,
        }
    }

    /// Background, then snow, then fireworks, source-over. `None` is a dot
    /// nothing was drawn on over the terminal's own background.
    fn dot_color(&self, idx: usize, backdrop: Option<Rgb>) -> Option<Rgb> {
        let (mut acc, mut alpha) = match backdrop {
            Some(bg) => (bg.unit(), 1.0),
            None => ([0.0; 3], 0.0),
        };
        for layer in [&self.snow_layer, &self.fire_layer] {
            let src = layer.pixel(idx);
            let keep = 1.0 - src[3];
            for ch in 0..3 {
                acc[ch] = src[ch] + acc[ch] * keep;
            }
            alpha = src[3] + alpha * keep;
        }
        if backdrop.is_none() && alpha < EMPTY_ALPHA {
            return None;
        }
        Some(Rgb::from_unit(acc))
    }

    fn dots_to_cell(&self, top: Option<Rgb>, bottom: Option<Rgb>) -> Cell {
        if self.color_mode == ColorMode::Mono {
            let lit = |c: Option<Rgb>| c.is_some_and(|c| c.luma() > MONO_LIT);
            let ch = match (lit(top), lit(bottom)) {
                (true, true) => '\u{2588}',
                (true, false) => '\u{2580}',
                (false, true) => '\u{2584}',
                (false, false) => ' ',
            };
            return Cell { ch, ..Cell::BLANK };
        }

        let q = |c: Option<Rgb>| c.and_then(|c| quantize(c, self.color_mode));
        match (q(top), q(bottom)) {
            (None, None) => Cell::BLANK,
            (Some(t), None) => Cell {
                ch: '\u{2580}',
                fg: Some(t),
                ..Cell::BLANK
            },
            (None, Some(b)) => Cell {
                ch: '\u{2584}',
                fg: Some(b),
                ..Cell::BLANK
            },
            (Some(t), Some(b)) if t == b => Cell {
                bg: Some(b),
                ..Cell::BLANK
            },
            (Some(t), Some(b)) => Cell {
                ch: '\u{2580}',
                fg: Some(t),
                bg: Some(b),
                bold: false,
            },
        }
    }

    fn text_color(&self, style: TextStyle, now: Instant) -> Rgb {
        match style {
            TextStyle::Title => {
                let t = now.saturating_duration_since(self.started).as_secs_f32();
                let pulse = 0.5 + 0.5 * (t * 2.0).sin();
                TITLE_GOLD.lerp(TEXT_CREAM, pulse * 0.4)
            }
            TextStyle::Body | TextStyle::Status => TEXT_CREAM,
            TextStyle::Hint | TextStyle::Border => HINT_AMBER,
            TextStyle::Fill => BLACK,
        }
    }

    fn compose(&self, now: Instant, frame: &mut Frame) {
        if frame.width != self.vp.cols || frame.height != self.vp.rows {
            *frame = Frame::new(self.vp.cols, self.vp.rows);
        }

        let cols = self.vp.dot_cols();
        let mut under: Vec<(Option<Rgb>, Option<Rgb>)> =
            Vec::with_capacity(cols * self.vp.rows as usize);
        for row in 0..self.vp.rows as usize {
            let (top_row, bottom_row) = (row * 2, row * 2 + 1);
            let (top_bg, bottom_bg) = (self.backdrop(top_row), self.backdrop(bottom_row));
            for col in 0..cols {
                let top = self.dot_color(top_row * cols + col, top_bg);
                let bottom = self.dot_color(bottom_row * cols + col, bottom_bg);
                under.push((top, bottom));
                frame.set(col as u16, row as u16, self.dots_to_cell(top, bottom));
            }
        }

        for g in self.overlay.glyphs() {
            let Some(idx) = frame.index(g.col, g.row) else {
                continue;
            };
            let (top, bottom) = under[idx];
            let behind = match (top, bottom) {
                (Some(t), Some(b)) => Some(t.lerp(b, 0.5)),
                (t, b) => t.or(b),
            };
            let behind = match g.style {
                TextStyle::Fill | TextStyle::Border => behind.map(|c| c.lerp(BLACK, 0.6)),
                _ => behind,
            };
            let (fg, bg): (Option<Color>, Option<Color>) = match self.color_mode {
                ColorMode::Mono => (None, None),
                mode => (
                    quantize(self.text_color(g.style, now), mode),
                    behind.and_then(|c| quantize(c, mode)),
                ),
            };
            frame.set(
                g.col,
                g.row,
                Cell {
                    ch: g.ch,
                    fg,
                    bg,
                    bold: g.style == TextStyle::Title,
                },
            );
        }
    }
}
