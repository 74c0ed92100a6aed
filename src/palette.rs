// Copyright (c) 2026 rezky_nightky

use crossterm::style::Color;

use crate::runtime::ColorMode;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn hex(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xff) as u8,
            g: ((v >> 8) & 0xff) as u8,
            b: (v & 0xff) as u8,
        }
    }

    pub fn unit(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    pub fn from_unit(c: [f32; 3]) -> Self {
        let q = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(q(c[0]), q(c[1]), q(c[2]))
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        let t = t.clamp(0.0, 1.0);
        Rgb::new(
            lerp_u8(self.r, other.r, t),
            lerp_u8(self.g, other.g, t),
            lerp_u8(self.b, other.b, t),
        )
    }

    pub fn luma(self) -> f32 {
        (0.2126 * self.r as f32 + 0.7152 * self.g as f32 + 0.0722 * self.b as f32) / 255.0
    }
}

pub const WHITE: Rgb = Rgb::hex(0xFFFFFF);
pub const BLACK: Rgb = Rgb::hex(0x000000);
pub const SPARKLE: Rgb = Rgb::hex(0xFFD700);
pub const SNOW: Rgb = WHITE;

pub const TITLE_GOLD: Rgb = Rgb::hex(0xE1B147);
pub const TEXT_CREAM: Rgb = Rgb::hex(0xF9DFA5);
pub const HINT_AMBER: Rgb = Rgb::hex(0x8C6B1F);

const NIGHT_SKY: [Rgb; 3] = [Rgb::hex(0x0A192F), Rgb::hex(0x020C1B), BLACK];

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum FireworkTheme {
    #[value(name = "classic")]
    Classic,
    #[value(name = "gold")]
    Gold,
    #[value(name = "ice")]
    Ice,
    #[value(name = "candy")]
    Candy,
}

impl FireworkTheme {
    pub fn colors(self) -> &'static [Rgb] {
        const CLASSIC: [Rgb; 6] = [
            Rgb::hex(0xFF3F3F),
            Rgb::hex(0xFFD700),
            Rgb::hex(0x2E933C),
            Rgb::hex(0xFFFFFF),
            Rgb::hex(0x00BFFF),
            Rgb::hex(0xFF69B4),
        ];
        const GOLD: [Rgb; 4] = [
            Rgb::hex(0xFFD700),
            Rgb::hex(0xE1B147),
            Rgb::hex(0xFFF1B8),
            Rgb::hex(0xFFA500),
        ];
        const ICE: [Rgb; 4] = [
            Rgb::hex(0xFFFFFF),
            Rgb::hex(0xB0E0FF),
            Rgb::hex(0x00BFFF),
            Rgb::hex(0x7FFFD4),
        ];
        const CANDY: [Rgb; 4] = [
            Rgb::hex(0xFF3F3F),
            Rgb::hex(0xFFFFFF),
            Rgb::hex(0xFF69B4),
            Rgb::hex(0x2E933C),
        ];
        match self {
            FireworkTheme::Classic => &CLASSIC,
            FireworkTheme::Gold => &GOLD,
            FireworkTheme::Ice => &ICE,
            FireworkTheme::Candy => &CANDY,
        }
    }
}

/// Night-sky gradient; `t` is 0 at the top row and 1 at the bottom.
pub fn night_sky(t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    let segs = (NIGHT_SKY.len() - 1) as f32;
    let pos = t * segs;
    let seg = (pos.floor() as usize).min(NIGHT_SKY.len() - 2);
    NIGHT_SKY[seg].lerp(NIGHT_SKY[seg + 1], pos - seg as f32)
}

fn lerp_u8(a: u8, b: u8, t: f32) -> u8 {
    let a = a as f32;
    let b = b as f32;
    (a + (b - a) * t).round().clamp(0.0, 255.0) as u8
}

fn dist2(a: Rgb, b: Rgb) -> i32 {
    let dr = a.r as i32 - b.r as i32;
    let dg = a.g as i32 - b.g as i32;
    let db = a.b as i32 - b.b as i32;
    dr * dr + dg * dg + db * db
}

fn rgb_to_ansi256(c: Rgb) -> u8 {
    const CUBE_LEVELS: [u8; 6] = [0, 95, 135, 175, 215, 255];

    let to6 = |v: u8| ((v as u16 * 5 + 127) / 255) as u8;
    let (r6, g6, b6) = (to6(c.r), to6(c.g), to6(c.b));
    let cube = Rgb::new(
        CUBE_LEVELS[r6 as usize],
        CUBE_LEVELS[g6 as usize],
        CUBE_LEVELS[b6 as usize],
    );
    let cube_idx = 16 + 36 * r6 + 6 * g6 + b6;

    let avg = ((c.r as u16 + c.g as u16 + c.b as u16) / 3) as u8;
    let (gray_idx, gray) = match avg {
        0..=7 => (16, BLACK),
        239..=255 => (231, WHITE),
        _ => {
            let idx = 232 + (avg - 8) / 10;
            let v = 8 + 10 * (idx - 232);
            (idx, Rgb::new(v, v, v))
        }
    };

    if dist2(c, gray) < dist2(c, cube) {
        gray_idx
    } else {
        cube_idx
    }
}

fn rgb_to_color16(c: Rgb) -> Color {
    const TABLE: [(Color, Rgb); 16] = [
        (Color::Black, Rgb::new(0, 0, 0)),
        (Color::DarkGrey, Rgb::new(128, 128, 128)),
        (Color::Grey, Rgb::new(192, 192, 192)),
        (Color::White, Rgb::new(255, 255, 255)),
        (Color::DarkRed, Rgb::new(128, 0, 0)),
        (Color::Red, Rgb::new(255, 0, 0)),
        (Color::DarkGreen, Rgb::new(0, 128, 0)),
        (Color::Green, Rgb::new(0, 255, 0)),
        (Color::DarkBlue, Rgb::new(0, 0, 128)),
        (Color::Blue, Rgb::new(0, 0, 255)),
        (Color::DarkCyan, Rgb::new(0, 128, 128)),
        (Color::Cyan, Rgb::new(0, 255, 255)),
        (Color::DarkMagenta, Rgb::new(128, 0, 128)),
        (Color::Magenta, Rgb::new(255, 0, 255)),
        (Color::DarkYellow, Rgb::new(128, 128, 0)),
        (Color::Yellow, Rgb::new(255, 255, 0)),
    ];

    TABLE
        .iter()
        .min_by_key(|(_, rgb)| dist2(c, *rgb))
        .map(|(color, _)| *color)
        .unwrap_or(Color::White)
}

/// Maps an RGB value onto what the terminal can show. `None` in mono mode.
pub fn quantize(c: Rgb, mode: ColorMode) -> Option<Color> {
    match mode {
        ColorMode::Mono => None,
        ColorMode::Color16 => Some(rgb_to_color16(c)),
        ColorMode::Color256 => Some(Color::AnsiValue(rgb_to_ansi256(c))),
        ColorMode::TrueColor => Some(Color::Rgb {
            r: c.r,
            g: c.g,
            b: c.b,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_splits_channels() {
        assert_eq!(Rgb::hex(0xFF69B4), Rgb::new(255, 105, 180));
    }

    #[test]
    fn night_sky_runs_from_navy_to_black() {
        assert_eq!(night_sky(0.0), Rgb::hex(0x0A192F));
        assert_eq!(night_sky(0.5), Rgb::hex(0x020C1B));
        assert_eq!(night_sky(1.0), BLACK);
    }

    #[test]
    fn ansi256_picks_cube_and_gray_ramp() {
        assert_eq!(rgb_to_ansi256(Rgb::new(255, 0, 0)), 196);
        assert_eq!(rgb_to_ansi256(WHITE), 231);
        assert_eq!(rgb_to_ansi256(BLACK), 16);
        assert_eq!(rgb_to_ansi256(Rgb::new(128, 128, 128)), 244);
    }

    #[test]
    fn quantize_follows_color_mode() {
        let gold = Rgb::hex(0xFFD700);
        assert_eq!(quantize(gold, ColorMode::Mono), None);
        assert_eq!(quantize(gold, ColorMode::Color16), Some(Color::Yellow));
        assert_eq!(
            quantize(gold, ColorMode::TrueColor),
            Some(Color::Rgb {
                r: 255,
                g: 215,
                b: 0
            })
        );
    }

    #[test]
    fn unit_round_trips_through_from_unit() {
        let c = Rgb::hex(0x2E933C);
        assert_eq!(Rgb::from_unit(c.unit()), c);
    }

    #[test]
    fn classic_theme_matches_six_colors() {
        assert_eq!(FireworkTheme::Classic.colors().len(), 6);
        assert!(FireworkTheme::Classic.colors().contains(&SPARKLE));
    }
}
