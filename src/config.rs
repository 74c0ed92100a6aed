// Copyright (c) 2026 rezky_nightky

use std::env;
use std::io::IsTerminal;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::audio::{PlayerChoice, DEFAULT_MUSIC_SOURCES, DEFAULT_SFX_SOURCE};
use crate::overlay::DEFAULT_GREETING;
use crate::palette::FireworkTheme;
use crate::runtime::ColorMode;
use crate::snow::DEFAULT_AREA_PER_FLAKE;

pub const DEFAULT_PARAMS_USAGE: &str = "DEFAULT PARAMS USAGE:\n  snowfire --duration 0 --color-bg gradient --theme classic --fps 60 --snow-area 8000 --auto-fire-ms 800,2500 --player auto --volume 100 --sfx-volume 60";

pub fn color_enabled_stdout() -> bool {
    if env::var_os("NO_COLOR").is_some() {
        return false;
    }
    if matches!(env::var("CLICOLOR").ok().as_deref(), Some("0")) {
        return false;
    }
    std::io::stdout().is_terminal()
}

fn colorize_help_detail(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);
    for chunk in text.split_inclusive('\n') {
        let (line, nl) = chunk
            .strip_suffix('\n')
            .map(|l| (l, "\n"))
            .unwrap_or((chunk, ""));

        let is_heading =
            !line.starts_with(' ') && line.ends_with(':') && line == line.to_ascii_uppercase();

        if is_heading {
            out.push_str("\x1b[1;36m");
            out.push_str(line);
            out.push_str("\x1b[0m");
        } else if let Some(rest) = line.strip_prefix("      Example:") {
            out.push_str("      \x1b[32mExample:\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  snowfire") {
            out.push_str("  \x1b[1;34msnowfire\x1b[0m");
            out.push_str(rest);
        } else if let Some(rest) = line.strip_prefix("  -") {
            out.push_str("  \x1b[33m-");
            out.push_str(rest);
            out.push_str("\x1b[0m");
        } else {
            out.push_str(line);
        }
        out.push_str(nl);
    }
    out
}

pub fn default_params_usage_for_help() -> String {
    if color_enabled_stdout() {
        colorize_help_detail(DEFAULT_PARAMS_USAGE)
    } else {
        DEFAULT_PARAMS_USAGE.to_string()
    }
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBg {
    /// Night sky, #0a192f to #020c1b to black.
    #[value(name = "gradient")]
    Gradient,
    #[value(name = "black")]
    Black,
    #[value(name = "default-background")]
    DefaultBackground,
    #[value(name = "transparent")]
    Transparent,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("failed to apply {name} {value} (min {min} max {max})")]
    OutOfRange {
        name: &'static str,
        value: String,
        min: String,
        max: String,
    },
    #[error("failed to apply {name} {value} (must be a finite number)")]
    NotFinite { name: &'static str, value: String },
    #[error("invalid --colormode: {0} (allowed: 0,16,8/256,24/32)")]
    ColorMode(u16),
}

fn out_of_range<T: ToString>(name: &'static str, v: T, min: T, max: T) -> ConfigError {
    ConfigError::OutOfRange {
        name,
        value: v.to_string(),
        min: min.to_string(),
        max: max.to_string(),
    }
}

fn require_f64_range(name: &'static str, v: f64, min: f64, max: f64) -> Result<f64, ConfigError> {
    if !v.is_finite() {
        return Err(ConfigError::NotFinite {
            name,
            value: v.to_string(),
        });
    }
    if v < min || v > max {
        return Err(out_of_range(name, v, min, max));
    }
    Ok(v)
}

fn require_f32_range(name: &'static str, v: f32, min: f32, max: f32) -> Result<f32, ConfigError> {
    require_f64_range(name, v as f64, min as f64, max as f64).map(|v| v as f32)
}

fn require_u16_range(name: &'static str, v: u16, min: u16, max: u16) -> Result<u16, ConfigError> {
    if v < min || v > max {
        return Err(out_of_range(name, v, min, max));
    }
    Ok(v)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct U16Range {
    pub low: u16,
    pub high: u16,
}

impl FromStr for U16Range {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: NUM1,NUM2".to_string())?;
        let low: u16 = a
            .trim()
            .parse()
            .map_err(|_| "invalid low value".to_string())?;
        let high: u16 = b
            .trim()
            .parse()
            .map_err(|_| "invalid high value".to_string())?;
        if low == 0 || high == 0 || low > high {
            return Err("range must be >0 and low <= high".to_string());
        }
        Ok(Self { low, high })
    }
}

/// Pixel size of one terminal cell, `W,H`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellSize {
    pub width: f32,
    pub height: f32,
}

impl FromStr for CellSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (a, b) = s
            .split_once(',')
            .ok_or_else(|| "expected: WIDTH,HEIGHT".to_string())?;
        let width: f32 = a
            .trim()
            .parse()
            .map_err(|_| "invalid width".to_string())?;
        let height: f32 = b
            .trim()
            .parse()
            .map_err(|_| "invalid height".to_string())?;
        Ok(Self { width, height })
    }
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "snowfire",
    version,
    disable_version_flag = true,
    about = "Falling snow, click-to-launch fireworks and holiday music for the terminal"
)]
pub struct Args {
    #[arg(
        short = 'f',
        long = "fps",
        default_value_t = 60.0,
        help_heading = "PERFORMANCE",
        help = "Target FPS (min 1 max 240)"
    )]
    pub fps: f64,

    #[arg(
        long = "duration",
        help_heading = "GENERAL",
        help = "Stop after N seconds (min 0.1 max 86400; <=0 disables)"
    )]
    pub duration: Option<f64>,

    #[arg(
        long = "perf-stats",
        help_heading = "PERFORMANCE",
        help = "Print performance statistics summary on exit"
    )]
    pub perf_stats: bool,

    #[arg(
        short = 's',
        long = "screensaver",
        help_heading = "GENERAL",
        help = "Screensaver mode (exit on keypress, no music indicator)"
    )]
    pub screensaver: bool,

    #[arg(
        short = 'm',
        long = "message",
        help_heading = "GENERAL",
        help = "Greeting text; \\n starts a new line, empty hides it"
    )]
    pub message: Option<String>,

    #[arg(
        long = "message-border",
        help_heading = "GENERAL",
        help = "Draw a border around the greeting"
    )]
    pub message_border: bool,

    #[arg(
        long = "seed",
        help_heading = "GENERAL",
        help = "Seed for the random generator (repeatable runs)"
    )]
    pub seed: Option<u64>,

    #[arg(
        long = "log-file",
        help_heading = "GENERAL",
        help = "Write logs to this file (filter from RUST_LOG, default info)"
    )]
    pub log_file: Option<PathBuf>,

    #[arg(
        long = "colormode",
        help_heading = "APPEARANCE",
        help = "Force color mode (allowed: 0,16,8/256,24/32). Default: 24-bit if supported (COLORTERM), else 8-bit"
    )]
    pub colormode: Option<u16>,

    #[arg(
        long = "color-bg",
        value_enum,
        default_value_t = ColorBg::Gradient,
        help_heading = "APPEARANCE",
        help = "Background mode (gradient, black, default-background, transparent)"
    )]
    pub color_bg: ColorBg,

    #[arg(
        short = 't',
        long = "theme",
        value_enum,
        default_value_t = FireworkTheme::Classic,
        help_heading = "APPEARANCE",
        help = "Firework colour theme (see --list-themes)"
    )]
    pub theme: FireworkTheme,

    #[arg(
        long = "cell-size",
        help_heading = "APPEARANCE",
        help = "Cell size in pixels: W,H (default: reported by the terminal, else 8,16)"
    )]
    pub cell_size: Option<CellSize>,

    #[arg(
        long = "snow-area",
        default_value_t = DEFAULT_AREA_PER_FLAKE,
        help_heading = "SNOW & FIREWORKS",
        help = "Square pixels of sky per snowflake (min 500 max 1000000)"
    )]
    pub snow_area: f32,

    #[arg(
        short = 'a',
        long = "auto-fire",
        help_heading = "SNOW & FIREWORKS",
        help = "Launch fireworks on their own"
    )]
    pub auto_fire: bool,

    #[arg(
        long = "auto-fire-ms",
        default_value = "800,2500",
        help_heading = "SNOW & FIREWORKS",
        help = "Auto-fire interval range in ms: LOW,HIGH (min 50 max 60000)"
    )]
    pub auto_fire_ms: U16Range,

    #[arg(
        long = "music",
        help_heading = "AUDIO",
        help = "Music source URL or path; repeat for fallbacks (default: built-in list)"
    )]
    pub music: Vec<String>,

    #[arg(
        long = "sfx",
        help_heading = "AUDIO",
        help = "Launch sound URL or path"
    )]
    pub sfx: Option<String>,

    #[arg(
        long = "player",
        value_enum,
        default_value_t = PlayerChoice::Auto,
        help_heading = "AUDIO",
        help = "External audio player (auto, mpv, ffplay, none)"
    )]
    pub player: PlayerChoice,

    #[arg(long = "mute", help_heading = "AUDIO", help = "Disable all audio")]
    pub mute: bool,

    #[arg(
        long = "no-autoplay",
        help_heading = "AUDIO",
        help = "Do not start the music at launch"
    )]
    pub no_autoplay: bool,

    #[arg(
        long = "volume",
        default_value_t = 100,
        help_heading = "AUDIO",
        help = "Music volume (min 0 max 100)"
    )]
    pub volume: u16,

    #[arg(
        long = "sfx-volume",
        default_value_t = 60,
        help_heading = "AUDIO",
        help = "Launch sound volume (min 0 max 100)"
    )]
    pub sfx_volume: u16,

    #[arg(
        long = "check-bitcolor",
        help_heading = "HELP",
        help = "Print detected terminal color capability and exit"
    )]
    pub check_bitcolor: bool,

    #[arg(
        long = "help-detail",
        help_heading = "HELP",
        help = "Show detailed help for all parameters and exit"
    )]
    pub help_detail: bool,

    #[arg(
        long = "list-themes",
        help_heading = "HELP",
        help = "List available firework themes and exit"
    )]
    pub list_themes: bool,

    #[arg(
        long = "info",
        short = 'i',
        help_heading = "HELP",
        help = "Print version info and exit"
    )]
    pub info: bool,

    #[arg(
        long = "version",
        short = 'v',
        help_heading = "HELP",
        help = "Print version and exit"
    )]
    pub version: bool,
}

pub fn detect_color_mode_auto() -> ColorMode {
    let colorterm = env::var("COLORTERM")
        .unwrap_or_default()
        .to_ascii_lowercase();
    if colorterm.contains("truecolor") || colorterm.contains("24bit") {
        return ColorMode::TrueColor;
    }

    let term = env::var("TERM").unwrap_or_default().to_ascii_lowercase();
    if term == "dumb" {
        return ColorMode::Mono;
    }
    ColorMode::Color256
}

pub fn color_mode_from_arg(m: u16) -> Result<ColorMode, ConfigError> {
    match m {
        0 => Ok(ColorMode::Mono),
        16 => Ok(ColorMode::Color16),
        8 | 256 => Ok(ColorMode::Color256),
        24 | 32 => Ok(ColorMode::TrueColor),
        other => Err(ConfigError::ColorMode(other)),
    }
}

/// Validated run configuration.
#[derive(Clone, Debug, PartialEq)]
pub struct Settings {
    pub fps: f64,
    pub duration: Option<Duration>,
    pub color_mode: ColorMode,
    pub color_bg: ColorBg,
    pub theme: FireworkTheme,
    pub message: Option<String>,
    pub message_border: bool,
    pub screensaver: bool,
    pub perf_stats: bool,
    pub cell_size: Option<(f32, f32)>,
    pub snow_area: f32,
    pub seed: Option<u64>,
    pub auto_fire_ms: Option<(u16, u16)>,
    pub music: Vec<String>,
    pub sfx: Option<String>,
    pub player: PlayerChoice,
    pub autoplay: bool,
    pub volume: u8,
    pub sfx_volume: u8,
}

impl Settings {
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let fps = require_f64_range("--fps", args.fps, 1.0, 240.0)?;

        let duration = match args.duration {
            None => None,
            Some(s) if !s.is_finite() => {
                return Err(ConfigError::NotFinite {
                    name: "--duration",
                    value: s.to_string(),
                })
            }
            Some(s) if s <= 0.0 => None,
            Some(s) => Some(Duration::from_secs_f64(require_f64_range(
                "--duration",
                s,
                0.1,
                86400.0,
            )?)),
        };

        let color_mode = match args.colormode {
            Some(m) => color_mode_from_arg(m)?,
            None => detect_color_mode_auto(),
        };

        let cell_size = match args.cell_size {
            Some(c) => Some((
                require_f32_range("--cell-size width", c.width, 1.0, 256.0)?,
                require_f32_range("--cell-size height", c.height, 2.0, 512.0)?,
            )),
            None => None,
        };

        let snow_area = require_f32_range("--snow-area", args.snow_area, 500.0, 1_000_000.0)?;

        let auto_fire_ms = if args.auto_fire {
            let low = require_u16_range("--auto-fire-ms low", args.auto_fire_ms.low, 50, 60000)?;
            let high = require_u16_range("--auto-fire-ms high", args.auto_fire_ms.high, 50, 60000)?;
            Some((low, high))
        } else {
            None
        };

        let volume = require_u16_range("--volume", args.volume, 0, 100)? as u8;
        let sfx_volume = require_u16_range("--sfx-volume", args.sfx_volume, 0, 100)? as u8;

        let message = match args.message.as_deref() {
            None => Some(DEFAULT_GREETING.to_string()),
            Some(m) if m.trim().is_empty() => None,
            Some(m) => Some(m.replace("\\n", "\n")),
        };

        let music = if args.music.is_empty() {
            DEFAULT_MUSIC_SOURCES.iter().map(|s| s.to_string()).collect()
        } else {
            args.music.clone()
        };

        let player = if args.mute {
            PlayerChoice::None
        } else {
            args.player
        };

        Ok(Self {
            fps,
            duration,
            color_mode,
            color_bg: args.color_bg,
            theme: args.theme,
            message,
            message_border: args.message_border,
            screensaver: args.screensaver,
            perf_stats: args.perf_stats,
            cell_size,
            snow_area,
            seed: args.seed,
            auto_fire_ms,
            music,
            sfx: Some(
                args.sfx
                    .clone()
                    .unwrap_or_else(|| DEFAULT_SFX_SOURCE.to_string()),
            ),
            player,
            autoplay: !args.no_autoplay,
            volume,
            sfx_volume,
        })
    }
}

pub fn print_list_themes() {
    if color_enabled_stdout() {
        println!("\x1b[1;36mAVAILABLE FIREWORK THEMES:\x1b[0m");
        println!("\x1b[2mNOTE: Use only the VALUE (left side) with --theme.\x1b[0m");
    } else {
        println!("AVAILABLE FIREWORK THEMES:");
        println!("NOTE: Use only the VALUE (left side) with --theme.");
    }
    println!();
    println!("VALUE        DESCRIPTION");
    println!("classic      Red, gold, green, white, sky blue and pink");
    println!("gold         Golds and warm oranges");
    println!("ice          White, pale blue and aquamarine");
    println!("candy        Candy-cane red, white, pink and green");
}

const HELP_DETAIL: &str = "\n\nUSAGE:\n  snowfire [OPTIONS]\n\nGENERAL:\n  -s, --screensaver\n      Screensaver mode (exit on keypress).\n      Example: snowfire -s\n\n  --duration <seconds>\n      Stop after N seconds (min 0.1 max 86400).\n      Example: snowfire --duration 10\n\n  -m, --message <text>\n      Greeting text. Use \\n for new lines, an empty string hides it.\n      Example: snowfire -m \"Happy holidays\\nfrom all of us\"\n\n  --message-border\n      Draw a border around the greeting.\n      Example: snowfire --message-border\n\n  --seed <number>\n      Seed the random generator.\n      Example: snowfire --seed 42\n\n  --log-file <path>\n      Write logs to a file (RUST_LOG sets the filter).\n      Example: RUST_LOG=debug snowfire --log-file snowfire.log\n\nAPPEARANCE:\n  -t, --theme <name>\n      Firework colours (see --list-themes).\n      Example: snowfire --theme ice\n\n  --colormode <0|16|8|24>\n      Force color mode; otherwise auto-detected from COLORTERM/TERM.\n      Example: snowfire --colormode 24\n\n  --color-bg <gradient|black|default-background|transparent>\n      Background mode.\n      Example: snowfire --color-bg black\n\n  --cell-size <w,h>\n      Pixel size of one cell when the terminal does not report it.\n      Example: snowfire --cell-size 9,18\n\nSNOW & FIREWORKS:\n  --snow-area <number>\n      Square pixels of sky per snowflake (min 500 max 1000000).\n      Example: snowfire --snow-area 4000\n\n  -a, --auto-fire\n      Launch fireworks without clicking.\n      Example: snowfire -a\n\n  --auto-fire-ms <low,high>\n      Auto-fire interval range in ms (min 50 max 60000).\n      Example: snowfire -a --auto-fire-ms 300,900\n\nAUDIO:\n  --music <url|path>\n      Music source; repeat to add fallbacks.\n      Example: snowfire --music ~/jingle.ogg --music https://example.org/carol.mp3\n\n  --sfx <url|path>\n      Launch sound.\n      Example: snowfire --sfx ~/whistle.wav\n\n  --player <auto|mpv|ffplay|none>\n      External player used for audio.\n      Example: snowfire --player ffplay\n\n  --mute\n      Disable all audio.\n      Example: snowfire --mute\n\n  --no-autoplay\n      Keep the music off until 'm' is pressed.\n      Example: snowfire --no-autoplay\n\n  --volume <0-100>, --sfx-volume <0-100>\n      Music and launch sound volume.\n      Example: snowfire --volume 40 --sfx-volume 80\n\nPERFORMANCE:\n  -f, --fps <number>\n      Target FPS (min 1 max 240).\n      Example: snowfire --fps 30\n\n  --perf-stats\n      Print performance statistics summary on exit.\n      Example: snowfire --duration 10 --perf-stats\n\nKEYS:\n  q, Esc   quit\n  m        toggle music (or click the music indicator)\n  p        pause snow and fireworks\n  f        launch a firework at a random spot\n  c        clear all fireworks\n  click    launch a firework toward the pointer\n\nHELP:\n  --check-bitcolor\n      Print detected terminal color capability and exit.\n\n  --help\n      Show short help.\n\n  --help-detail\n      Show this detailed help.\n\n  --list-themes\n      List available firework themes and exit.\n\n  -v, --version\n      Print version and exit.\n\n  -i, --info\n      Print version info and exit.\n";

pub fn print_help_detail() {
    let block = format!("{}{}", DEFAULT_PARAMS_USAGE, HELP_DETAIL);
    if color_enabled_stdout() {
        print!("{}", colorize_help_detail(&block));
    } else {
        print!("{}", block);
    }

    println!();
    println!("LIMITS / VALID RANGES:");
    println!("  --duration <seconds>     min 0.1 max 86400 (<=0 disables)");
    println!("  --fps <number>           min 1 max 240");
    println!("  --snow-area <number>     min 500 max 1000000");
    println!("  --auto-fire-ms <lo,hi>   min 50 max 60000 (each)");
    println!("  --cell-size <w,h>        width 1-256, height 2-512");
    println!("  --volume, --sfx-volume   min 0 max 100");
    println!("  --colormode <0|16|8|24>  allowed values only (8==256, 24==32)");
    println!();
    print_list_themes();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Args {
        let mut argv = vec!["snowfire"];
        argv.extend_from_slice(args);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_are_valid() {
        let s = Settings::from_args(&parse(&["--colormode", "24"])).unwrap();
        assert_eq!(s.fps, 60.0);
        assert_eq!(s.duration, None);
        assert_eq!(s.color_mode, ColorMode::TrueColor);
        assert_eq!(s.color_bg, ColorBg::Gradient);
        assert_eq!(s.snow_area, 8000.0);
        assert_eq!(s.auto_fire_ms, None);
        assert_eq!(s.music.len(), DEFAULT_MUSIC_SOURCES.len());
        assert_eq!(s.sfx.as_deref(), Some(DEFAULT_SFX_SOURCE));
        assert_eq!(s.message.as_deref(), Some(DEFAULT_GREETING));
        assert!(s.autoplay);
        assert_eq!((s.volume, s.sfx_volume), (100, 60));
    }

    #[test]
    fn fps_out_of_range_is_rejected() {
        let err = Settings::from_args(&parse(&["--fps", "500"])).unwrap_err();
        assert_eq!(err.to_string(), "failed to apply --fps 500 (min 1 max 240)");
    }

    #[test]
    fn non_positive_duration_disables_it() {
        let s = Settings::from_args(&parse(&["--duration", "0", "--colormode", "0"])).unwrap();
        assert_eq!(s.duration, None);
        let s = Settings::from_args(&parse(&["--duration", "2.5", "--colormode", "0"])).unwrap();
        assert_eq!(s.duration, Some(Duration::from_millis(2500)));
        assert!(Settings::from_args(&parse(&["--duration", "0.01"])).is_err());
    }

    #[test]
    fn colormode_aliases() {
        assert_eq!(color_mode_from_arg(8), Ok(ColorMode::Color256));
        assert_eq!(color_mode_from_arg(256), Ok(ColorMode::Color256));
        assert_eq!(color_mode_from_arg(32), Ok(ColorMode::TrueColor));
        assert_eq!(color_mode_from_arg(16), Ok(ColorMode::Color16));
        assert_eq!(color_mode_from_arg(7), Err(ConfigError::ColorMode(7)));
    }

    #[test]
    fn ranges_parse_low_high() {
        assert_eq!(
            "300, 900".parse::<U16Range>(),
            Ok(U16Range {
                low: 300,
                high: 900
            })
        );
        assert!("900,300".parse::<U16Range>().is_err());
        assert!("0,5".parse::<U16Range>().is_err());
        assert!("12".parse::<U16Range>().is_err());
    }

    #[test]
    fn auto_fire_uses_interval_only_when_enabled() {
        let s = Settings::from_args(&parse(&["--auto-fire-ms", "10,20", "--colormode", "0"]));
        assert_eq!(s.unwrap().auto_fire_ms, None);

        let err = Settings::from_args(&parse(&["-a", "--auto-fire-ms", "10,20"])).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::OutOfRange {
                name: "--auto-fire-ms low",
                ..
            }
        ));

        let s = Settings::from_args(&parse(&["-a", "--colormode", "0"])).unwrap();
        assert_eq!(s.auto_fire_ms, Some((800, 2500)));
    }

    #[test]
    fn cell_size_is_validated() {
        let s = Settings::from_args(&parse(&["--cell-size", "9,18", "--colormode", "0"])).unwrap();
        assert_eq!(s.cell_size, Some((9.0, 18.0)));
        assert!(Settings::from_args(&parse(&["--cell-size", "9,1"])).is_err());
        assert!(Args::try_parse_from(["snowfire", "--cell-size", "nine"]).is_err());
    }

    #[test]
    fn message_escapes_and_empty_hides() {
        let s = Settings::from_args(&parse(&["-m", "a\\nb", "--colormode", "0"])).unwrap();
        assert_eq!(s.message.as_deref(), Some("a\nb"));
        let s = Settings::from_args(&parse(&["-m", "", "--colormode", "0"])).unwrap();
        assert_eq!(s.message, None);
    }

    #[test]
    fn mute_overrides_player_and_music_repeats() {
        let s = Settings::from_args(&parse(&[
            "--mute",
            "--player",
            "mpv",
            "--music",
            "a.ogg",
            "--music",
            "b.ogg",
            "--colormode",
            "0",
        ]))
        .unwrap();
        assert_eq!(s.player, PlayerChoice::None);
        assert_eq!(s.music, vec!["a.ogg".to_string(), "b.ogg".to_string()]);
    }

    #[test]
    fn volume_above_hundred_is_rejected() {
        assert!(Settings::from_args(&parse(&["--volume", "101"])).is_err());
        assert!(Settings::from_args(&parse(&["--snow-area", "10"])).is_err());
    }

    #[test]
    fn help_detail_headings_are_coloured() {
        let out = colorize_help_detail("KEYS:\n  snowfire -a\n      Example: x\n");
        assert!(out.starts_with("\x1b[1;36mKEYS:\x1b[0m\n"));
        assert!(out.contains("\x1b[1;34msnowfire\x1b[0m -a"));
        assert!(out.contains("\x1b[32mExample:\x1b[0m x"));
    }
}
