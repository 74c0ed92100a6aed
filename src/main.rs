// Copyright (c) 2026 rezky_nightky

mod audio;
mod canvas;
mod config;
mod fireworks;
mod frame;
mod geom;
mod interaction;
mod overlay;
mod palette;
mod runtime;
mod scene;
mod snow;
mod terminal;

use std::env;
use std::fs::File;
use std::path::Path;
use std::sync::atomic::{AtomicI32, Ordering};
use std::time::{Duration, Instant};

#[cfg(unix)]
use std::thread;

use anyhow::Context;
use clap::builder::styling::{AnsiColor as ClapAnsiColor, Color as ClapColor};
use clap::builder::styling::{Effects as ClapEffects, Style as ClapStyle};
use clap::builder::Styles as ClapStyles;
use clap::{CommandFactory, FromArgMatches};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers, MouseEventKind};

#[cfg(unix)]
use signal_hook::consts::{SIGHUP, SIGINT, SIGTERM};
#[cfg(unix)]
use signal_hook::iterator::Signals;

use crate::audio::{kill_all_players, MusicPlayer, ProcessBackend, SoundEffect};
use crate::config::{
    color_enabled_stdout, color_mode_from_arg, default_params_usage_for_help,
    detect_color_mode_auto, print_help_detail, print_list_themes, Args, Settings,
};
use crate::frame::Frame;
use crate::geom::Viewport;
use crate::runtime::{FrameClock, PerfStats};
use crate::scene::{Scene, SceneOptions};
use crate::terminal::{restore_terminal_best_effort, Terminal};

const HELP_TEMPLATE_PLAIN: &str = "\
{before-help}{about-with-newline}
USAGE:
  {usage}

{all-args}{after-help}";

const HELP_TEMPLATE_COLOR: &str = "\
{before-help}{about-with-newline}
\x1b[1;36mUSAGE:\x1b[0m
  {usage}

{all-args}{after-help}";

/// Set by the signal handler; the frame loop winds down when non-zero.
static STOP_SIGNAL: AtomicI32 = AtomicI32::new(0);

fn clap_styles() -> ClapStyles {
    ClapStyles::styled()
        .header(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Cyan))),
        )
        .usage(
            ClapStyle::new()
                .effects(ClapEffects::BOLD)
                .fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Green))),
        )
        .literal(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Yellow))))
        .placeholder(ClapStyle::new().fg_color(Some(ClapColor::Ansi(ClapAnsiColor::Magenta))))
}

fn install_signal_handlers() {
    #[cfg(unix)]
    {
        if let Ok(mut signals) = Signals::new([SIGINT, SIGTERM, SIGHUP]) {
            thread::spawn(move || {
                if let Some(sig) = signals.forever().next() {
                    STOP_SIGNAL.store(sig, Ordering::SeqCst);
                }
            });
        }
    }

    #[cfg(windows)]
    {
        if let Err(e) = ctrlc::set_handler(|| {
            STOP_SIGNAL.store(2, Ordering::SeqCst);
        }) {
            eprintln!("failed to install Ctrl-C handler: {}", e);
        }
    }
}

/// The alternate screen owns the terminal, so logs only go to a file.
fn init_logging(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("off")).init();
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .target(env_logger::Target::Pipe(Box::new(file)))
        .init();
    Ok(())
}

fn print_bitcolor_check(args: &Args) {
    let colorterm = env::var("COLORTERM").unwrap_or_default();
    let term = env::var("TERM").unwrap_or_default();
    let auto = detect_color_mode_auto();

    println!("BITCOLOR CHECK:");
    println!(
        "  COLORTERM: {}",
        if colorterm.is_empty() {
            "(unset)"
        } else {
            &colorterm
        }
    );
    println!(
        "  TERM: {}",
        if term.is_empty() { "(unset)" } else { &term }
    );
    println!("  auto_detected: {}", auto.label());
    let effective = match args.colormode.map(color_mode_from_arg) {
        Some(Ok(forced)) => {
            println!("  forced: {}", forced.label());
            forced
        }
        Some(Err(e)) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        None => auto,
    };
    println!("  effective: {}", effective.label());
}

fn main() -> anyhow::Result<()> {
    std::panic::set_hook(Box::new(|info| {
        kill_all_players();
        restore_terminal_best_effort();
        eprintln!("{}", info);
    }));

    install_signal_handlers();

    let mut cmd = Args::command();
    cmd = cmd.styles(clap_styles());
    cmd = cmd.before_help(default_params_usage_for_help());
    let help_template = if color_enabled_stdout() {
        HELP_TEMPLATE_COLOR
    } else {
        HELP_TEMPLATE_PLAIN
    };
    cmd = cmd.help_template(help_template);
    cmd.build();

    if cmd.get_arguments().any(|a| a.get_id().as_str() == "help") {
        cmd = cmd.mut_arg("help", |a| a.help_heading("HELP"));
    }
    cmd.build();

    let matches = cmd.get_matches();
    let args = Args::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    if args.list_themes {
        print_list_themes();
        return Ok(());
    }

    if args.help_detail {
        print_help_detail();
        return Ok(());
    }

    if args.check_bitcolor {
        print_bitcolor_check(&args);
        return Ok(());
    }

    if args.version {
        println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.info {
        println!("Version: v{}", env!("CARGO_PKG_VERSION"));
        println!("Build: {}", env!("SNOWFIRE_BUILD"));
        println!("Commit: {}", env!("SNOWFIRE_GIT_SHA"));
        println!("Copyright: (c) 2026 {}", env!("CARGO_PKG_AUTHORS"));
        println!("License: {}", env!("CARGO_PKG_LICENSE"));
        println!("Source: {}", env!("CARGO_PKG_REPOSITORY"));
        return Ok(());
    }

    let settings = match Settings::from_args(&args) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    init_logging(args.log_file.as_deref())?;
    log::debug!("settings: {:?}", settings);

    let backend = ProcessBackend::new(settings.player);
    log::info!("audio player: {}", backend.player_name());
    let music = MusicPlayer::new(backend.clone(), settings.music.clone(), settings.volume);
    let sfx = SoundEffect::new(backend, settings.sfx.clone(), settings.sfx_volume);

    let mut term = Terminal::new().context("failed to prepare the terminal")?;
    let (w, h) = term.size()?;
    let (cell_w, cell_h) = settings
        .cell_size
        .or_else(|| term.cell_pixels())
        .unwrap_or((Viewport::DEFAULT_CELL_W, Viewport::DEFAULT_CELL_H));
    log::debug!("cell size {:.1}x{:.1}px", cell_w, cell_h);

    let start_time = Instant::now();
    let mut scene = Scene::new(
        SceneOptions {
            color_mode: settings.color_mode,
            color_bg: settings.color_bg,
            theme: settings.theme,
            cell_w,
            cell_h,
            snow_area: settings.snow_area,
            message: settings.message.clone(),
            message_border: settings.message_border,
            show_status: !settings.screensaver,
            auto_fire_ms: settings.auto_fire_ms,
            seed: settings.seed,
        },
        w,
        h,
        music,
        sfx,
        start_time,
    );
    if settings.autoplay {
        scene.play_music();
    }

    let mut frame = Frame::new(w, h);
    let end_time = settings.duration.map(|d| start_time + d);
    let mut clock = FrameClock::new(settings.fps, start_time);
    let mut perf = PerfStats::default();
    let mut running = true;

    while running {
        if end_time.is_some_and(|end| Instant::now() >= end) {
            break;
        }
        let mut pending_resize: Option<(u16, u16)> = None;

        loop {
            while Terminal::poll_event(Duration::from_millis(0))? {
                match Terminal::read_event()? {
                    Event::Resize(nw, nh) => {
                        pending_resize = Some((nw, nh));
                    }
                    Event::Mouse(m) if matches!(m.kind, MouseEventKind::Down(_)) => {
                        scene.pointer_down(m.column, m.row, Instant::now());
                    }
                    Event::Key(k) if k.kind == KeyEventKind::Press => {
                        if settings.screensaver {
                            running = false;
                            break;
                        }

                        match (k.code, k.modifiers) {
                            (KeyCode::Esc, _) | (KeyCode::Char('q'), _) => running = false,
                            (KeyCode::Char('c'), KeyModifiers::CONTROL) => running = false,
                            (KeyCode::Char('m'), _) => scene.toggle_music(),
                            (KeyCode::Char('p'), _) => scene.toggle_pause(),
                            (KeyCode::Char('f'), _) => scene.launch_random(),
                            (KeyCode::Char('c'), _) => scene.clear_fireworks(),
                            _ => {}
                        }
                    }
                    _ => {}
                }
            }

            if STOP_SIGNAL.load(Ordering::SeqCst) != 0 {
                running = false;
            }
            if !running || pending_resize.is_some() {
                break;
            }

            let now = Instant::now();
            let Some(mut timeout) = clock.until_due(now) else {
                break;
            };
            if let Some(end) = end_time {
                if now >= end {
                    break;
                }
                timeout = timeout.min(end - now);
            }
            let _ = Terminal::poll_event(timeout)?;
        }

        if !running {
            break;
        }

        if let Some((nw, nh)) = pending_resize {
            scene.resize(nw, nh);
            frame = Frame::new(nw, nh);
        }

        let work_start = Instant::now();
        scene.tick(work_start, &mut frame);
        let written = term.draw(&mut frame)?;
        if settings.perf_stats {
            perf.record_frame(work_start.elapsed(), clock.period(), written > 0);
            perf.record_load(
                scene.fireworks().rockets.len(),
                scene.fireworks().particles.len(),
            );
        }

        clock.advance(Instant::now());
    }

    scene.stop_audio();
    drop(term);

    if settings.perf_stats {
        perf.launches = scene.launches();
        perf.print_summary(start_time.elapsed(), settings.fps);
    }

    log::info!(
        "exiting after {:.1}s, {} launches, {} bursts",
        start_time.elapsed().as_secs_f64(),
        scene.launches(),
        scene.fireworks().bursts()
    );

    let sig = STOP_SIGNAL.load(Ordering::SeqCst);
    if sig != 0 {
        std::process::exit(128 + sig);
    }
    Ok(())
}
