// Copyright (c) 2026 rezky_nightky

use std::io;
use std::process::{Child, Command, Stdio};
use std::sync::{Mutex, MutexGuard, PoisonError, TryLockError};

use thiserror::Error;

pub const DEFAULT_MUSIC_SOURCES: [&str; 2] = [
    "https://www.chosic.com/wp-content/uploads/2021/11/We-Wish-You-A-Merry-Christmas.mp3",
    "https://upload.wikimedia.org/wikipedia/commons/b/b7/We_Wish_you_a_Merry_Christmas_%28Kevin_MacLeod_%29_%28ISRC_USUAN1100369%29.oga",
];

pub const DEFAULT_SFX_SOURCE: &str =
    "https://gfxsounds.com/wp-content/uploads/2024/01/Fireworks-two-stage-launch-whistle-and-explosion-2.mp3";

pub const MAX_SFX_VOICES: usize = 16;

#[derive(Debug, Error)]
pub enum PlaybackError {
    #[error("audio output is disabled")]
    Disabled,
    #[error("failed to start {player} for {url}")]
    Spawn {
        player: &'static str,
        url: String,
        #[source]
        cause: std::io::Error,
    },
    #[error("{player} could not play {url} ({status})")]
    Rejected {
        player: &'static str,
        url: String,
        status: String,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlayRequest {
    pub url: String,
    pub looped: bool,
    /// 0..=100
    pub volume: u8,
}

#[derive(Debug)]
pub enum VoiceStatus {
    Playing,
    Ended,
    Failed(PlaybackError),
}

/// One sound in flight.
pub trait Voice {
    fn poll(&mut self) -> VoiceStatus;
    fn stop(&mut self);
}

pub trait AudioBackend {
    type Voice: Voice;

    /// Starts playback. An `Err` is a rejection; load errors surface later
    /// through [`Voice::poll`].
    fn start(&mut self, req: &PlayRequest) -> Result<Self::Voice, PlaybackError>;
}

#[derive(clap::ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerChoice {
    #[value(name = "auto")]
    Auto,
    #[value(name = "mpv")]
    Mpv,
    #[value(name = "ffplay")]
    Ffplay,
    #[value(name = "none")]
    None,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExternalPlayer {
    Mpv,
    Ffplay,
}

impl ExternalPlayer {
    fn program(self) -> &'static str {
        match self {
            ExternalPlayer::Mpv => "mpv",
            ExternalPlayer::Ffplay => "ffplay",
        }
    }

    fn version_flag(self) -> &'static str {
        match self {
            ExternalPlayer::Mpv => "--version",
            ExternalPlayer::Ffplay => "-version",
        }
    }

    fn args(self, req: &PlayRequest) -> Vec<String> {
        let volume = req.volume.min(100);
        let mut args = match self {
            ExternalPlayer::Mpv => vec![
                "--no-video".to_string(),
                "--no-terminal".to_string(),
                format!("--volume={volume}"),
            ],
            ExternalPlayer::Ffplay => vec![
                "-nodisp".to_string(),
                "-autoexit".to_string(),
                "-loglevel".to_string(),
                "quiet".to_string(),
                "-volume".to_string(),
                volume.to_string(),
            ],
        };
        if req.looped {
            match self {
                ExternalPlayer::Mpv => args.push("--loop-file=inf".to_string()),
                ExternalPlayer::Ffplay => args.extend(["-loop".to_string(), "0".to_string()]),
            }
        }
        args.push(req.url.clone());
        args
    }
}

fn is_on_path(player: ExternalPlayer) -> bool {
    Command::new(player.program())
        .arg(player.version_flag())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Player processes still running, so a panic hook can stop them.
static CHILDREN: Mutex<Vec<Child>> = Mutex::new(Vec::new());

fn children() -> MutexGuard<'static, Vec<Child>> {
    CHILDREN.lock().unwrap_or_else(PoisonError::into_inner)
}

fn spawn_tracked(cmd: &mut Command) -> io::Result<u32> {
    let child = cmd.spawn()?;
    let pid = child.id();
    children().push(child);
    Ok(pid)
}

fn untrack(pid: u32) -> Option<Child> {
    let mut children = children();
    let i = children.iter().position(|c| c.id() == pid)?;
    Some(children.swap_remove(i))
}

/// Kills every player process. Safe to call from a panic hook; gives up
/// instead of blocking when another thread holds the registry.
pub fn kill_all_players() {
    let mut children = match CHILDREN.try_lock() {
        Ok(guard) => guard,
        Err(TryLockError::Poisoned(e)) => e.into_inner(),
        Err(TryLockError::WouldBlock) => return,
    };
    for mut child in children.drain(..) {
        let _ = child.kill();
        let _ = child.wait();
    }
}

/// Plays audio by running an external player per sound; the player takes
/// care of fetching remote sources.
#[derive(Clone, Debug)]
pub struct ProcessBackend {
    player: Option<ExternalPlayer>,
}

impl ProcessBackend {
    pub fn new(choice: PlayerChoice) -> Self {
        let player = match choice {
            PlayerChoice::None => None,
            PlayerChoice::Mpv => Some(ExternalPlayer::Mpv),
            PlayerChoice::Ffplay => Some(ExternalPlayer::Ffplay),
            PlayerChoice::Auto => [ExternalPlayer::Mpv, ExternalPlayer::Ffplay]
                .into_iter()
                .find(|p| is_on_path(*p)),
        };
        Self { player }
    }

    pub fn player_name(&self) -> &'static str {
        self.player.map(ExternalPlayer::program).unwrap_or("none")
    }
}

impl AudioBackend for ProcessBackend {
    type Voice = ProcessVoice;

    fn start(&mut self, req: &PlayRequest) -> Result<ProcessVoice, PlaybackError> {
        let player = self.player.ok_or(PlaybackError::Disabled)?;
        let pid = spawn_tracked(
            Command::new(player.program())
                .args(player.args(req))
                .stdin(Stdio::null())
                .stdout(Stdio::null())
                .stderr(Stdio::null()),
        )
        .map_err(|cause| PlaybackError::Spawn {
            player: player.program(),
            url: req.url.clone(),
            cause,
        })?;
        Ok(ProcessVoice {
            pid: Some(pid),
            player: player.program(),
            url: req.url.clone(),
        })
    }
}

pub struct ProcessVoice {
    pid: Option<u32>,
    player: &'static str,
    url: String,
}

impl Voice for ProcessVoice {
    fn poll(&mut self) -> VoiceStatus {
        let Some(pid) = self.pid else {
            return VoiceStatus::Ended;
        };
        let waited = {
            let mut children = children();
            let Some(i) = children.iter().position(|c| c.id() == pid) else {
                // Already killed by `kill_all_players`.
                self.pid = None;
                return VoiceStatus::Ended;
            };
            let res = children[i].try_wait();
            match res {
                Ok(None) => {}
                Ok(Some(_)) => {
                    children.swap_remove(i);
                }
                Err(_) => {
                    let mut child = children.swap_remove(i);
                    let _ = child.kill();
                    let _ = child.wait();
                }
            }
            res
        };
        match waited {
            Ok(None) => VoiceStatus::Playing,
            Ok(Some(status)) => {
                self.pid = None;
                if status.success() {
                    VoiceStatus::Ended
                } else {
                    VoiceStatus::Failed(PlaybackError::Rejected {
                        player: self.player,
                        url: self.url.clone(),
                        status: status.to_string(),
                    })
                }
            }
            Err(cause) => {
                self.pid = None;
                VoiceStatus::Failed(PlaybackError::Spawn {
                    player: self.player,
                    url: self.url.clone(),
                    cause,
                })
            }
        }
    }

    fn stop(&mut self) {
        if let Some(mut child) = self.pid.take().and_then(untrack) {
            let _ = child.kill();
            let _ = child.wait();
        }
    }
}

impl Drop for ProcessVoice {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MusicState {
    Paused,
    Playing,
    /// Every source was tried and none would play.
    Unavailable,
}

/// Looping background music over an ordered list of fallback sources.
pub struct MusicPlayer<B: AudioBackend> {
    backend: B,
    sources: Vec<String>,
    index: usize,
    volume: u8,
    voice: Option<B::Voice>,
    state: MusicState,
}

impl<B: AudioBackend> MusicPlayer<B> {
    pub fn new(backend: B, sources: Vec<String>, volume: u8) -> Self {
        let state = if sources.is_empty() {
            MusicState::Unavailable
        } else {
            MusicState::Paused
        };
        Self {
            backend,
            sources,
            index: 0,
            volume: volume.min(100),
            voice: None,
            state,
        }
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == MusicState::Playing
    }

    #[cfg(test)]
    pub fn current_source(&self) -> Option<&str> {
        self.sources.get(self.index).map(String::as_str)
    }

    pub fn play(&mut self) {
        match self.state {
            MusicState::Playing => {}
            MusicState::Paused => self.start_current(),
            MusicState::Unavailable => {
                self.index = 0;
                self.start_current();
            }
        }
    }

    pub fn pause(&mut self) {
        if let Some(mut voice) = self.voice.take() {
            voice.stop();
        }
        if self.state == MusicState::Playing {
            self.state = MusicState::Paused;
            log::info!("music paused");
        }
    }

    pub fn toggle(&mut self) {
        if self.is_playing() {
            self.pause();
        } else {
            self.play();
        }
    }

    /// Checks the running voice; a source that fails to load hands over to
    /// the next one without waiting for the user.
    pub fn poll(&mut self) {
        let Some(voice) = self.voice.as_mut() else {
            return;
        };
        match voice.poll() {
            VoiceStatus::Playing => {}
            // Music loops forever, so a player that exits at all, even
            // cleanly, could not play its source.
            VoiceStatus::Ended => {
                log::warn!("music source {} stopped early", self.index + 1);
                self.voice = None;
                self.index += 1;
                self.start_current();
            }
            VoiceStatus::Failed(e) => {
                log::warn!("music source {} failed: {}", self.index + 1, e);
                self.voice = None;
                self.index += 1;
                self.start_current();
            }
        }
    }

    fn start_current(&mut self) {
        while let Some(url) = self.sources.get(self.index) {
            let req = PlayRequest {
                url: url.clone(),
                looped: true,
                volume: self.volume,
            };
            match self.backend.start(&req) {
                Ok(voice) => {
                    log::info!("music playing source {}: {}", self.index + 1, req.url);
                    self.voice = Some(voice);
                    self.state = MusicState::Playing;
                    return;
                }
                Err(e) => {
                    log::warn!("music source {} rejected: {}", self.index + 1, e);
                    self.index += 1;
                }
            }
        }
        self.voice = None;
        self.state = MusicState::Unavailable;
        log::warn!("no playable music source, music stays off");
    }
}

/// Fire-and-forget one-shot sound. Each trigger is its own voice, so
/// overlapping triggers never cut each other off.
pub struct SoundEffect<B: AudioBackend> {
    backend: B,
    template: Option<PlayRequest>,
    voices: Vec<B::Voice>,
    max_voices: usize,
}

impl<B: AudioBackend> SoundEffect<B> {
    pub fn new(backend: B, url: Option<String>, volume: u8) -> Self {
        Self {
            backend,
            template: url.map(|url| PlayRequest {
                url,
                looped: false,
                volume: volume.min(100),
            }),
            voices: Vec::new(),
            max_voices: MAX_SFX_VOICES,
        }
    }

    pub fn active(&self) -> usize {
        self.voices.len()
    }

    /// Returns whether a voice was started. Failures are dropped.
    pub fn trigger(&mut self) -> bool {
        let Some(req) = self.template.clone() else {
            return false;
        };
        self.reap();
        if self.voices.len() >= self.max_voices {
            log::debug!("sfx dropped: {} voices already playing", self.voices.len());
            return false;
        }
        match self.backend.start(&req) {
            Ok(voice) => {
                self.voices.push(voice);
                true
            }
            Err(e) => {
                log::debug!("sfx dropped: {}", e);
                false
            }
        }
    }

    /// Forgets voices that finished or failed.
    pub fn reap(&mut self) {
        self.voices
            .retain_mut(|v| matches!(v.poll(), VoiceStatus::Playing));
    }

    pub fn stop_all(&mut self) {
        for v in &mut self.voices {
            v.stop();
        }
        self.voices.clear();
    }
}
