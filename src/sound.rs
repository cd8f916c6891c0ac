//! Audio feedback for the widget toolkit.
//!
//! Widgets only ever see the [`AudioFeedback`] trait. Playback problems are
//! logged where they happen and never reach drawing code.

use crate::config::SoundConfig;
use anyhow::Result;
use std::path::PathBuf;
use tracing::{debug, warn};

#[cfg(feature = "sound")]
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
#[cfg(feature = "sound")]
use std::{
    cell::RefCell,
    collections::{BTreeMap, HashMap},
    fs::File,
    io::BufReader,
    time::{Duration, Instant},
};

/// Sounds the toolkit can ask for.
pub trait AudioFeedback {
    /// Short typewriter click, picked at random among the configured samples
    fn play_keystroke_tick(&self);

    /// Start a named music track, replacing whatever is playing
    fn play_track(&self, name: &str, looped: bool);

    fn stop_music(&self);
}

/// Used when sound is disabled or no output device is available.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioFeedback for SilentAudio {
    fn play_keystroke_tick(&self) {}

    fn play_track(&self, name: &str, _looped: bool) {
        debug!("Sound disabled, not playing track '{}'", name);
    }

    fn stop_music(&self) {}
}

/// Pick the audio backend for this run, falling back to silence.
pub fn build_audio(config: &SoundConfig, enabled: bool) -> Box<dyn AudioFeedback> {
    if !enabled || !config.enabled {
        debug!("Sound disabled by configuration");
        return Box::new(SilentAudio);
    }

    #[cfg(feature = "sound")]
    {
        let sounds_dir = match ensure_sounds_directory() {
            Ok(dir) => dir,
            Err(e) => {
                warn!("Sound directory unavailable, continuing without audio: {}", e);
                return Box::new(SilentAudio);
            }
        };
        match SoundPlayer::new(config, sounds_dir) {
            Ok(player) => Box::new(player),
            Err(e) => {
                warn!("Failed to open audio output, continuing without audio: {}", e);
                Box::new(SilentAudio)
            }
        }
    }

    #[cfg(not(feature = "sound"))]
    {
        debug!("Built without the `sound` feature");
        Box::new(SilentAudio)
    }
}

/// Sound player for keystroke ticks and music tracks
#[cfg(feature = "sound")]
pub struct SoundPlayer {
    _stream: OutputStream,
    stream_handle: OutputStreamHandle,
    sounds_dir: PathBuf,
    volume: f32,
    tick_volume: f32,
    tick_samples: Vec<String>,
    tracks: BTreeMap<String, String>,
    music: RefCell<Option<Sink>>,
    cooldown_map: RefCell<HashMap<String, Instant>>,
    cooldown_duration: Duration,
}

#[cfg(feature = "sound")]
impl SoundPlayer {
    pub fn new(config: &SoundConfig, sounds_dir: PathBuf) -> Result<Self> {
        let (stream, stream_handle) = OutputStream::try_default()?;

        Ok(Self {
            _stream: stream,
            stream_handle,
            sounds_dir,
            volume: config.volume.clamp(0.0, 1.0),
            tick_volume: config.tick_volume.clamp(0.0, 1.0),
            tick_samples: config.tick_samples.clone(),
            tracks: config.tracks.clone(),
            music: RefCell::new(None),
            cooldown_map: RefCell::new(HashMap::new()),
            cooldown_duration: Duration::from_millis(config.cooldown_ms),
        })
    }

    /// Check if a sound is on cooldown
    fn is_on_cooldown(&self, sound_id: &str) -> bool {
        self.cooldown_map
            .borrow()
            .get(sound_id)
            .is_some_and(|last_played| last_played.elapsed() < self.cooldown_duration)
    }

    fn set_cooldown(&self, sound_id: &str) {
        self.cooldown_map
            .borrow_mut()
            .insert(sound_id.to_string(), Instant::now());
    }

    /// Resolve a filename in the sounds directory, trying common audio
    /// extensions when it has none.
    fn resolve(&self, filename: &str) -> Option<PathBuf> {
        let path = self.sounds_dir.join(filename);
        if path.exists() {
            return Some(path);
        }
        ["wav", "ogg", "mp3", "flac"]
            .iter()
            .map(|ext| self.sounds_dir.join(format!("{}.{}", filename, ext)))
            .find(|candidate| candidate.exists())
    }

    fn decode(&self, filename: &str) -> Result<Option<Decoder<BufReader<File>>>> {
        let Some(path) = self.resolve(filename) else {
            warn!("Sound file not found: {:?}", self.sounds_dir.join(filename));
            return Ok(None);
        };
        let file = File::open(&path)?;
        Ok(Some(Decoder::new(BufReader::new(file))?))
    }

    /// Play a one-shot effect from the sounds directory
    fn play_effect(&self, filename: &str, volume: f32) -> Result<()> {
        if self.is_on_cooldown(filename) {
            return Ok(());
        }
        let Some(source) = self.decode(filename)? else {
            return Ok(());
        };

        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(volume);
        sink.append(source);
        sink.detach(); // Play in background

        self.set_cooldown(filename);
        Ok(())
    }

    fn start_track(&self, name: &str, looped: bool) -> Result<()> {
        let Some(filename) = self.tracks.get(name) else {
            warn!("Track '{}' is not configured", name);
            return Ok(());
        };

        self.stop_music();
        let Some(source) = self.decode(filename)? else {
            return Ok(());
        };

        let sink = Sink::try_new(&self.stream_handle)?;
        sink.set_volume(self.volume);
        if looped {
            sink.append(source.repeat_infinite());
        } else {
            sink.append(source);
        }
        *self.music.borrow_mut() = Some(sink);

        debug!("Playing track '{}' ({}) looped={}", name, filename, looped);
        Ok(())
    }
}

#[cfg(feature = "sound")]
impl AudioFeedback for SoundPlayer {
    fn play_keystroke_tick(&self) {
        use rand::seq::SliceRandom;

        let Some(sample) = self.tick_samples.choose(&mut rand::thread_rng()) else {
            return;
        };
        if let Err(e) = self.play_effect(sample, self.tick_volume) {
            warn!("Failed to play keystroke sample '{}': {}", sample, e);
        }
    }

    fn play_track(&self, name: &str, looped: bool) {
        if let Err(e) = self.start_track(name, looped) {
            warn!("Failed to play track '{}': {}", name, e);
        }
    }

    fn stop_music(&self) {
        if let Some(sink) = self.music.borrow_mut().take() {
            sink.stop();
        }
    }
}

/// Create the shared sounds directory if it doesn't exist
pub fn ensure_sounds_directory() -> Result<PathBuf> {
    let sounds_dir = crate::config::Config::sounds_dir()?;

    if !sounds_dir.exists() {
        std::fs::create_dir_all(&sounds_dir)?;
        debug!("Created sounds directory: {:?}", sounds_dir);
    }

    Ok(sounds_dir)
}
