//! Alert sound playback
//!
//! Sounds are synthesized with rodio and played on a dedicated output
//! thread, since the output stream cannot leave the thread that opened it.
//! The stream is opened lazily by `initialize()`, on the first user
//! interaction.

use std::{
    fmt,
    sync::{
        mpsc::{self, Receiver, Sender},
        Mutex,
    },
    thread,
    time::Duration,
};

use rodio::{
    source::{SineWave, Source, Zero},
    OutputStream, Sink,
};
use tracing::{debug, info, warn};

use crate::{
    error::{Error, Result},
    state::SoundType,
};

const SAMPLE_RATE: u32 = 44_100;

/// Playback collaborator consumed by the alert listener and the API
pub trait AudioPlayer: Send + Sync + fmt::Debug {
    /// Prepare the output; called on the first user interaction
    fn initialize(&self) -> Result<()>;
    fn is_initialized(&self) -> bool;
    /// Play an alert; does nothing until initialized
    fn play(&self, sound: SoundType);
    /// Play a sound on request from the settings UI
    fn preview(&self, sound: SoundType);
    /// Set the output volume, clamped to 0.0..=1.0
    fn set_volume(&self, volume: f32);
    fn volume(&self) -> f32;
}

/// Frequencies and gains mixed into one sound
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Voice {
    pub partials: &'static [(f32, f32)],
    pub duration: Duration,
}

/// Short bright bell, long low gong
pub(crate) fn voice(sound: SoundType) -> Voice {
    match sound {
        SoundType::Bell => Voice {
            partials: &[(1318.5, 0.30), (2637.0, 0.10)],
            duration: Duration::from_millis(350),
        },
        SoundType::Gong => Voice {
            partials: &[(98.0, 0.40), (147.0, 0.25), (196.0, 0.15)],
            duration: Duration::from_millis(1600),
        },
    }
}

fn tone(sound: SoundType) -> Box<dyn Source<Item = f32> + Send> {
    let voice = voice(sound);
    let mut source: Box<dyn Source<Item = f32> + Send> =
        Box::new(Zero::<f32>::new(1, SAMPLE_RATE).take_duration(voice.duration));
    for &(frequency, gain) in voice.partials {
        let partial = SineWave::new(frequency)
            .take_duration(voice.duration)
            .amplify(gain);
        source = Box::new(source.mix(partial));
    }
    source
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Command {
    Play { sound: SoundType, volume: f32 },
    SetVolume(f32),
}

/// rodio-backed player
pub struct RodioPlayer {
    commands: Mutex<Option<Sender<Command>>>,
    volume: Mutex<f32>,
}

impl RodioPlayer {
    /// Create a player; no output device is opened until `initialize()`
    pub fn new(volume: f32) -> Self {
        Self {
            commands: Mutex::new(None),
            volume: Mutex::new(clamp_volume(volume)),
        }
    }

    fn send(&self, command: Command) -> bool {
        let commands = self.commands.lock().unwrap_or_else(|e| e.into_inner());
        match commands.as_ref() {
            Some(tx) => {
                if tx.send(command).is_err() {
                    warn!("Audio output thread has exited");
                    return false;
                }
                true
            }
            None => false,
        }
    }

    fn ring(&self, sound: SoundType) {
        let volume = self.volume();
        if self.send(Command::Play { sound, volume }) {
            info!("Playing {} at volume {:.2}", sound, volume);
        }
    }
}

fn output_thread(commands: Receiver<Command>, ready: Sender<std::result::Result<(), String>>) {
    let (_stream, handle) = match OutputStream::try_default() {
        Ok(pair) => {
            let _ = ready.send(Ok(()));
            pair
        }
        Err(e) => {
            let _ = ready.send(Err(e.to_string()));
            return;
        }
    };

    let mut playing: Vec<Sink> = Vec::new();
    while let Ok(command) = commands.recv() {
        playing.retain(|sink| !sink.empty());
        match command {
            Command::Play { sound, volume } => match Sink::try_new(&handle) {
                Ok(sink) => {
                    sink.set_volume(volume);
                    sink.append(tone(sound));
                    playing.push(sink);
                }
                Err(e) => warn!("Failed to play {}: {}", sound, e),
            },
            Command::SetVolume(volume) => {
                for sink in &playing {
                    sink.set_volume(volume);
                }
            }
        }
    }
    debug!("Audio output thread stopped");
}

impl AudioPlayer for RodioPlayer {
    fn initialize(&self) -> Result<()> {
        let mut commands = self.commands.lock().unwrap_or_else(|e| e.into_inner());
        if commands.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel();
        let (ready_tx, ready_rx) = mpsc::channel();
        thread::Builder::new()
            .name("audio-output".to_string())
            .spawn(move || output_thread(rx, ready_tx))?;

        ready_rx
            .recv()
            .map_err(|_| Error::Audio("output thread exited during startup".to_string()))?
            .map_err(Error::Audio)?;

        *commands = Some(tx);
        info!("Audio output initialized");
        Ok(())
    }

    fn is_initialized(&self) -> bool {
        self.commands
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .is_some()
    }

    fn play(&self, sound: SoundType) {
        if !self.is_initialized() {
            warn!("Audio not initialized, skipping {}", sound);
            return;
        }
        self.ring(sound);
    }

    fn preview(&self, sound: SoundType) {
        // A preview is itself a user interaction
        if let Err(e) = self.initialize() {
            warn!("Failed to initialize audio for preview: {}", e);
            return;
        }
        self.ring(sound);
    }

    fn set_volume(&self, volume: f32) {
        let volume = clamp_volume(volume);
        *self.volume.lock().unwrap_or_else(|e| e.into_inner()) = volume;
        self.send(Command::SetVolume(volume));
    }

    fn volume(&self) -> f32 {
        *self.volume.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl fmt::Debug for RodioPlayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RodioPlayer")
            .field("volume", &self.volume())
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

fn clamp_volume(volume: f32) -> f32 {
    if volume.is_nan() {
        0.0
    } else {
        volume.clamp(0.0, 1.0)
    }
}

/// In-memory player that records what it was asked to play
#[cfg(test)]
#[derive(Debug)]
pub(crate) struct RecordingPlayer {
    initialized: Mutex<bool>,
    volume: Mutex<f32>,
    pub played: Mutex<Vec<(SoundType, f32)>>,
}

#[cfg(test)]
impl RecordingPlayer {
    pub fn new(volume: f32) -> Self {
        Self {
            initialized: Mutex::new(false),
            volume: Mutex::new(clamp_volume(volume)),
            played: Mutex::new(Vec::new()),
        }
    }

    pub fn sounds(&self) -> Vec<SoundType> {
        self.played.lock().unwrap().iter().map(|(s, _)| *s).collect()
    }
}

#[cfg(test)]
impl AudioPlayer for RecordingPlayer {
    fn initialize(&self) -> Result<()> {
        *self.initialized.lock().unwrap() = true;
        Ok(())
    }
    fn is_initialized(&self) -> bool {
        *self.initialized.lock().unwrap()
    }
    fn play(&self, sound: SoundType) {
        if self.is_initialized() {
            let volume = self.volume();
            self.played.lock().unwrap().push((sound, volume));
        }
    }
    fn preview(&self, sound: SoundType) {
        let _ = self.initialize();
        self.play(sound);
    }
    fn set_volume(&self, volume: f32) {
        *self.volume.lock().unwrap() = clamp_volume(volume);
    }
    fn volume(&self) -> f32 {
        *self.volume.lock().unwrap()
    }
}
