//! Audio thread loop.
//!
//! [`audio_thread`] runs on its own OS thread and owns whatever backs sound
//! playback through the [`FxSink`] trait. The game thread talks to it only
//! through the channels in [`AudioBridge`](crate::resources::audio::AudioBridge).
//!
//! Two sinks exist: [`LogSink`] for headless runs (validates files, plays
//! nothing) and, with the `window` feature, the raylib audio device.

use std::path::Path;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, trace};
use rustc_hash::FxHashSet;

use crate::events::audio::{AudioCmd, AudioMessage};

/// Something that can load and play short sound effects.
pub trait FxSink {
    fn load(&mut self, id: &str, path: &str) -> Result<(), String>;
    /// Returns `false` when `id` was never loaded.
    fn play(&mut self, id: &str) -> bool;
}

/// Entry point of the audio thread. Blocks until [`AudioCmd::Shutdown`]
/// arrives or every sender is gone.
pub fn audio_thread<S: FxSink>(
    rx_cmd: &Receiver<AudioCmd>,
    tx_msg: &Sender<AudioMessage>,
    sink: &mut S,
) {
    debug!(
        "[audio] thread running (id={:?})",
        std::thread::current().id()
    );
    for cmd in rx_cmd.iter() {
        match cmd {
            AudioCmd::LoadFx { id, path } => match sink.load(&id, &path) {
                Ok(()) => {
                    debug!("[audio] fx loaded id='{}' path='{}'", id, path);
                    let _ = tx_msg.send(AudioMessage::FxLoaded { id });
                }
                Err(error) => {
                    let _ = tx_msg.send(AudioMessage::FxLoadFailed { id, error });
                }
            },
            AudioCmd::PlayFx { id } => {
                if !sink.play(&id) {
                    trace!("[audio] fx '{}' not loaded, skipped", id);
                }
            }
            AudioCmd::Shutdown => break,
        }
    }
}

/// Headless sink: checks that the files exist and logs playback.
#[derive(Debug, Default)]
pub struct LogSink {
    loaded: FxHashSet<String>,
}

impl FxSink for LogSink {
    fn load(&mut self, id: &str, path: &str) -> Result<(), String> {
        if Path::new(path).is_file() {
            self.loaded.insert(id.to_string());
            Ok(())
        } else {
            Err(format!("no such file '{}'", path))
        }
    }

    fn play(&mut self, id: &str) -> bool {
        let known = self.loaded.contains(id);
        if known {
            trace!("[audio] play '{}'", id);
        }
        known
    }
}

#[cfg(feature = "window")]
mod raylib_sink {
    use raylib::core::audio::{RaylibAudio, Sound};
    use rustc_hash::FxHashMap;

    use super::FxSink;

    /// Sounds backed by the raylib audio device. Lives entirely on the audio
    /// thread.
    pub struct RaylibFx<'a> {
        pub audio: &'a RaylibAudio,
        pub sounds: FxHashMap<String, Sound<'a>>,
    }

    impl FxSink for RaylibFx<'_> {
        fn load(&mut self, id: &str, path: &str) -> Result<(), String> {
            let sound = self.audio.new_sound(path).map_err(|e| e.to_string())?;
            self.sounds.insert(id.to_string(), sound);
            Ok(())
        }

        fn play(&mut self, id: &str) -> bool {
            match self.sounds.get(id) {
                Some(sound) => {
                    sound.play();
                    true
                }
                None => false,
            }
        }
    }
}

/// Run the audio loop on the raylib audio device.
#[cfg(feature = "window")]
pub fn raylib_audio_thread(rx_cmd: &Receiver<AudioCmd>, tx_msg: &Sender<AudioMessage>) {
    use raylib::core::audio::RaylibAudio;

    let audio = match RaylibAudio::init_audio_device() {
        Ok(device) => device,
        Err(e) => {
            log::warn!("Failed to initialize audio device: {}", e);
            for cmd in rx_cmd.iter() {
                if cmd == AudioCmd::Shutdown {
                    break;
                }
            }
            return;
        }
    };
    let mut sink = raylib_sink::RaylibFx {
        audio: &audio,
        sounds: rustc_hash::FxHashMap::default(),
    };
    audio_thread(rx_cmd, tx_msg, &mut sink);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[derive(Default)]
    struct Recorder {
        played: Vec<String>,
    }

    impl FxSink for Recorder {
        fn load(&mut self, id: &str, _path: &str) -> Result<(), String> {
            if id == "broken" {
                Err("bad header".into())
            } else {
                Ok(())
            }
        }

        fn play(&mut self, id: &str) -> bool {
            self.played.push(id.to_string());
            true
        }
    }

    #[test]
    fn test_loop_reports_loads_and_stops_on_shutdown() {
        let (tx_cmd, rx_cmd) = unbounded();
        let (tx_msg, rx_msg) = unbounded();
        tx_cmd
            .send(AudioCmd::LoadFx {
                id: "hoe".into(),
                path: "hoe.wav".into(),
            })
            .unwrap();
        tx_cmd
            .send(AudioCmd::LoadFx {
                id: "broken".into(),
                path: "x.wav".into(),
            })
            .unwrap();
        tx_cmd.send(AudioCmd::PlayFx { id: "hoe".into() }).unwrap();
        tx_cmd.send(AudioCmd::Shutdown).unwrap();
        tx_cmd.send(AudioCmd::PlayFx { id: "late".into() }).unwrap();

        let mut sink = Recorder::default();
        audio_thread(&rx_cmd, &tx_msg, &mut sink);

        assert_eq!(sink.played, vec!["hoe".to_string()]);
        let msgs: Vec<_> = rx_msg.try_iter().collect();
        assert_eq!(msgs[0], AudioMessage::FxLoaded { id: "hoe".into() });
        assert!(matches!(msgs[1], AudioMessage::FxLoadFailed { .. }));
    }

    #[test]
    fn test_log_sink_rejects_missing_file() {
        let mut sink = LogSink::default();
        assert!(sink.load("hoe", "/definitely/not/here.wav").is_err());
        assert!(!sink.play("hoe"));
    }
}
