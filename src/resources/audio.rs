//! Bridge between the game thread and the background audio thread.
//!
//! Use [`setup_audio`] once during startup to spawn the audio thread and get
//! an [`AudioBridge`]. Gameplay code only holds an [`AudioHandle`], which is
//! a clonable fire-and-forget sender. Call [`shutdown_audio`] during teardown
//! to stop the thread.

use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crossbeam_channel::{Receiver, Sender, unbounded};
use log::{debug, info, warn};

use crate::events::audio::{AudioCmd, AudioMessage};
use crate::systems::audio::{LogSink, audio_thread};

/// Sound effect ids the game plays.
pub const SOUND_IDS: [&str; 8] = [
    "hoe", "axe", "water", "plant", "interact", "hurt", "buy", "sell",
];

/// Owns the audio thread and both ends of its channels.
pub struct AudioBridge {
    /// Sender for [`AudioCmd`] messages (game -> audio thread).
    pub tx_cmd: Sender<AudioCmd>,
    /// Receiver for [`AudioMessage`] messages (audio thread -> game).
    pub rx_msg: Receiver<AudioMessage>,
    /// Join handle for the background audio thread.
    pub handle: JoinHandle<()>,
}

impl AudioBridge {
    pub fn handle(&self) -> AudioHandle {
        AudioHandle {
            tx: Some(self.tx_cmd.clone()),
        }
    }

    /// Ask the audio thread to load a sound effect.
    pub fn load_fx(&self, id: &str, path: &str) {
        let _ = self.tx_cmd.send(AudioCmd::LoadFx {
            id: id.to_string(),
            path: path.to_string(),
        });
    }

    /// Drain replies without blocking and log them. Returns how many sounds
    /// failed to load.
    pub fn drain_messages(&self) -> usize {
        self.rx_msg.try_iter().filter(|msg| !log_reply(msg)).count()
    }

    /// Wait for the replies to `expected` loads, at most `timeout` in total,
    /// and log them. Returns how many sounds failed to load.
    pub fn await_loads(&self, expected: usize, timeout: Duration) -> usize {
        let deadline = Instant::now() + timeout;
        let mut failed = 0;
        for _ in 0..expected {
            match self.rx_msg.recv_deadline(deadline) {
                Ok(msg) => failed += usize::from(!log_reply(&msg)),
                Err(_) => {
                    warn!("Audio thread did not confirm every sound in {:?}", timeout);
                    break;
                }
            }
        }
        failed
    }
}

/// Log one reply. Returns `false` for a failed load.
fn log_reply(msg: &AudioMessage) -> bool {
    match msg {
        AudioMessage::FxLoaded { id } => {
            debug!("Sound '{}' ready", id);
            true
        }
        AudioMessage::FxLoadFailed { id, error } => {
            warn!("Sound '{}' unavailable, playing without it: {}", id, error);
            false
        }
    }
}

/// Fire-and-forget access to the audio thread.
///
/// A disabled handle drops every request, which is what tests and
/// `[audio] enabled = false` use.
#[derive(Debug, Clone, Default)]
pub struct AudioHandle {
    tx: Option<Sender<AudioCmd>>,
}

impl AudioHandle {
    pub fn disabled() -> Self {
        AudioHandle { tx: None }
    }

    /// Handle that feeds an arbitrary channel, for observing requests.
    pub fn from_sender(tx: Sender<AudioCmd>) -> Self {
        AudioHandle { tx: Some(tx) }
    }

    pub fn is_enabled(&self) -> bool {
        self.tx.is_some()
    }

    /// Queue a sound effect. Never blocks; a closed channel is ignored.
    pub fn play_fx(&self, id: &str) {
        if let Some(tx) = &self.tx {
            let _ = tx.send(AudioCmd::PlayFx { id: id.to_string() });
        }
    }
}

/// Spawn the audio thread.
///
/// `run` is the thread body, usually [`audio_thread`] over a sink built on
/// that thread, so backends that must stay on one thread (the raylib audio
/// device) are created there.
pub fn setup_audio<F>(run: F) -> AudioBridge
where
    F: FnOnce(&Receiver<AudioCmd>, &Sender<AudioMessage>) + Send + 'static,
{
    let (tx_cmd, rx_cmd) = unbounded::<AudioCmd>();
    let (tx_msg, rx_msg) = unbounded::<AudioMessage>();

    let handle = std::thread::spawn(move || run(&rx_cmd, &tx_msg));
    info!("Audio thread started");

    AudioBridge {
        tx_cmd,
        rx_msg,
        handle,
    }
}

/// Audio thread for headless runs.
pub fn setup_headless_audio() -> AudioBridge {
    setup_audio(|rx, tx| audio_thread(rx, tx, &mut LogSink::default()))
}

/// Request shutdown of the audio thread and join it.
pub fn shutdown_audio(bridge: AudioBridge) {
    let _ = bridge.tx_cmd.send(AudioCmd::Shutdown);
    let _ = bridge.handle.join();
    info!("Audio thread stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_handle_is_silent() {
        let handle = AudioHandle::disabled();
        assert!(!handle.is_enabled());
        handle.play_fx("hoe");
    }

    #[test]
    fn test_play_fx_sends_command() {
        let (tx, rx) = unbounded();
        let handle = AudioHandle::from_sender(tx);
        handle.play_fx("axe");
        assert_eq!(rx.try_recv().unwrap(), AudioCmd::PlayFx { id: "axe".into() });
    }

    #[test]
    fn test_headless_bridge_reports_missing_sound() {
        let bridge = setup_headless_audio();
        bridge.load_fx("hoe", "/definitely/not/here.wav");
        let msg = bridge.rx_msg.recv().unwrap();
        assert!(matches!(msg, AudioMessage::FxLoadFailed { .. }));
        shutdown_audio(bridge);
    }

    #[test]
    fn test_await_loads_reports_failures_before_play() {
        let bridge = setup_headless_audio();
        bridge.load_fx("hoe", "/definitely/not/here.wav");
        bridge.load_fx("axe", "/definitely/not/there.wav");
        assert_eq!(bridge.await_loads(2, Duration::from_secs(5)), 2);
        assert_eq!(bridge.drain_messages(), 0);
        shutdown_audio(bridge);
    }

    #[test]
    fn test_await_loads_gives_up_at_deadline() {
        let bridge = setup_headless_audio();
        assert_eq!(bridge.await_loads(1, Duration::from_millis(20)), 0);
        shutdown_audio(bridge);
    }

    #[test]
    fn test_closed_channel_is_ignored() {
        let (tx, rx) = unbounded();
        drop(rx);
        AudioHandle::from_sender(tx).play_fx("water");
    }
}
