//! Messages exchanged with the audio thread.

/// Commands sent *to* the audio thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioCmd {
    LoadFx { id: String, path: String },
    PlayFx { id: String },
    Shutdown,
}

/// Messages sent *back* from the audio thread.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AudioMessage {
    FxLoaded { id: String },
    FxLoadFailed { id: String, error: String },
}
