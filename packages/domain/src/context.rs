//! Prior conversation turns used to condition a generation.

use serde::{Deserialize, Serialize};

use crate::speaker_id::SpeakerId;

/// One prior (text, audio) turn supplied for voice/style continuity.
///
/// `audio` may be empty for a text-only turn. An empty context list means no
/// conditioning at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContextTurn {
    pub speaker: SpeakerId,
    pub text: String,
    #[serde(default)]
    pub audio: Vec<f32>,
}

impl ContextTurn {
    pub fn new(speaker: impl Into<SpeakerId>, text: impl Into<String>, audio: Vec<f32>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
            audio,
        }
    }

    /// Turn carrying text only.
    pub fn text_only(speaker: impl Into<SpeakerId>, text: impl Into<String>) -> Self {
        Self::new(speaker, text, Vec::new())
    }
}
