//! # Speech Batch Domain
//!
//! Shared domain objects and contracts for the speech-batch pipeline.
//!
//! The generative model and the audio encoder are external collaborators;
//! this crate only describes what the batch layer needs from them
//! ([`SpeechGenerator`], [`GeneratorLoader`], [`OutputWriter`]) together with
//! the values that flow between them ([`ConversionJob`], [`ConversionResult`]).

pub mod context;
pub mod conversion_job;
pub mod conversion_result;
pub mod generation;
pub mod output_writer;
pub mod speaker_id;
pub mod voice_error;

pub use context::ContextTurn;
pub use conversion_job::{ConversionJob, DEFAULT_PREVIEW_CHARS};
pub use conversion_result::ConversionResult;
pub use generation::{GenerationRequest, GeneratorLoader, SpeechGenerator};
pub use output_writer::OutputWriter;
pub use speaker_id::SpeakerId;
pub use voice_error::{GenerationError, JobSpecError, PersistenceError};

/// Prelude module containing commonly used types.
pub mod prelude {
    pub use crate::{
        ContextTurn, ConversionJob, ConversionResult, GenerationError, GenerationRequest,
        GeneratorLoader, JobSpecError, OutputWriter, PersistenceError, SpeakerId,
        SpeechGenerator,
    };
}
