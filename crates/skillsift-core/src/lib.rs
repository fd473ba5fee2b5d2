pub mod envelope;
pub mod input;
pub mod labels;

pub use envelope::{
    EmbeddingBatchEnvelope, EmbeddingEnvelope, EntitiesEnvelope, EntitySpan, RejectedInput,
    SkillResult, SkillsEnvelope,
};
pub use input::EmbedInput;
pub use labels::DEFAULT_SKILLS;
