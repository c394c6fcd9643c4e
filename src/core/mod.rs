pub mod logging;

// Best-of-three match model, wizard state machine and output formatting
pub mod bo3;

// Text-generation client and the post-match message suggestion built on it
pub mod llm;
pub mod suggestion;
