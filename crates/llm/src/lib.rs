//! Provider backends for the beamline runtime: OpenAI, Claude, and Gemini
//! implementations of `ProviderCapability`, plus the standard model-id
//! registry wiring.

pub mod config;
pub mod providers;

pub use config::LlmConfig;
pub use providers::standard_registry;
