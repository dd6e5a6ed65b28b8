pub mod code_execution;
pub mod event_channel;
pub mod model_upload;
pub mod simulation;
pub mod sinks;
pub mod viewer_token;
