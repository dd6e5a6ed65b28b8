pub mod code_execution;
pub mod live_simulation;
pub mod upload_model;
pub mod viewer_config;
