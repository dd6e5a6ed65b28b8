pub mod api_client;
pub mod code_execution;
pub mod model_upload;
pub mod simulation;
pub mod viewer_token;
#[cfg(test)]
pub mod test_server;
