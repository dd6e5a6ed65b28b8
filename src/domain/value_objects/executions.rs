use serde::{Deserialize, Serialize};

pub const EXECUTE_PATH: &str = "/api/execute";

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ExecuteRequest {
    pub code: String,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ExecuteResponse {
    pub output: String,
}
