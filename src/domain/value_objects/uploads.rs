use serde::{Deserialize, Deserializer};

pub const MODEL_FIELD_NAME: &str = "model";
pub const UPLOAD_MODEL_PATH: &str = "/api/upload_model";
pub const MISSING_ASSET_ID_ERROR: &str = "no asset id returned";

/// A model file as picked by the user. No format validation is done here;
/// the server decides what it accepts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ModelFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub fn mime_type(&self) -> String {
        mime_guess::from_path(&self.file_name)
            .first_or_octet_stream()
            .essence_str()
            .to_string()
    }
}

/// Body returned by the upload endpoint. Only one of `asset_id` and `error`
/// is expected, but nothing on the wire enforces that.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct UploadResult {
    #[serde(default, deserialize_with = "deserialize_asset_id")]
    pub asset_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub details: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Succeeded { asset_id: String },
    Failed { error: String },
}

impl UploadOutcome {
    pub fn notification(&self) -> String {
        match self {
            UploadOutcome::Succeeded { asset_id } => {
                format!("Upload Successful. Asset ID: {}", asset_id)
            }
            UploadOutcome::Failed { error } => format!("Upload failed: {}", error),
        }
    }

    pub fn asset_id(&self) -> Option<&str> {
        match self {
            UploadOutcome::Succeeded { asset_id } => Some(asset_id),
            UploadOutcome::Failed { .. } => None,
        }
    }
}

impl From<UploadResult> for UploadOutcome {
    // asset_id wins when the server sends both fields.
    fn from(result: UploadResult) -> Self {
        match (result.asset_id, result.error) {
            (Some(asset_id), _) => UploadOutcome::Succeeded { asset_id },
            (None, Some(error)) => UploadOutcome::Failed { error },
            (None, None) => UploadOutcome::Failed {
                error: MISSING_ASSET_ID_ERROR.to_string(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AssetIdRepr {
    Text(String),
    Number(serde_json::Number),
}

// The server forwards the tileset service's numeric id as-is.
fn deserialize_asset_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<AssetIdRepr>::deserialize(deserializer)?;
    Ok(raw
        .map(|repr| match repr {
            AssetIdRepr::Text(text) => text,
            AssetIdRepr::Number(number) => number.to_string(),
        })
        .filter(|id| !id.trim().is_empty()))
}
