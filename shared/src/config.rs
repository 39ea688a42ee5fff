use serde::{Deserialize, Serialize};

use crate::{AppError, AppResult, ErrorKind};

pub const DEFAULT_SAVE_LABEL: &str = "Save";
pub const DEFAULT_CREATE_LABEL: &str = "Create";
pub const DEFAULT_SAVING_LABEL: &str = "Saving...";

/// Runtime knobs supplied by the shell via `Event::Configure`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    /// Expose the last failed request in the view model. Off by default: failures are silent.
    pub surface_errors: bool,
    pub save_label: String,
    pub create_label: String,
    pub saving_label: String,
}

impl Default for GalleryConfig {
    fn default() -> Self {
        Self {
            surface_errors: false,
            save_label: DEFAULT_SAVE_LABEL.into(),
            create_label: DEFAULT_CREATE_LABEL.into(),
            saving_label: DEFAULT_SAVING_LABEL.into(),
        }
    }
}

impl GalleryConfig {
    pub fn from_json(raw: &str) -> AppResult<Self> {
        serde_json::from_str(raw).map_err(|e| {
            AppError::new(ErrorKind::Deserialization, "invalid gallery configuration")
                .with_internal(e.to_string())
        })
    }
}
