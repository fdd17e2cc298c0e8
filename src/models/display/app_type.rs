//! Supported app type display model

use serde::Serialize;
use tabled::Tabled;

use crate::build_config;

/// One supported app type for table/JSON output.
#[derive(Debug, Clone, Tabled, Serialize)]
pub struct AppTypeDisplay {
    /// Value accepted by `--app-type`
    #[tabled(rename = "APP TYPE")]
    pub app_type: String,

    /// Value sent to the build service
    #[tabled(rename = "BUILD TYPE")]
    pub build_type: String,

    #[tabled(rename = "OPTIONS")]
    pub options: String,
}

impl AppTypeDisplay {
    pub fn all() -> Vec<Self> {
        build_config::supported_app_types()
            .into_iter()
            .map(|(app_type, build_type, options)| Self {
                app_type: app_type.to_string(),
                build_type: build_type.to_string(),
                options,
            })
            .collect()
    }
}
