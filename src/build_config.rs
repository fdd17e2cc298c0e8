//! Build configuration validation
//!
//! Maps the caller's app type details onto the build configuration the
//! provisioning service understands. Every value is checked against a fixed
//! whitelist; matching is exact and accepted values are echoed unchanged.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result, ValidationError};

/// App types accepted on input
pub const APP_TYPES: &[&str] = &["AspNet", "AspNetWap", "AspNetCore", "NodeJS", "Python"];

pub const NODEJS_TASK_RUNNERS: &[&str] = &["Gulp", "Grunt", "None"];

pub const PYTHON_FRAMEWORKS: &[&str] = &["Bottle", "Django", "Flask", "None"];

/// Python runtimes, in normalized form (see [`normalize_runtime_version`])
pub const PYTHON_VERSIONS: &[&str] = &[
    "Python2712x64",
    "Python2712x86",
    "Python2713x64",
    "Python2713x86",
    "Python353x64",
    "Python353x86",
    "Python360x64",
    "Python360x86",
    "Python361x64",
    "Python361x86",
    "Python362x64",
    "Python362x86",
];

/// Legacy app type tags and the tag the service expects instead
const APP_TYPE_SYNONYMS: &[(&str, &str)] = &[("AspNet", "AspNetWap")];

/// User-chosen application details; every field is optional on input
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppTypeDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub app_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub nodejs_task_runner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_framework: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

impl AppTypeDetails {
    pub fn new(app_type: &str) -> Self {
        Self {
            app_type: Some(app_type.to_string()),
            ..Self::default()
        }
    }
}

/// Validated build configuration, only produced by [`build`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BuildConfiguration {
    #[serde(rename = "type")]
    pub app_type: String,

    #[serde(rename = "nodeType", skip_serializing_if = "Option::is_none")]
    pub task_runner: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_framework: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub python_version: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub working_directory: Option<String>,
}

/// Strip whitespace and punctuation: `"Python 2.7.12 x64"` becomes `"Python2712x64"`
pub fn normalize_runtime_version(raw: &str) -> String {
    raw.chars()
        .filter(|c| !c.is_whitespace() && !c.is_ascii_punctuation())
        .collect()
}

fn canonical_app_type(app_type: &str) -> &str {
    APP_TYPE_SYNONYMS
        .iter()
        .find(|(legacy, _)| *legacy == app_type)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(app_type)
}

fn accepted(values: &[&str]) -> String {
    values.join(", ")
}

fn whitelisted<'a>(value: Option<&'a str>, values: &[&str]) -> Option<&'a str> {
    value.filter(|v| values.iter().any(|allowed| allowed == v))
}

/// Validate `details` and produce the build configuration for it
pub fn build(details: &AppTypeDetails) -> Result<BuildConfiguration> {
    let app_type = details
        .app_type
        .as_deref()
        .ok_or(ConfigError::MissingAppType)?;

    if !APP_TYPES.contains(&app_type) {
        return Err(ValidationError::UnsupportedAppType {
            value: app_type.to_string(),
            accepted: accepted(APP_TYPES),
        }
        .into());
    }

    let mut config = BuildConfiguration {
        app_type: canonical_app_type(app_type).to_string(),
        task_runner: None,
        python_framework: None,
        python_version: None,
        working_directory: details.working_directory.clone(),
    };

    match app_type {
        "NodeJS" => {
            let runner = details.nodejs_task_runner.as_deref();
            let runner = whitelisted(runner, NODEJS_TASK_RUNNERS).ok_or_else(|| {
                ValidationError::UnsupportedTaskRunner {
                    value: runner.unwrap_or_default().to_string(),
                    accepted: accepted(NODEJS_TASK_RUNNERS),
                }
            })?;
            config.task_runner = Some(runner.to_string());
        }
        "Python" => {
            let framework = details.python_framework.as_deref();
            let framework = whitelisted(framework, PYTHON_FRAMEWORKS).ok_or_else(|| {
                ValidationError::UnsupportedFramework {
                    value: framework.unwrap_or_default().to_string(),
                    accepted: accepted(PYTHON_FRAMEWORKS),
                }
            })?;

            let raw_version = details.python_version.as_deref().unwrap_or_default();
            let version = normalize_runtime_version(raw_version);
            if !PYTHON_VERSIONS.contains(&version.as_str()) {
                return Err(ValidationError::UnsupportedRuntimeVersion {
                    value: raw_version.to_string(),
                    accepted: accepted(PYTHON_VERSIONS),
                }
                .into());
            }

            config.python_framework = Some(framework.to_string());
            config.python_version = Some(version);
        }
        _ => {}
    }

    Ok(config)
}

/// One row per accepted app type, with the options it takes
pub fn supported_app_types() -> Vec<(&'static str, &'static str, String)> {
    APP_TYPES
        .iter()
        .map(|&app_type| {
            let options = match app_type {
                "NodeJS" => format!("task runner: {}", accepted(NODEJS_TASK_RUNNERS)),
                "Python" => format!(
                    "framework: {}; version: e.g. 'Python 3.6.0 x64'",
                    accepted(PYTHON_FRAMEWORKS)
                ),
                _ => "-".to_string(),
            };
            (app_type, canonical_app_type(app_type), options)
        })
        .collect()
}
