//! The WebUI's flat `ui-config.json` map.
//!
//! The schema belongs to the external application: a single JSON object with
//! string keys like `txt2img/Preferred VAE/value` and mixed-type values.
//! sdfix reads and overwrites the file wholesale — there are no
//! partial-update semantics — and never coerces values, so whatever was
//! written reads back identically.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::error::{Result, SdfixError};

/// Default filename inside the install root.
pub const UI_CONFIG_FILENAME: &str = "ui-config.json";

/// Keys the WebUI reads the preferred VAE from.
pub const TXT2IMG_PREFERRED_VAE: &str = "txt2img/Preferred VAE/value";
pub const IMG2IMG_PREFERRED_VAE: &str = "img2img/Preferred VAE/value";

/// In-memory copy of the config map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiConfig {
    values: BTreeMap<String, Value>,
}

impl UiConfig {
    /// Empty config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a file. A missing file is an empty config (the WebUI
    /// creates it on first start; the fix must work before that).
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::new());
        }
        let text = fs::read_to_string(path)?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| SdfixError::UiConfigInvalid {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        match value {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            other => Err(SdfixError::UiConfigInvalid {
                path: path.to_path_buf(),
                message: format!("expected a JSON object, found {}", json_kind(&other)),
            }),
        }
    }

    /// Overwrite `path` wholesale with the current map, pretty-printed the
    /// way the WebUI writes it.
    pub fn save(&self, path: &Path) -> Result<()> {
        let map: serde_json::Map<String, Value> =
            self.values.iter().map(|(k, v)| (k.clone(), v.clone())).collect();
        let text = serde_json::to_string_pretty(&Value::Object(map))?;
        fs::write(path, text)?;
        tracing::info!(path = %path.display(), "wrote ui-config");
        Ok(())
    }

    /// Get a value.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Set a value, returning the previous one.
    pub fn set(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.values.insert(key.into(), value)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate keys and values in sorted order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }

    /// Set the preferred VAE for both txt2img and img2img.
    pub fn set_preferred_vae(&mut self, vae_name: &str) {
        self.set(TXT2IMG_PREFERRED_VAE, Value::String(vae_name.to_string()));
        self.set(IMG2IMG_PREFERRED_VAE, Value::String(vae_name.to_string()));
    }

    /// The currently configured txt2img VAE, if any.
    pub fn preferred_vae(&self) -> Option<&str> {
        self.get(TXT2IMG_PREFERRED_VAE).and_then(Value::as_str)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
