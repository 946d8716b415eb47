//! Document loading
//!
//! Thin adapter turning YAML or JSON text into the [`Value`] tree consumed by
//! the generator. The format of a file is taken from its extension.

use crate::error::Error;
use crate::value::Value;
use std::fs;
use std::path::Path;

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Yaml,
    Json,
}

impl DocumentFormat {
    /// Picks the format from a file extension (`yml`, `yaml` or `json`)
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "yml" | "yaml" => Some(DocumentFormat::Yaml),
            "json" => Some(DocumentFormat::Json),
            _ => None,
        }
    }

    /// Parses `text` in this format
    pub fn parse(self, text: &str) -> Result<Value, Error> {
        match self {
            DocumentFormat::Yaml => from_yaml_str(text),
            DocumentFormat::Json => from_json_str(text),
        }
    }
}

pub fn from_yaml_str(text: &str) -> Result<Value, Error> {
    Ok(serde_yaml::from_str(text)?)
}

pub fn from_json_str(text: &str) -> Result<Value, Error> {
    Ok(serde_json::from_str(text)?)
}

/// Reads and parses the document at `path`
pub fn load_path(path: impl AsRef<Path>) -> Result<Value, Error> {
    let path = path.as_ref();
    let format = DocumentFormat::from_path(path).ok_or_else(|| Error::UnsupportedFormat {
        path: path.to_path_buf(),
    })?;
    let text = fs::read_to_string(path)?;
    format.parse(&text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_extension() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("conf.yml")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("dir/conf.YAML")),
            Some(DocumentFormat::Yaml)
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("conf.json")),
            Some(DocumentFormat::Json)
        );
        assert_eq!(DocumentFormat::from_path(Path::new("conf.toml")), None);
        assert_eq!(DocumentFormat::from_path(Path::new("conf")), None);
    }

    #[test]
    fn test_yaml_markers_parse_as_plain_keys() {
        let value = from_yaml_str("$alpha: [1, 2]\nbeta:\n  a|b: 0.5\n").unwrap();
        assert!(value.get("$alpha").is_some_and(Value::is_array));
        assert_eq!(
            value
                .get("beta")
                .and_then(|beta| beta.get("a|b"))
                .and_then(Value::as_float),
            Some(0.5)
        );
    }

    #[test]
    fn test_invalid_json_is_reported() {
        assert!(matches!(from_json_str("{\"a\": "), Err(Error::Json(_))));
    }

    #[test]
    fn test_unsupported_extension() {
        assert!(matches!(
            load_path("missing.toml"),
            Err(Error::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            load_path("definitely/not/here.yml"),
            Err(Error::Io(_))
        ));
    }
}
