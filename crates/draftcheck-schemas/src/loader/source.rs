//! Byte sources for schema documents
//!
//! Copyright (c) 2025 Draftcheck Team
//! Licensed under the Apache-2.0 license

use crate::loader::error::{LoaderError, LoaderResult};
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use url::Url;

/// Fetches the raw bytes behind a schema location.
///
/// Locations are either canonical URLs produced by the resolver
/// (`file://`, `http://`, ...) or plain filesystem paths handed in by callers.
pub trait ResourceLoader: Send + Sync + Debug {
    fn load(&self, location: &str) -> LoaderResult<Vec<u8>>;
}

/// Loader serving filesystem paths, `file://` URLs and, with the `http`
/// feature, `http(s)://` URLs
#[derive(Debug, Default, Clone)]
pub struct DefaultLoader {
    #[cfg(feature = "http")]
    client: Option<reqwest::blocking::Client>,
}

impl DefaultLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a preconfigured blocking client for remote documents
    #[cfg(feature = "http")]
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            client: Some(client),
        }
    }

    fn read_file(&self, path: &Path, location: &str) -> LoaderResult<Vec<u8>> {
        log::debug!("reading schema document {}", path.display());
        std::fs::read(path).map_err(|e| LoaderError::io_error(location, e))
    }

    #[cfg(feature = "http")]
    fn fetch(&self, url: &Url) -> LoaderResult<Vec<u8>> {
        log::debug!("fetching schema document {}", url);
        let response = match &self.client {
            Some(client) => client.get(url.as_str()).send(),
            None => reqwest::blocking::get(url.as_str()),
        }
        .map_err(|e| LoaderError::http_error(url.as_str(), e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(LoaderError::http_error(url.as_str(), format!("HTTP {}", status)));
        }
        response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| LoaderError::http_error(url.as_str(), e.to_string()))
    }

    #[cfg(not(feature = "http"))]
    fn fetch(&self, url: &Url) -> LoaderResult<Vec<u8>> {
        Err(LoaderError::unsupported_scheme(url.as_str(), url.scheme()))
    }
}

impl ResourceLoader for DefaultLoader {
    fn load(&self, location: &str) -> LoaderResult<Vec<u8>> {
        match parse_absolute_url(location) {
            Some(url) => match url.scheme() {
                "file" => {
                    let path = url.to_file_path().map_err(|_| {
                        LoaderError::invalid_reference(location, "file URL has no local path")
                    })?;
                    self.read_file(&path, location)
                }
                "http" | "https" => self.fetch(&url),
                other => Err(LoaderError::unsupported_scheme(location, other)),
            },
            None => self.read_file(&PathBuf::from(location), location),
        }
    }
}

/// Parse `location` as an absolute URL, treating single-letter schemes as
/// Windows drive prefixes rather than URLs
pub fn parse_absolute_url(location: &str) -> Option<Url> {
    Url::parse(location).ok().filter(|url| url.scheme().len() > 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_loads_plain_paths_and_file_urls() -> LoaderResult<()> {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("schema.json");
        fs::write(&file_path, br#"{"type": "string"}"#).unwrap();

        let loader = DefaultLoader::new();
        let by_path = loader.load(file_path.to_str().unwrap())?;
        assert_eq!(by_path, br#"{"type": "string"}"#);

        let url = Url::from_file_path(&file_path).unwrap();
        let by_url = loader.load(url.as_str())?;
        assert_eq!(by_url, by_path);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempdir().unwrap();
        let missing = dir.path().join("missing.json");
        let err = DefaultLoader::new().load(missing.to_str().unwrap()).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }

    #[test]
    fn test_unknown_scheme_is_rejected() {
        let err = DefaultLoader::new().load("ftp://example.com/schema.json").unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedScheme { ref scheme, .. } if scheme == "ftp"));
    }

    #[cfg(not(feature = "http"))]
    #[test]
    fn test_http_requires_feature() {
        let err = DefaultLoader::new().load("https://example.com/schema.json").unwrap_err();
        assert!(matches!(err, LoaderError::UnsupportedScheme { .. }));
    }

    #[test]
    fn test_drive_letters_are_not_schemes() {
        assert!(parse_absolute_url("C:/schemas/a.json").is_none());
        assert!(parse_absolute_url("relative/a.json").is_none());
        assert!(parse_absolute_url("file:///tmp/a.json").is_some());
    }
}
