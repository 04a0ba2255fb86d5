//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;

const DEFAULT_ADDR: &str = "0.0.0.0:3001";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Directory holding the mesh data files (`*.json`).
    pub data_dir: PathBuf,
    /// Directory holding `index.html` and the wasm bundle.
    pub web_dir: PathBuf,
}

impl ServerConfig {
    /// Read `MESHVIEWER_ADDR`, `MESHVIEWER_DATA_DIR` and `MESHVIEWER_WEB_DIR`.
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let addr = get("MESHVIEWER_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr
            .parse()
            .map_err(|e| format!("invalid MESHVIEWER_ADDR '{addr}': {e}"))?;
        Ok(Self {
            addr,
            data_dir: get("MESHVIEWER_DATA_DIR").unwrap_or_else(|| "data".into()).into(),
            web_dir: get("MESHVIEWER_WEB_DIR").unwrap_or_else(|| "web".into()).into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr.port(), 3001);
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.web_dir, PathBuf::from("web"));
    }

    #[test]
    fn test_overrides_and_bad_addr() {
        let config = ServerConfig::from_lookup(|key| match key {
            "MESHVIEWER_ADDR" => Some("127.0.0.1:8080".into()),
            "MESHVIEWER_DATA_DIR" => Some("/srv/meshes".into()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr.port(), 8080);
        assert_eq!(config.data_dir, PathBuf::from("/srv/meshes"));

        assert!(ServerConfig::from_lookup(|_| Some("nope".into())).is_err());
    }
}
