//! Server configuration
//!
//! Read once at startup from TOML and never changed afterwards. Lookup order:
//! 1. an explicit path (`frogboard serve --config`)
//! 2. `FROGBOARD_CONFIG`
//! 3. `~/.frogboard/config.toml`, when it exists
//! 4. built-in defaults
//!
//! `FROGBOARD_PORT` then overrides the port of `bind`.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::{Path, PathBuf};

use frogboard_core::{Ban, BanList, BoardDirectory, BoardError, BoardInfo, Renderer};
use serde::Deserialize;
use thiserror::Error;

/// Default listen port
pub const DEFAULT_PORT: u16 = 7543;

/// Env var naming the config file
pub const CONFIG_ENV: &str = "FROGBOARD_CONFIG";

/// Env var overriding the listen port
pub const PORT_ENV: &str = "FROGBOARD_PORT";

const MAX_PAGE_SIZE: usize = 100;
const MAX_REPLY_PREVIEW: usize = 50;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {}", .path.display(), .source)]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {origin}: {source}")]
    Parse {
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid FROGBOARD_PORT value '{0}'")]
    InvalidPort(String),

    #[error("invalid config: {0}")]
    Invalid(String),

    #[error("invalid board in config: {0}")]
    Board(#[from] BoardError),
}

/// A `[[boards]]` entry
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoardConfig {
    pub id: String,
    pub full_name: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address (default: 127.0.0.1:7543)
    pub bind: SocketAddr,
    pub site_name: String,
    /// Threads per board page
    pub page_size: usize,
    /// Replies shown under each thread on board pages
    pub reply_preview: usize,
    /// Maximum post length in characters
    pub max_content_len: usize,
    /// Directory served under `/public` (compiled stylesheet and friends)
    pub public_dir: Option<PathBuf>,
    pub boards: Vec<BoardConfig>,
    pub bans: Vec<Ban>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from((Ipv4Addr::LOCALHOST, DEFAULT_PORT)),
            site_name: "frogboard".to_owned(),
            page_size: frogboard_core::models::pagination::DEFAULT_PER_PAGE,
            reply_preview: 5,
            max_content_len: frogboard_core::models::DEFAULT_MAX_CONTENT_LEN,
            public_dir: None,
            boards: vec![BoardConfig {
                id: "b".to_owned(),
                full_name: "Random".to_owned(),
            }],
            bans: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Locate, read and validate the configuration, then apply env overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let from_env = std::env::var_os(CONFIG_ENV).map(PathBuf::from);

        let mut config = match locate(explicit, from_env, Self::default_path()) {
            Some(path) => {
                tracing::info!(path = %path.display(), "loading config");
                Self::from_file(&path)?
            }
            None => {
                tracing::info!("no config file found, using defaults");
                Self::default()
            }
        };

        if let Ok(port) = std::env::var(PORT_ENV) {
            config.override_port(&port)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// `~/.frogboard/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".frogboard").join("config.toml"))
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&raw, &path.display().to_string())
    }

    /// Parse and validate TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self, ConfigError> {
        Self::parse(raw, "<inline>")
    }

    fn parse(raw: &str, origin: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(raw).map_err(|source| ConfigError::Parse {
            origin: origin.to_owned(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Replace the port of `bind`.
    pub fn override_port(&mut self, raw: &str) -> Result<(), ConfigError> {
        let port: u16 = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidPort(raw.to_owned()))?;
        self.bind.set_port(port);
        Ok(())
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(ConfigError::Invalid(format!(
                "page_size must be between 1 and {MAX_PAGE_SIZE}"
            )));
        }

        if self.reply_preview > MAX_REPLY_PREVIEW {
            return Err(ConfigError::Invalid(format!(
                "reply_preview must be at most {MAX_REPLY_PREVIEW}"
            )));
        }

        if self.max_content_len == 0 {
            return Err(ConfigError::Invalid("max_content_len must be positive".into()));
        }

        if self.boards.is_empty() {
            return Err(ConfigError::Invalid("at least one board is required".into()));
        }

        // Catches bad slugs and duplicate ids
        self.directory().map(|_| ())
    }

    /// Build the board directory described by `[[boards]]`.
    pub fn directory(&self) -> Result<BoardDirectory, ConfigError> {
        let mut directory = BoardDirectory::new();
        for board in &self.boards {
            let info = BoardInfo::new(&board.id, &board.full_name).map_err(BoardError::from)?;
            directory.insert(info)?;
        }
        Ok(directory)
    }

    pub fn ban_list(&self) -> BanList {
        BanList::new(self.bans.iter().cloned())
    }

    pub fn renderer(&self) -> Renderer {
        Renderer::new()
            .site_name(&self.site_name)
            .max_content_len(self.max_content_len)
    }
}

/// Pick the config file: explicit path, then env, then the default path if
/// a file is there.
fn locate(
    explicit: Option<&Path>,
    from_env: Option<PathBuf>,
    default: Option<PathBuf>,
) -> Option<PathBuf> {
    explicit
        .map(Path::to_path_buf)
        .or(from_env)
        .or_else(|| default.filter(|path| path.is_file()))
}
