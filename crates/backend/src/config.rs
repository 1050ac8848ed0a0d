use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 3000;

/// Server settings, read once from the environment at startup.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub port: u16,
    pub assets_dir: PathBuf,
    pub dist_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            port: DEFAULT_PORT,
            assets_dir: PathBuf::from("assets"),
            dist_dir: PathBuf::from("dist"),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source so tests don't touch the process env.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, String> {
        let defaults = Config::default();
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|e| format!("Invalid PORT {raw:?}: {e}"))?,
            None => defaults.port,
        };
        Ok(Config {
            port,
            assets_dir: lookup("ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            dist_dir: lookup("DIST_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.dist_dir),
        })
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.assets_dir.join("catalog.json")
    }

    pub fn index_path(&self) -> PathBuf {
        self.dist_dir.join("index.html")
    }

    pub fn dist_assets_dir(&self) -> PathBuf {
        self.dist_dir.join("assets")
    }
}
