use std::path::PathBuf;

/// Dataset shipped next to the dashboard.
pub const DEFAULT_DATA_PATH: &str = "dataclean_analisis.csv";

/// Environment variable overriding the dataset path.
pub const DATA_PATH_ENV: &str = "BIKE_DASHBOARD_DATA";

/// Start-up configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub data_path: PathBuf,
}

impl Config {
    /// Resolve the data path: first CLI argument, then `BIKE_DASHBOARD_DATA`,
    /// then [`DEFAULT_DATA_PATH`].
    pub fn resolve(arg: Option<String>, env: Option<String>) -> Self {
        let data_path = arg
            .or(env)
            .filter(|p| !p.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));
        Config { data_path }
    }

    pub fn from_env() -> Self {
        Self::resolve(std::env::args().nth(1), std::env::var(DATA_PATH_ENV).ok())
    }
}
