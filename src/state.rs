use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::config::Config;
use crate::dashboard::{render, Dashboard};
use crate::data::model::Season;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    General,
    Analytics,
}

/// The full UI state, independent of rendering.
///
/// Nothing derived from the data is kept between interactions except the
/// last rendered view; every change of selection or file re-runs the
/// pipeline from the CSV.
pub struct AppState {
    pub data_path: PathBuf,

    /// Season requested by the user (None until the first choice).
    pub selection: Option<Season>,

    /// Last rendered page, None when loading failed.
    pub dashboard: Option<Dashboard>,

    /// Fatal load message replacing the whole page.
    pub fatal: Option<String>,

    pub tab: Tab,

    /// Status / error message shown in the top bar.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let mut state = Self {
            data_path: config.data_path,
            selection: None,
            dashboard: None,
            fatal: None,
            tab: Tab::General,
            status_message: None,
        };
        state.rerender();
        state
    }

    /// Re-run load → clean → filter → report for the current inputs.
    pub fn rerender(&mut self) {
        match render(&self.data_path, self.selection) {
            Ok(dashboard) => {
                self.selection = Some(dashboard.selected);
                self.dashboard = Some(dashboard);
                self.fatal = None;
            }
            Err(e) => {
                log::error!("Failed to load {}: {e}", self.data_path.display());
                self.dashboard = None;
                self.fatal = Some(e.to_string());
            }
        }
    }

    pub fn select_season(&mut self, season: Season) {
        if self.selection != Some(season) {
            self.selection = Some(season);
            self.rerender();
        }
    }

    /// Switch to another CSV; the season choice starts over.
    pub fn set_data_path(&mut self, path: PathBuf) {
        self.data_path = path;
        self.selection = None;
        self.status_message = None;
        self.rerender();
    }

    /// Write the current view as pretty JSON.
    pub fn export_json(&self, path: &Path) -> Result<()> {
        let dashboard = self
            .dashboard
            .as_ref()
            .context("nothing to export, no data loaded")?;
        let file = File::create(path)
            .with_context(|| format!("creating {}", path.display()))?;
        serde_json::to_writer_pretty(BufWriter::new(file), dashboard)
            .context("writing dashboard JSON")?;
        log::info!("Exported dashboard to {}", path.display());
        Ok(())
    }
}
