use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::{RecordingError, RecordingFormat};

/// Output folder for measurement tables inside a cell folder
pub const ANALYSED_DATA_DIR: &str = "analysedData";

/// Output folder for diagnostic plots inside a cell folder
pub const FIGURES_DIR: &str = "figures";

/// Which stimulus the hold recordings were made with
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperimentKind {
    /// Optical (UV LED) pulse
    #[default]
    #[serde(alias = "UV")]
    Uv,
    /// Drug addition step
    #[serde(alias = "Drug")]
    Drug,
}

impl ExperimentKind {
    /// Name of the hold folder holding this kind of recording
    pub fn hold_folder_name(&self) -> &'static str {
        match self {
            ExperimentKind::Uv => "holds_UV",
            ExperimentKind::Drug => "holds_drug",
        }
    }

    /// Returns all available kind names.
    pub fn variants() -> &'static [&'static str] {
        &["uv", "drug"]
    }
}

impl fmt::Display for ExperimentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExperimentKind::Uv => write!(f, "UV"),
            ExperimentKind::Drug => write!(f, "drug"),
        }
    }
}

impl FromStr for ExperimentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "uv" => Ok(ExperimentKind::Uv),
            "drug" => Ok(ExperimentKind::Drug),
            _ => Err(format!(
                "Unknown experiment kind '{}'. Valid options: {}",
                s,
                ExperimentKind::variants().join(", ")
            )),
        }
    }
}

/// One `csX_cellX` folder holding hold recordings and analysis output
#[derive(Debug, Clone)]
pub struct CellFolder {
    root: PathBuf,
}

impl CellFolder {
    /// Wrap a cell folder path
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Folder path
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder name as written into measurement rows (`cs4_cell1`)
    pub fn label(&self) -> String {
        self.root
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.root.display().to_string())
    }

    /// Hold folder for an experiment kind
    pub fn hold_folder(&self, kind: ExperimentKind) -> PathBuf {
        self.root.join(kind.hold_folder_name())
    }

    /// Folder for measurement tables
    pub fn analysed_data_dir(&self) -> PathBuf {
        self.root.join(ANALYSED_DATA_DIR)
    }

    /// Folder for diagnostic plots
    pub fn figures_dir(&self) -> PathBuf {
        self.root.join(FIGURES_DIR)
    }

    /// Default measurement table, `holding_current_values_{kind}_pA.csv`
    pub fn default_output_path(&self, kind: ExperimentKind) -> PathBuf {
        self.analysed_data_dir()
            .join(format!("holding_current_values_{}_pA.csv", kind))
    }

    /// Recordings in the hold folder for `kind`, sorted by file name
    pub fn recordings(&self, kind: ExperimentKind) -> Result<Vec<PathBuf>, RecordingError> {
        discover_recordings(&self.hold_folder(kind))
    }
}

/// List supported recording files in a folder, sorted by file name
pub fn discover_recordings(folder: &Path) -> Result<Vec<PathBuf>, RecordingError> {
    if !folder.is_dir() {
        return Err(RecordingError::MissingHoldFolder(folder.to_path_buf()));
    }

    let mut recordings = Vec::new();
    for entry in std::fs::read_dir(folder)? {
        let path = entry?.path();
        if path.is_file() && RecordingFormat::from_path(&path).is_ok() {
            recordings.push(path);
        }
    }

    recordings.sort();
    Ok(recordings)
}
