use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::AnalysisError;

/// Windowing policy used for Response Aggregation.
///
/// The branch is chosen by the caller for every run; it is never inferred
/// from the recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ControlBranch {
    /// Negative control: window anchored on the step offset
    ///
    /// Covers the last `pre` seconds of the step and `post` seconds after it.
    #[serde(alias = "neg")]
    NegativeControl,

    /// Experiment or positive control: window anchored on the current minimum
    ///
    /// Covers `pre` seconds before and `post` seconds after the peak inward
    /// current.
    #[serde(alias = "exp")]
    Experimental,
}

impl ControlBranch {
    /// Short name used in file names and the CLI
    pub fn short_name(&self) -> &'static str {
        match self {
            ControlBranch::NegativeControl => "neg",
            ControlBranch::Experimental => "exp",
        }
    }

    /// Returns all accepted spellings.
    pub fn variants() -> &'static [&'static str] {
        &["neg", "negative-control", "exp", "experimental"]
    }
}

impl fmt::Display for ControlBranch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ControlBranch::NegativeControl => write!(f, "negative-control"),
            ControlBranch::Experimental => write!(f, "experimental"),
        }
    }
}

impl FromStr for ControlBranch {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "neg" | "negative" | "negative-control" | "negative_control" => {
                Ok(ControlBranch::NegativeControl)
            }
            // Positive controls share the experimental windowing.
            "exp" | "experimental" | "experiment" | "pos" | "positive-control" => {
                Ok(ControlBranch::Experimental)
            }
            _ => Err(AnalysisError::UnknownBranch(s.to_string())),
        }
    }
}
