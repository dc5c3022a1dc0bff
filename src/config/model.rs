// src/config/model.rs

use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

use crate::types::{StepId, StepSpec};

/// Top-level configuration as read from a TOML file, before validation.
///
/// ```toml
/// [config]
/// project_root = "."
/// score_file = "game-scores.json"
///
/// [step.lint]
/// cmd = "npx next lint --fix"
/// timeout_secs = 60
/// xp = 100
/// ```
///
/// All sections are optional; every step has built-in defaults, so an empty
/// (or absent) file yields the standard pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    /// Global settings from `[config]`.
    #[serde(default)]
    pub config: ConfigSection,

    /// Per-step overrides from `[step.<name>]`, keyed by step name.
    #[serde(default)]
    pub step: BTreeMap<String, StepOverride>,
}

/// `[config]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigSection {
    /// Project root the steps run in. When absent, the CLI locates one by
    /// walking up from the current directory looking for `package.json`.
    #[serde(default)]
    pub project_root: Option<String>,

    /// Score store path, relative to the project root.
    #[serde(default = "default_score_file")]
    pub score_file: String,
}

fn default_score_file() -> String {
    "game-scores.json".to_string()
}

impl Default for ConfigSection {
    fn default() -> Self {
        Self {
            project_root: None,
            score_file: default_score_file(),
        }
    }
}

/// `[step.<name>]` section. Every field is optional; unset fields fall back
/// to the built-in defaults for that step.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StepOverride {
    #[serde(default)]
    pub cmd: Option<String>,

    #[serde(default)]
    pub timeout_secs: Option<u64>,

    #[serde(default)]
    pub critical: Option<bool>,

    #[serde(default)]
    pub xp: Option<u64>,

    /// Skip this step when the named path exists under the project root
    /// (e.g. `node_modules` for the deps pre-flight). An empty string
    /// disables the default marker.
    #[serde(default)]
    pub skip_if_present: Option<String>,
}

/// Fully resolved configuration for one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepConfig {
    pub cmd: String,
    pub timeout_secs: u64,
    pub critical: bool,
    pub xp: u64,
    pub skip_if_present: Option<String>,
}

impl StepConfig {
    /// Built-in defaults per step, matching the stock Node toolchain
    /// pipeline the tool was written for.
    pub fn default_for(id: StepId) -> Self {
        match id {
            StepId::Deps => Self {
                cmd: "npm install".to_string(),
                timeout_secs: 300,
                critical: true,
                xp: 0,
                skip_if_present: Some("node_modules".to_string()),
            },
            StepId::Lint => Self {
                cmd: "npx next lint --fix".to_string(),
                timeout_secs: 60,
                critical: false,
                xp: 100,
                skip_if_present: None,
            },
            StepId::TypeCheck => Self {
                cmd: "npx tsc --noEmit".to_string(),
                timeout_secs: 30,
                critical: false,
                xp: 150,
                skip_if_present: None,
            },
            StepId::Build => Self {
                cmd: "npm run build".to_string(),
                timeout_secs: 120,
                critical: false,
                xp: 200,
                skip_if_present: None,
            },
        }
    }

    /// Apply a TOML override on top of the defaults.
    pub fn with_override(mut self, over: &StepOverride) -> Self {
        if let Some(ref cmd) = over.cmd {
            self.cmd = cmd.clone();
        }
        if let Some(timeout) = over.timeout_secs {
            self.timeout_secs = timeout;
        }
        if let Some(critical) = over.critical {
            self.critical = critical;
        }
        if let Some(xp) = over.xp {
            self.xp = xp;
        }
        if let Some(ref marker) = over.skip_if_present {
            self.skip_if_present = if marker.is_empty() {
                None
            } else {
                Some(marker.clone())
            };
        }
        self
    }

    /// Build the executable spec for this step.
    pub fn spec(&self, id: StepId) -> StepSpec {
        StepSpec {
            id,
            cmd: self.cmd.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            critical: self.critical,
            xp: self.xp,
        }
    }
}

/// Validated configuration. Constructed via `TryFrom<RawConfigFile>` (see
/// `validate.rs`); always holds a resolved entry for every step.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub config: ConfigSection,
    pub steps: BTreeMap<StepId, StepConfig>,
}

impl ConfigFile {
    /// Internal constructor used after validation.
    pub(crate) fn new_unchecked(
        config: ConfigSection,
        steps: BTreeMap<StepId, StepConfig>,
    ) -> Self {
        Self { config, steps }
    }

    /// The resolved config for a step. Every `StepId` is always present.
    pub fn step(&self, id: StepId) -> &StepConfig {
        &self.steps[&id]
    }

    pub fn spec(&self, id: StepId) -> StepSpec {
        self.step(id).spec(id)
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let steps = StepId::ALL
            .iter()
            .map(|&id| (id, StepConfig::default_for(id)))
            .collect();
        Self {
            config: ConfigSection::default(),
            steps,
        }
    }
}
