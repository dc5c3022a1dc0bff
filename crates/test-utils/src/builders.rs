#![allow(dead_code)]

use std::collections::BTreeMap;
use std::time::Duration;

use questgate::config::{ConfigFile, ConfigSection, StepConfig};
use questgate::types::{StepId, StepSpec};

/// Builder for `ConfigFile` to simplify test setup.
///
/// Starts from the built-in defaults for every step and lets tests override
/// individual steps.
pub struct ConfigFileBuilder {
    config: ConfigSection,
    steps: BTreeMap<StepId, StepConfig>,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        let cfg = ConfigFile::default();
        Self {
            config: cfg.config.clone(),
            steps: cfg.steps,
        }
    }

    pub fn with_step(mut self, id: StepId, step: StepConfig) -> Self {
        self.steps.insert(id, step);
        self
    }

    pub fn with_score_file(mut self, path: &str) -> Self {
        self.config.score_file = path.to_string();
        self
    }

    pub fn with_project_root(mut self, path: &str) -> Self {
        self.config.project_root = Some(path.to_string());
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile {
            config: self.config,
            steps: self.steps,
        }
    }

    /// Resolved spec map as `CoreRuntime::new` expects it.
    pub fn build_specs(self) -> BTreeMap<StepId, StepSpec> {
        let cfg = self.build();
        StepId::ALL.iter().map(|&id| (id, cfg.spec(id))).collect()
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for `StepConfig`.
pub struct StepConfigBuilder {
    step: StepConfig,
}

impl StepConfigBuilder {
    pub fn new(cmd: &str) -> Self {
        Self {
            step: StepConfig {
                cmd: cmd.to_string(),
                timeout_secs: 60,
                critical: false,
                xp: 0,
                skip_if_present: None,
            },
        }
    }

    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.step.timeout_secs = secs;
        self
    }

    pub fn critical(mut self, val: bool) -> Self {
        self.step.critical = val;
        self
    }

    pub fn xp(mut self, xp: u64) -> Self {
        self.step.xp = xp;
        self
    }

    pub fn skip_if_present(mut self, marker: &str) -> Self {
        self.step.skip_if_present = Some(marker.to_string());
        self
    }

    pub fn build(self) -> StepConfig {
        self.step
    }

    pub fn build_spec(self, id: StepId) -> StepSpec {
        let step = self.build();
        StepSpec {
            id,
            cmd: step.cmd,
            timeout: Duration::from_secs(step.timeout_secs),
            critical: step.critical,
            xp: step.xp,
        }
    }
}
