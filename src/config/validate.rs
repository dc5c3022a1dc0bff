// src/config/validate.rs

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::config::model::{ConfigFile, RawConfigFile, StepConfig};
use crate::errors::{QuestgateError, Result};
use crate::types::StepId;

impl TryFrom<RawConfigFile> for ConfigFile {
    type Error = QuestgateError;

    fn try_from(raw: RawConfigFile) -> std::result::Result<Self, Self::Error> {
        let steps = resolve_steps(&raw)?;
        validate_steps(&steps)?;
        Ok(ConfigFile::new_unchecked(raw.config, steps))
    }
}

/// Merge `[step.*]` overrides onto the built-in defaults.
///
/// Unknown step names are rejected rather than ignored so that a typo like
/// `[step.tpyecheck]` doesn't silently run with defaults.
fn resolve_steps(raw: &RawConfigFile) -> Result<BTreeMap<StepId, StepConfig>> {
    let mut steps: BTreeMap<StepId, StepConfig> = StepId::ALL
        .iter()
        .map(|&id| (id, StepConfig::default_for(id)))
        .collect();

    for (name, over) in raw.step.iter() {
        let id = StepId::from_str(name)
            .map_err(|e| QuestgateError::ConfigError(format!("[step.{name}]: {e}")))?;
        let resolved = steps[&id].clone().with_override(over);
        steps.insert(id, resolved);
    }

    Ok(steps)
}

fn validate_steps(steps: &BTreeMap<StepId, StepConfig>) -> Result<()> {
    for (id, step) in steps.iter() {
        if step.cmd.trim().is_empty() {
            return Err(QuestgateError::ConfigError(format!(
                "[step.{id}].cmd must not be empty"
            )));
        }
        if step.timeout_secs == 0 {
            return Err(QuestgateError::ConfigError(format!(
                "[step.{id}].timeout_secs must be >= 1 (got 0)"
            )));
        }
    }
    Ok(())
}
