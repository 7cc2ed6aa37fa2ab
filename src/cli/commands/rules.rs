//! List active rules

use leakscan::config::Config;
use leakscan::output::{OutputMode, RuleListResult};

/// Print the configured rules in evaluation order
pub fn rules(config: &Config, mode: OutputMode) -> anyhow::Result<()> {
    let engine = config.rule_engine()?;
    RuleListResult::from(&engine).render(mode);
    Ok(())
}
