//! Rule engine - first matching rule wins
//!
//! Holds an ordered, immutable list of rules. Evaluation is a linear scan
//! with early exit, so rule order is part of the configuration: a text
//! matching several rules is reported under the first one only.

use crate::core::models::{Rule, Violation};

/// Ordered set of detection rules
#[derive(Debug, Clone)]
pub struct RuleEngine {
    rules: Vec<Rule>,
}

impl RuleEngine {
    /// Create an engine evaluating `rules` in the given order
    #[must_use]
    pub const fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// The reference rule set: `secret`, then `p@ssword`
    #[must_use]
    pub fn reference() -> Self {
        Self::new(vec![Rule::contains("secret", "secret"), Rule::contains("password", "p@ssword")])
    }

    /// Evaluate `text`, returning the violation of the first rule that fires
    #[must_use]
    pub fn evaluate(&self, text: &str) -> Option<Violation> {
        self.rules.iter().find_map(|rule| rule.check(text))
    }

    /// Rules in evaluation order
    #[must_use]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Number of rules
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the engine has no rules (and so never fires)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::reference()
    }
}
