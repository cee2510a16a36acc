//! Rule table and max-min rule evaluation

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::variable::{Activations, Degrees, InputTerm, OutputTerm, Term};
use crate::error::{ErrorCode, FisError, FisResult};

/// IF input1 IS `input1` AND input2 IS `input2` THEN output IS `output`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Rule {
    pub input1: InputTerm,
    pub input2: InputTerm,
    pub output: OutputTerm,
}

impl Rule {
    pub const fn new(input1: InputTerm, input2: InputTerm, output: OutputTerm) -> Self {
        Self {
            input1,
            input2,
            output,
        }
    }

    /// Firing strength: AND of both antecedents (minimum)
    pub fn strength(&self, input1: &Degrees<InputTerm>, input2: &Degrees<InputTerm>) -> f64 {
        let d1 = input1.get(&self.input1).copied().unwrap_or(0.0);
        let d2 = input2.get(&self.input2).copied().unwrap_or(0.0);
        d1.min(d2)
    }
}

/// A complete rule table: exactly one rule per antecedent pair
#[derive(Debug, Clone, PartialEq)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Build a table, rejecting duplicate or missing antecedent pairs
    pub fn new(rules: Vec<Rule>) -> FisResult<Self> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if !seen.insert((rule.input1, rule.input2)) {
                return Err(FisError::validation(format!(
                    "more than one rule for ({}, {})",
                    rule.input1, rule.input2
                ))
                .with_code(ErrorCode::DuplicateRule)
                .with_context("input1", rule.input1.name())
                .with_context("input2", rule.input2.name()));
            }
        }

        let missing: Vec<String> = InputTerm::ALL
            .iter()
            .flat_map(|&i1| InputTerm::ALL.iter().map(move |&i2| (i1, i2)))
            .filter(|pair| !seen.contains(pair))
            .map(|(i1, i2)| format!("({}, {})", i1, i2))
            .collect();

        if !missing.is_empty() {
            return Err(FisError::validation(format!(
                "no rule for antecedent pair(s) {}",
                missing.join(", ")
            ))
            .with_code(ErrorCode::IncompleteRuleTable)
            .with_hint("every (input1, input2) term pair needs exactly one rule"));
        }

        Ok(Self { rules })
    }

    /// Reference table: the consequent grows one step per input step
    pub fn reference() -> Self {
        use InputTerm::{Large, Medium as Mid, Small};
        use OutputTerm::{Long, Medium, Short, VeryLong, VeryShort};

        Self {
            rules: vec![
                Rule::new(Small, Small, VeryShort),
                Rule::new(Small, Mid, Short),
                Rule::new(Small, Large, Medium),
                Rule::new(Mid, Small, Short),
                Rule::new(Mid, Mid, Medium),
                Rule::new(Mid, Large, Long),
                Rule::new(Large, Small, Medium),
                Rule::new(Large, Mid, Long),
                Rule::new(Large, Large, VeryLong),
            ],
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Consequent for an antecedent pair
    pub fn consequent(&self, input1: InputTerm, input2: InputTerm) -> Option<OutputTerm> {
        self.rules
            .iter()
            .find(|r| r.input1 == input1 && r.input2 == input2)
            .map(|r| r.output)
    }

    /// Max-min inference: one activation per output term, each the strongest
    /// firing among the rules that conclude it.
    pub fn evaluate(
        &self,
        input1: &Degrees<InputTerm>,
        input2: &Degrees<InputTerm>,
    ) -> Activations {
        let mut activations: Activations = OutputTerm::ALL.iter().map(|&t| (t, 0.0)).collect();

        for rule in &self.rules {
            let strength = rule.strength(input1, input2);
            if let Some(current) = activations.get_mut(&rule.output) {
                if strength > *current {
                    *current = strength;
                }
            }
        }

        activations
    }
}
