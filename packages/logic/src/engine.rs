use crate::compare::condition_holds;
use crate::decisions::{Decisions, Visibility};
use crate::navigator::Navigator;
use blockform_model::{ActionKind, Form, LogicAction, LogicRule};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Collected answers keyed by block id
pub type Answers = HashMap<String, Value>;

/// Visibility of a block before any rule fires
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BaseVisibility {
    /// Every block is visible until a rule hides it
    #[default]
    Visible,
    /// Blocks targeted by any `show` action start hidden
    HiddenUntilShown,
}

#[derive(Debug, Clone, Default)]
pub struct EvaluationOptions {
    pub base_visibility: BaseVisibility,
}

/// Evaluate `form`'s rules with default options
pub fn evaluate(form: &Form, answers: &Answers) -> Decisions {
    LogicEngine::new(form).evaluate(answers)
}

/// Rule evaluator bound to one form
#[derive(Debug, Clone)]
pub struct LogicEngine<'a> {
    form: &'a Form,
    options: EvaluationOptions,
}

impl<'a> LogicEngine<'a> {
    pub fn new(form: &'a Form) -> Self {
        Self::with_options(form, EvaluationOptions::default())
    }

    pub fn with_options(form: &'a Form, options: EvaluationOptions) -> Self {
        Self { form, options }
    }

    /// Run every rule in array order against `answers`.
    ///
    /// Later rules overwrite what earlier rules decided for the same block.
    #[instrument(skip_all, fields(rules = self.form.logic.rules.len(), answers = answers.len()))]
    pub fn evaluate(&self, answers: &Answers) -> Decisions {
        let mut decisions = Decisions {
            hidden_by_default: self.hidden_by_default(),
            ..Default::default()
        };

        for (index, rule) in self.form.logic.rules.iter().enumerate() {
            if !self.rule_fires(rule, answers) {
                continue;
            }
            debug!(rule_id = %rule.id, index, "Rule fired");

            for action in &rule.actions {
                self.apply_action(action, &mut decisions);
            }
        }

        decisions
    }

    /// Conditions are ANDed; a rule without conditions always fires
    pub fn rule_fires(&self, rule: &LogicRule, answers: &Answers) -> bool {
        rule.conditions
            .iter()
            .all(|condition| condition_holds(condition, answers.get(&condition.field)))
    }

    /// Evaluate and return a navigator over the result
    pub fn navigate(&self, answers: &Answers) -> Navigator<'a> {
        Navigator::new(self.form, self.evaluate(answers))
    }

    fn apply_action(&self, action: &LogicAction, decisions: &mut Decisions) {
        if !self.form.contains_block(&action.target) {
            debug!(action_id = %action.id, target = %action.target, "Dropping action with missing target");
            return;
        }

        match &action.kind {
            ActionKind::Show => {
                decisions.entry(&action.target).visibility = Some(Visibility::Show);
            }
            ActionKind::Hide => {
                decisions.entry(&action.target).visibility = Some(Visibility::Hide);
            }
            ActionKind::Skip => {
                decisions.entry(&action.target).skip = true;
            }
            ActionKind::Jump => match action.value.as_deref() {
                Some(destination) if self.form.contains_block(destination) => {
                    decisions.entry(&action.target).jump_to = Some(destination.to_string());
                }
                destination => {
                    debug!(action_id = %action.id, ?destination, "Dropping jump with invalid destination");
                }
            },
            ActionKind::Unknown(kind) => {
                debug!(action_id = %action.id, %kind, "Ignoring unknown action kind");
            }
        }
    }

    fn hidden_by_default(&self) -> std::collections::BTreeSet<String> {
        match self.options.base_visibility {
            BaseVisibility::Visible => Default::default(),
            BaseVisibility::HiddenUntilShown => self
                .form
                .logic
                .rules
                .iter()
                .flat_map(|rule| rule.actions.iter())
                .filter(|action| action.kind == ActionKind::Show)
                .filter(|action| self.form.contains_block(&action.target))
                .map(|action| action.target.clone())
                .collect(),
        }
    }
}
