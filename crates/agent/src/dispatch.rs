use std::collections::BTreeSet;

use sierra_core::config::DispatchConfig;

use crate::intent::Intent;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PassThroughReason {
    NoFragments,
    GeneralIntent,
}

impl PassThroughReason {
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::NoFragments => "no_fragments",
            Self::GeneralIntent => "general_intent",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DispatchDecision {
    /// Fold handler output into the persona prompt.
    Augment { fragments: Vec<String> },
    /// Send the raw user message; any fragments are discarded.
    PassThrough { reason: PassThroughReason },
}

/// Decides what reaches persona chat once the handlers have run.
///
/// With `general_suppresses_fragments` set (the default), a `general` label
/// wins over every other intent even when handlers produced output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DispatchPolicy {
    pub general_suppresses_fragments: bool,
}

impl Default for DispatchPolicy {
    fn default() -> Self {
        Self { general_suppresses_fragments: true }
    }
}

impl From<&DispatchConfig> for DispatchPolicy {
    fn from(config: &DispatchConfig) -> Self {
        Self { general_suppresses_fragments: config.general_suppresses_fragments }
    }
}

impl DispatchPolicy {
    pub fn decide(&self, intents: &BTreeSet<Intent>, fragments: Vec<String>) -> DispatchDecision {
        if fragments.is_empty() {
            return DispatchDecision::PassThrough { reason: PassThroughReason::NoFragments };
        }
        if self.general_suppresses_fragments && intents.contains(&Intent::General) {
            return DispatchDecision::PassThrough { reason: PassThroughReason::GeneralIntent };
        }
        DispatchDecision::Augment { fragments }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::{DispatchDecision, DispatchPolicy, PassThroughReason};
    use crate::intent::Intent;

    #[test]
    fn fragments_without_general_are_folded_in() {
        let decision = DispatchPolicy::default()
            .decide(&BTreeSet::from([Intent::Order]), vec!["Order #1 is shipped.".to_string()]);

        assert_eq!(
            decision,
            DispatchDecision::Augment { fragments: vec!["Order #1 is shipped.".to_string()] }
        );
    }

    #[test]
    fn general_discards_fragments_by_default() {
        let decision = DispatchPolicy::default().decide(
            &BTreeSet::from([Intent::Order, Intent::General]),
            vec!["Order #1 is shipped.".to_string()],
        );

        assert_eq!(decision, DispatchDecision::PassThrough { reason: PassThroughReason::GeneralIntent });
    }

    #[test]
    fn general_keeps_fragments_when_policy_disabled() {
        let policy = DispatchPolicy { general_suppresses_fragments: false };
        let decision = policy.decide(
            &BTreeSet::from([Intent::Order, Intent::General]),
            vec!["Order #1 is shipped.".to_string()],
        );

        assert!(matches!(decision, DispatchDecision::Augment { .. }));
    }

    #[test]
    fn empty_fragments_pass_through() {
        let decision = DispatchPolicy::default().decide(&BTreeSet::new(), Vec::new());

        assert_eq!(decision, DispatchDecision::PassThrough { reason: PassThroughReason::NoFragments });
        assert_eq!(PassThroughReason::NoFragments.reason_code(), "no_fragments");
    }
}
