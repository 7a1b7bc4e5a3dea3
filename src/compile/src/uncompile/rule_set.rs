//! Uncompilation rule sets (§4.7): the rules recorded against one scene
//! path.

use parking_lot::Mutex;

use sc_repr::EditReason;

use super::target::UncompilationTarget;

/// One rule: "if a change at this path intersects `reasons`, tear down
/// `target`".
#[derive(Clone)]
pub struct UncompilationRule {
    pub target: UncompilationTarget,
    pub reasons: EditReason,
}

/// A concurrently-appendable, path-keyed multiset of rules (§4.7).
///
/// Compilation tasks append rules as they read the scene; the uncompiler
/// drains and applies them, single-threaded, when a change notification
/// arrives for this path. Appenders never block on the uncompiler and vice
/// versa, because the two never run concurrently for the same path (the
/// caller serializes scene-change processing).
#[derive(Default)]
pub struct UncompilationRuleSet {
    rules: Mutex<Vec<UncompilationRule>>,
}

impl UncompilationRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule.
    pub fn push(&self, rule: UncompilationRule) {
        self.rules.lock().push(rule);
    }

    /// Returns `true` if no rules are recorded.
    pub fn is_empty(&self) -> bool {
        self.rules.lock().is_empty()
    }

    /// Removes and returns every rule whose `reasons` intersects `reason`,
    /// leaving the rest in place.
    pub fn take_matching(&self, reason: EditReason) -> Vec<UncompilationRule> {
        let mut rules = self.rules.lock();
        let mut matched = Vec::new();
        rules.retain(|rule| {
            if rule.reasons.intersects_reason(reason) {
                matched.push(rule.clone());
                false
            } else {
                true
            }
        });
        matched
    }

    /// Removes and returns every rule, regardless of reason (used when a
    /// path's whole subtree is being torn down recursively).
    pub fn take_all(&self) -> Vec<UncompilationRule> {
        std::mem::take(&mut *self.rules.lock())
    }
}
