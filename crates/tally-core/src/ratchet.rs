//! The ratchet rule — the single place where accept/reject is decided.
//!
//! Both store backends evaluate observations through [`evaluate`] so the
//! semantics cannot drift between them. The rule: a fresh pair accepts any
//! value unconditionally (sign-agnostic, and zero is a real value, not a
//! sentinel for "unset"); an existing pair accepts only strictly greater
//! values.

/// The decision for one observation against the current state of a pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatchetDecision {
  /// Apply the observation. `previous` is `None` for a fresh pair.
  Accept { previous: Option<i64>, delta: i64 },
  /// Leave the pair untouched; `current` is the unchanged value.
  Reject { current: i64 },
}

/// Evaluate an observed value against the current value of a pair, if any.
///
/// The delta saturates at `i64::MAX` when the gap between the stored value
/// and the observation is not representable (a deeply negative first
/// observation followed by a large one); the accepted value itself is exact.
pub fn evaluate(current: Option<i64>, observed: i64) -> RatchetDecision {
  match current {
    None => RatchetDecision::Accept { previous: None, delta: observed },
    Some(cur) if observed > cur => RatchetDecision::Accept {
      previous: Some(cur),
      delta:    observed.saturating_sub(cur),
    },
    Some(cur) => RatchetDecision::Reject { current: cur },
  }
}
