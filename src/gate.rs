use crate::notify::{
    Localizer,
    NotificationCategory,
    NotificationSink,
};
use tracing::debug;

/// Interaction state of a [`SubmitGate`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GateState {
    /// Condition holds; a click submits.
    Ready,
    /// Condition does not hold; a click explains why instead of submitting.
    Blocked,
    /// Interaction is switched off entirely; clicks are swallowed.
    Disabled,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ClickOutcome {
    pub state: GateState,
    pub submitted: bool,
}

/// Guards a user-triggered submission behind a readiness condition, mirroring
/// the chain state held in the cache (enough gold, action points, etc.).
///
/// The condition is sampled on [`refresh`](Self::refresh) and on every click,
/// so a gate is never stuck on a stale readiness answer.
pub struct SubmitGate<N, L> {
    condition: Option<Box<dyn Fn() -> bool + Send>>,
    interactable: bool,
    condition_info_key: String,
    notifications: N,
    localizer: L,
}

impl<N, L> SubmitGate<N, L>
where
    N: NotificationSink,
    L: Localizer,
{
    pub fn new(condition_info_key: impl Into<String>, notifications: N, localizer: L) -> Self {
        Self {
            condition: None,
            interactable: true,
            condition_info_key: condition_info_key.into(),
            notifications,
            localizer,
        }
    }

    pub fn set_condition(&mut self, condition: impl Fn() -> bool + Send + 'static) {
        self.condition = Some(Box::new(condition));
    }

    pub fn set_interactable(&mut self, interactable: bool) {
        self.interactable = interactable;
    }

    pub fn interactable(&self) -> bool {
        self.interactable
    }

    /// Re-evaluate the condition and report the resulting state. A gate with
    /// no condition set is treated as unconditionally ready.
    pub fn refresh(&self) -> GateState {
        if !self.interactable {
            return GateState::Disabled;
        }
        match &self.condition {
            Some(condition) if !condition() => GateState::Blocked,
            _ => GateState::Ready,
        }
    }

    /// Route a click through the current state. Only a `Ready` gate submits;
    /// a `Blocked` gate pushes the localized condition explanation instead.
    pub fn click(&self) -> ClickOutcome {
        let state = self.refresh();
        match state {
            GateState::Ready => ClickOutcome {
                state,
                submitted: true,
            },
            GateState::Blocked => {
                let message = self.localizer.localize(&self.condition_info_key, &[]);
                self.notifications.push(NotificationCategory::System, message);
                ClickOutcome {
                    state,
                    submitted: false,
                }
            }
            GateState::Disabled => {
                debug!("click on disabled gate ignored");
                ClickOutcome {
                    state,
                    submitted: false,
                }
            }
        }
    }
}
