//! Tap versus long-press recognition for one order row.
//!
//! A press arms a single timer. Releasing before it fires is a tap and adds
//! one to the row's product; letting it fire clears the product to zero. The
//! recognizer never sleeps or spawns anything itself: it returns
//! [`GestureEffect`]s and the host arms, cancels and delivers timers.

use crate::ledger::OrderLedger;
use crate::models::{Quantity, RowKey};
use crate::storage::OrderStore;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const LONG_PRESS_THRESHOLD: Duration = Duration::from_millis(500);
pub const CLEARING_FLASH: Duration = Duration::from_millis(300);
pub const PRIMARY_BUTTON: i16 = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerKind {
    Mouse,
    Touch,
    Pen,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEvent {
    Down { kind: PointerKind, button: i16 },
    Up,
    Cancel,
    Leave,
    ContextMenu,
}

/// Identifies one armed timer so a late delivery can be told apart from the
/// current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerToken(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureState {
    Idle,
    Pressed(TimerToken),
    LongPressFired,
}

impl GestureState {
    pub fn label(&self) -> &'static str {
        match self {
            GestureState::Idle => "idle",
            GestureState::Pressed(_) => "pressed",
            GestureState::LongPressFired => "long_press_fired",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureEffect {
    ArmTimer { token: TimerToken, after: Duration },
    CancelTimer(TimerToken),
    SetActive(bool),
    Haptic,
    /// Patch the row's displayed quantity in place, without a re-render.
    ShowQuantity(Quantity),
    /// Raise the "clearing" flag for the given time.
    FlashClearing(Duration),
    RequestRender,
}

pub struct GestureRecognizer {
    row: RowKey,
    state: GestureState,
    issued: u64,
}

impl GestureRecognizer {
    pub fn new(row: RowKey) -> Self {
        Self {
            row,
            state: GestureState::Idle,
            issued: 0,
        }
    }

    pub fn row(&self) -> &RowKey {
        &self.row
    }

    pub fn state(&self) -> GestureState {
        self.state
    }

    pub fn handle<S: OrderStore>(
        &mut self,
        event: PointerEvent,
        ledger: &mut OrderLedger<S>,
    ) -> Vec<GestureEffect> {
        match event {
            PointerEvent::Down { kind, button } => self.press(kind, button),
            PointerEvent::Up => self.release(ledger),
            PointerEvent::Cancel | PointerEvent::Leave => self.abort(),
            PointerEvent::ContextMenu => Vec::new(),
        }
    }

    /// Delivers an expired timer. Tokens other than the one armed by the
    /// current press are ignored.
    pub fn timer_elapsed<S: OrderStore>(
        &mut self,
        token: TimerToken,
        ledger: &mut OrderLedger<S>,
    ) -> Vec<GestureEffect> {
        if self.state != GestureState::Pressed(token) {
            debug!(product = %self.row.product, ?token, "ignoring stale long-press timer");
            return Vec::new();
        }

        self.state = GestureState::LongPressFired;
        let RowKey {
            date,
            cafeteria,
            product,
        } = &self.row;
        ledger.reset_product(date, cafeteria, product);
        debug!(product = %product, "long press cleared product");

        vec![
            GestureEffect::Haptic,
            GestureEffect::ShowQuantity(0),
            GestureEffect::FlashClearing(CLEARING_FLASH),
        ]
    }

    fn press(&mut self, kind: PointerKind, button: i16) -> Vec<GestureEffect> {
        if kind == PointerKind::Mouse && button != PRIMARY_BUTTON {
            return Vec::new();
        }
        if self.state != GestureState::Idle {
            return Vec::new();
        }

        self.issued += 1;
        let token = TimerToken(self.issued);
        self.state = GestureState::Pressed(token);

        vec![
            GestureEffect::SetActive(true),
            GestureEffect::ArmTimer {
                token,
                after: LONG_PRESS_THRESHOLD,
            },
        ]
    }

    fn release<S: OrderStore>(&mut self, ledger: &mut OrderLedger<S>) -> Vec<GestureEffect> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => Vec::new(),
            GestureState::Pressed(token) => {
                let RowKey {
                    date,
                    cafeteria,
                    product,
                } = &self.row;
                ledger.apply_delta(date, cafeteria, product, 1);
                vec![GestureEffect::CancelTimer(token), GestureEffect::SetActive(false)]
            }
            GestureState::LongPressFired => {
                vec![GestureEffect::SetActive(false), GestureEffect::RequestRender]
            }
        }
    }

    fn abort(&mut self) -> Vec<GestureEffect> {
        match std::mem::replace(&mut self.state, GestureState::Idle) {
            GestureState::Idle => Vec::new(),
            GestureState::Pressed(token) => {
                vec![GestureEffect::CancelTimer(token), GestureEffect::SetActive(false)]
            }
            GestureState::LongPressFired => {
                vec![GestureEffect::SetActive(false), GestureEffect::RequestRender]
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const DATE: &str = "2024-01-01";

    fn setup() -> (GestureRecognizer, OrderLedger<MemoryStore>, MemoryStore) {
        let store = MemoryStore::default();
        let ledger = OrderLedger::open(store.clone());
        let recognizer = GestureRecognizer::new(RowKey::new(DATE, "Breck", "Croissant"));
        (recognizer, ledger, store)
    }

    fn touch() -> PointerEvent {
        PointerEvent::Down {
            kind: PointerKind::Touch,
            button: PRIMARY_BUTTON,
        }
    }

    fn armed_token(effects: &[GestureEffect]) -> TimerToken {
        effects
            .iter()
            .find_map(|effect| match effect {
                GestureEffect::ArmTimer { token, .. } => Some(*token),
                _ => None,
            })
            .expect("press should arm a timer")
    }

    #[test]
    fn press_arms_one_long_press_timer() {
        let (mut recognizer, mut ledger, _) = setup();
        let effects = recognizer.handle(touch(), &mut ledger);

        let token = armed_token(&effects);
        assert_eq!(
            effects,
            vec![
                GestureEffect::SetActive(true),
                GestureEffect::ArmTimer {
                    token,
                    after: LONG_PRESS_THRESHOLD
                },
            ]
        );
        assert_eq!(recognizer.state(), GestureState::Pressed(token));
    }

    #[test]
    fn quick_release_is_one_increment() {
        let (mut recognizer, mut ledger, store) = setup();
        let token = armed_token(&recognizer.handle(touch(), &mut ledger));

        let effects = recognizer.handle(PointerEvent::Up, &mut ledger);

        assert_eq!(
            effects,
            vec![GestureEffect::CancelTimer(token), GestureEffect::SetActive(false)]
        );
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 1);
        assert_eq!(store.saves(), 1);
        assert_eq!(recognizer.state(), GestureState::Idle);
    }

    #[test]
    fn held_press_resets_once_then_release_requests_render() {
        let (mut recognizer, mut ledger, store) = setup();
        ledger.apply_delta(DATE, "Breck", "Croissant", 3);

        let token = armed_token(&recognizer.handle(touch(), &mut ledger));
        let fired = recognizer.timer_elapsed(token, &mut ledger);
        assert_eq!(
            fired,
            vec![
                GestureEffect::Haptic,
                GestureEffect::ShowQuantity(0),
                GestureEffect::FlashClearing(CLEARING_FLASH),
            ]
        );
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 0);
        assert_eq!(recognizer.state(), GestureState::LongPressFired);

        let released = recognizer.handle(PointerEvent::Up, &mut ledger);
        assert_eq!(
            released,
            vec![GestureEffect::SetActive(false), GestureEffect::RequestRender]
        );
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 0);
        assert_eq!(store.saves(), 2);
    }

    #[test]
    fn cancel_before_threshold_touches_nothing() {
        let (mut recognizer, mut ledger, store) = setup();
        let token = armed_token(&recognizer.handle(touch(), &mut ledger));

        let effects = recognizer.handle(PointerEvent::Cancel, &mut ledger);
        assert_eq!(
            effects,
            vec![GestureEffect::CancelTimer(token), GestureEffect::SetActive(false)]
        );

        // leaving the row after the cancel, or a late timer, changes nothing
        assert!(recognizer.handle(PointerEvent::Leave, &mut ledger).is_empty());
        assert!(recognizer.timer_elapsed(token, &mut ledger).is_empty());
        assert!(recognizer.handle(PointerEvent::Up, &mut ledger).is_empty());
        assert_eq!(store.saves(), 0);
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 0);
    }

    #[test]
    fn leave_after_fire_cannot_undo_reset() {
        let (mut recognizer, mut ledger, _) = setup();
        ledger.apply_delta(DATE, "Breck", "Croissant", 2);
        let token = armed_token(&recognizer.handle(touch(), &mut ledger));
        recognizer.timer_elapsed(token, &mut ledger);

        let effects = recognizer.handle(PointerEvent::Leave, &mut ledger);
        assert_eq!(
            effects,
            vec![GestureEffect::SetActive(false), GestureEffect::RequestRender]
        );
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 0);
        assert!(recognizer.handle(PointerEvent::Up, &mut ledger).is_empty());
    }

    #[test]
    fn secondary_mouse_button_is_not_a_gesture() {
        let (mut recognizer, mut ledger, store) = setup();
        let right = PointerEvent::Down {
            kind: PointerKind::Mouse,
            button: 2,
        };

        assert!(recognizer.handle(right, &mut ledger).is_empty());
        assert!(recognizer.handle(PointerEvent::ContextMenu, &mut ledger).is_empty());
        assert!(recognizer.handle(PointerEvent::Up, &mut ledger).is_empty());
        assert_eq!(store.saves(), 0);
    }

    #[test]
    fn pen_with_any_button_counts() {
        let (mut recognizer, mut ledger, _) = setup();
        let pen = PointerEvent::Down {
            kind: PointerKind::Pen,
            button: 5,
        };
        assert!(!recognizer.handle(pen, &mut ledger).is_empty());
        recognizer.handle(PointerEvent::Up, &mut ledger);
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 1);
    }

    #[test]
    fn second_press_while_pressed_is_ignored() {
        let (mut recognizer, mut ledger, _) = setup();
        let first = armed_token(&recognizer.handle(touch(), &mut ledger));

        assert!(recognizer.handle(touch(), &mut ledger).is_empty());
        assert_eq!(recognizer.state(), GestureState::Pressed(first));

        recognizer.handle(PointerEvent::Up, &mut ledger);
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 1);
    }

    #[test]
    fn timer_from_earlier_press_is_stale() {
        let (mut recognizer, mut ledger, _) = setup();
        let old = armed_token(&recognizer.handle(touch(), &mut ledger));
        recognizer.handle(PointerEvent::Up, &mut ledger);
        let current = armed_token(&recognizer.handle(touch(), &mut ledger));
        assert_ne!(old, current);

        assert!(recognizer.timer_elapsed(old, &mut ledger).is_empty());
        assert_eq!(recognizer.state(), GestureState::Pressed(current));
        assert_eq!(ledger.quantity(DATE, "Breck", "Croissant"), 1);
    }

    #[test]
    fn each_gesture_mutates_exactly_once() {
        let (mut recognizer, mut ledger, store) = setup();
        for round in 0..4 {
            let token = armed_token(&recognizer.handle(touch(), &mut ledger));
            if round % 2 == 1 {
                recognizer.timer_elapsed(token, &mut ledger);
                // a second delivery of the same timer must not reset twice
                assert!(recognizer.timer_elapsed(token, &mut ledger).is_empty());
            }
            recognizer.handle(PointerEvent::Up, &mut ledger);
            assert_eq!(store.saves(), round + 1);
        }
    }
}
