use crate::gesture::{GestureEffect, GestureRecognizer, GestureState, PointerEvent, TimerToken};
use crate::ledger::OrderLedger;
use crate::models::{Quantity, RowKey};
use crate::storage::OrderStore;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Timer work the host must carry out for a row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TimerCommand {
    Arm {
        row: RowKey,
        token: TimerToken,
        after: Duration,
    },
    Cancel {
        row: RowKey,
        token: TimerToken,
    },
}

/// Visual state of one row between renders.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowFeedback {
    pub active: bool,
    pub shown_quantity: Option<Quantity>,
    pub clearing_until: Option<Instant>,
    pub haptic_pulses: u64,
}

impl RowFeedback {
    pub fn clearing(&self, now: Instant) -> bool {
        self.clearing_until.is_some_and(|until| now < until)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Dispatch {
    pub timers: Vec<TimerCommand>,
    pub render_requested: bool,
}

struct RowSlot {
    recognizer: GestureRecognizer,
    feedback: RowFeedback,
}

/// Recognizers for every row that has seen a pointer, created on first use.
#[derive(Default)]
pub struct GestureBoard {
    rows: HashMap<RowKey, RowSlot>,
    render_epoch: u64,
}

impl GestureBoard {
    pub fn dispatch<S: OrderStore>(
        &mut self,
        row: &RowKey,
        event: PointerEvent,
        ledger: &mut OrderLedger<S>,
        now: Instant,
    ) -> Dispatch {
        let slot = self.rows.entry(row.clone()).or_insert_with(|| RowSlot {
            recognizer: GestureRecognizer::new(row.clone()),
            feedback: RowFeedback::default(),
        });
        let effects = slot.recognizer.handle(event, ledger);
        self.apply(row, effects, now)
    }

    pub fn timer_elapsed<S: OrderStore>(
        &mut self,
        row: &RowKey,
        token: TimerToken,
        ledger: &mut OrderLedger<S>,
        now: Instant,
    ) -> Dispatch {
        let Some(slot) = self.rows.get_mut(row) else {
            return Dispatch::default();
        };
        let effects = slot.recognizer.timer_elapsed(token, ledger);
        self.apply(row, effects, now)
    }

    pub fn state(&self, row: &RowKey) -> GestureState {
        self.rows
            .get(row)
            .map(|slot| slot.recognizer.state())
            .unwrap_or(GestureState::Idle)
    }

    pub fn feedback(&self, row: &RowKey) -> RowFeedback {
        self.rows
            .get(row)
            .map(|slot| slot.feedback.clone())
            .unwrap_or_default()
    }

    pub fn render_epoch(&self) -> u64 {
        self.render_epoch
    }

    fn apply(&mut self, row: &RowKey, effects: Vec<GestureEffect>, now: Instant) -> Dispatch {
        let mut dispatch = Dispatch::default();
        let mut render = false;

        if let Some(slot) = self.rows.get_mut(row) {
            let feedback = &mut slot.feedback;
            for effect in effects {
                match effect {
                    GestureEffect::ArmTimer { token, after } => dispatch.timers.push(TimerCommand::Arm {
                        row: row.clone(),
                        token,
                        after,
                    }),
                    GestureEffect::CancelTimer(token) => dispatch.timers.push(TimerCommand::Cancel {
                        row: row.clone(),
                        token,
                    }),
                    GestureEffect::SetActive(active) => feedback.active = active,
                    GestureEffect::Haptic => feedback.haptic_pulses += 1,
                    GestureEffect::ShowQuantity(quantity) => feedback.shown_quantity = Some(quantity),
                    GestureEffect::FlashClearing(duration) => feedback.clearing_until = Some(now + duration),
                    GestureEffect::RequestRender => render = true,
                }
            }
        }

        if render {
            // a full render shows ledger values again
            self.render_epoch += 1;
            for slot in self.rows.values_mut() {
                slot.feedback.shown_quantity = None;
            }
            dispatch.render_requested = true;
        }
        dispatch
    }
}
