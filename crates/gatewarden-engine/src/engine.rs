//! The access decision engine.

use gatewarden_barrier::BarrierController;
use gatewarden_ledger::EventLedger;
use gatewarden_registry::SensorRegistry;
use gatewarden_types::{
    AccessOutcome, ActingUser, Barrier, BarrierId, BarrierPosition, Capability, CoreError,
    CoreResult, Decision, DenyReason, EventDraft, EventKind, EventSource, Sensor,
};
use tracing::{debug, info, warn};

/// Orchestrates a presentation from lookup through policy to actuation
/// and audit. Every decision path appends its audit record before the
/// decision is returned; a `Decision` in hand means the ledger already
/// has the event.
///
/// Cheap to clone; clones share the underlying stores.
#[derive(Clone)]
pub struct AccessEngine {
    sensors: SensorRegistry,
    barriers: BarrierController,
    ledger: EventLedger,
}

/// Outcome of screening a presented uid against the registry.
enum Screening {
    /// Sensor resolved and its status admits.
    Admit(Sensor),
    /// Refused; the denial event is already written.
    Refuse(Box<Decision>),
}

impl AccessEngine {
    /// Create an engine over the three stores.
    pub fn new(
        sensors: SensorRegistry,
        barriers: BarrierController,
        ledger: EventLedger,
    ) -> Self {
        Self {
            sensors,
            barriers,
            ledger,
        }
    }

    /// The sensor registry this engine reads.
    pub fn sensors(&self) -> &SensorRegistry {
        &self.sensors
    }

    /// The barrier controller this engine commands.
    pub fn barriers(&self) -> &BarrierController {
        &self.barriers
    }

    /// The ledger this engine writes.
    pub fn ledger(&self) -> &EventLedger {
        &self.ledger
    }

    /// Evaluate a presentation: resolve the sensor, apply policy, open the
    /// target barrier on admission, and record exactly one audit event.
    ///
    /// Barrier binding is best-effort; an unresolvable target never fails
    /// the admission. Store failures are fatal and propagate as errors
    /// rather than denials.
    pub async fn evaluate_presentation(
        &self,
        uid: &str,
        target_barrier: Option<BarrierId>,
    ) -> CoreResult<Decision> {
        let sensor = match self.screen(uid).await? {
            Screening::Admit(sensor) => sensor,
            Screening::Refuse(decision) => return Ok(*decision),
        };

        let barrier = match target_barrier {
            Some(id) => self.open_barrier_best_effort(id).await?,
            None => None,
        };

        let mut draft = EventDraft::new(EventKind::AccessGranted, EventSource::sensor(sensor.id))
            .message(match &barrier {
                Some(b) => format!("access granted to '{}', barrier '{}' opened", sensor.name, b.name),
                None => format!("access granted to '{}'", sensor.name),
            });
        if let Some(b) = &barrier {
            draft = draft.barrier(b.id);
        }
        let event = self.ledger.append(draft).await?;

        info!(sensor = %sensor.id, uid = %sensor.uid, "access granted");
        Ok(Decision {
            outcome: AccessOutcome::Granted,
            sensor: Some(sensor),
            barrier,
            event_id: event.id,
            timestamp: event.timestamp,
        })
    }

    /// Barrier-less admission that records the full sequence as two
    /// immutable events: one `AccessAttempted` when the presentation is
    /// screened, then one `AccessGranted`. Denial paths behave exactly
    /// like [`AccessEngine::evaluate_presentation`].
    pub async fn request_access(&self, uid: &str) -> CoreResult<Decision> {
        let sensor = match self.screen(uid).await? {
            Screening::Admit(sensor) => sensor,
            Screening::Refuse(decision) => return Ok(*decision),
        };

        self.ledger
            .append(
                EventDraft::new(EventKind::AccessAttempted, EventSource::sensor(sensor.id))
                    .message(format!("access attempt with sensor '{}'", sensor.uid)),
            )
            .await?;
        let event = self
            .ledger
            .append(
                EventDraft::new(EventKind::AccessGranted, EventSource::sensor(sensor.id))
                    .message(format!("access granted to '{}'", sensor.name)),
            )
            .await?;

        info!(sensor = %sensor.id, uid = %sensor.uid, "access granted");
        Ok(Decision {
            outcome: AccessOutcome::Granted,
            sensor: Some(sensor),
            barrier: None,
            event_id: event.id,
            timestamp: event.timestamp,
        })
    }

    /// Administrative barrier override: no sensor evaluation, explicit
    /// capability check against the resolved caller identity. Appends a
    /// manual-action event referencing the barrier and the acting user.
    pub async fn record_manual_barrier_action(
        &self,
        barrier_id: BarrierId,
        position: BarrierPosition,
        acting: Option<ActingUser>,
    ) -> CoreResult<Decision> {
        if let Some(user) = &acting {
            if !user.can(Capability::OperateBarrier) {
                return Err(CoreError::forbidden(format!(
                    "role '{}' may not operate barriers",
                    user.role
                )));
            }
        }

        let barrier = self.barriers.set_position(barrier_id, position).await?;

        let kind = match position {
            BarrierPosition::Open => EventKind::BarrierOpenedManual,
            BarrierPosition::Closed => EventKind::BarrierClosedManual,
        };
        let mut draft = EventDraft::new(kind, EventSource::Operator)
            .barrier(barrier.id)
            .message(format!("barrier '{}' set {} manually", barrier.name, position));
        if let Some(user) = &acting {
            draft = draft.acting_user(user.user_id);
        }
        let event = self.ledger.append(draft).await?;

        info!(barrier = %barrier.id, %position, "manual barrier action recorded");
        Ok(Decision {
            outcome: AccessOutcome::Granted,
            sensor: None,
            barrier: Some(barrier),
            event_id: event.id,
            timestamp: event.timestamp,
        })
    }

    /// Resolve the sensor and apply the status policy. Refusals write
    /// their `AccessDenied` event here so every exit carries an audit
    /// record.
    async fn screen(&self, uid: &str) -> CoreResult<Screening> {
        let sensor = match self.sensors.lookup(uid).await {
            Ok(sensor) => sensor,
            Err(CoreError::NotFound { .. }) => {
                let event = self
                    .ledger
                    .append(
                        EventDraft::new(EventKind::AccessDenied, EventSource::unidentified(uid))
                            .message(format!("access attempt with unknown sensor '{uid}'")),
                    )
                    .await?;
                warn!(%uid, "access denied: unregistered sensor");
                return Ok(Screening::Refuse(Box::new(Decision {
                    outcome: AccessOutcome::Denied {
                        reason: DenyReason::Unregistered {
                            presented_uid: uid.to_string(),
                        },
                    },
                    sensor: None,
                    barrier: None,
                    event_id: event.id,
                    timestamp: event.timestamp,
                })));
            }
            Err(other) => return Err(other),
        };

        if let Some(reason) = DenyReason::for_status(sensor.status) {
            let event = self
                .ledger
                .append(
                    EventDraft::new(EventKind::AccessDenied, EventSource::sensor(sensor.id))
                        .message(format!("access denied for '{}': {reason}", sensor.name)),
                )
                .await?;
            warn!(sensor = %sensor.id, status = %sensor.status, "access denied");
            return Ok(Screening::Refuse(Box::new(Decision {
                outcome: AccessOutcome::Denied { reason },
                sensor: Some(sensor),
                barrier: None,
                event_id: event.id,
                timestamp: event.timestamp,
            })));
        }

        Ok(Screening::Admit(sensor))
    }

    /// Open the admission target. A missing barrier is logged and skipped;
    /// only store-level failures abort the admission.
    async fn open_barrier_best_effort(&self, id: BarrierId) -> CoreResult<Option<Barrier>> {
        match self.barriers.set_position(id, BarrierPosition::Open).await {
            Ok(barrier) => Ok(Some(barrier)),
            Err(CoreError::NotFound { .. }) => {
                debug!(barrier = %id, "target barrier not found, admitting without actuation");
                Ok(None)
            }
            Err(other) => Err(other),
        }
    }
}
