//! Sensor registry operations.

use crate::SensorStore;
use chrono::Utc;
use gatewarden_types::{
    CoreError, CoreResult, NewSensor, Sensor, SensorId, SensorStatus, MIN_NAME_LEN, MIN_UID_LEN,
};
use std::sync::Arc;
use tracing::{debug, info};

/// Owner of sensor identity records. Cheap to clone; all clones share the
/// underlying store.
#[derive(Clone)]
pub struct SensorRegistry {
    store: Arc<dyn SensorStore>,
}

impl SensorRegistry {
    /// Create a registry over the given store.
    pub fn new(store: Arc<dyn SensorStore>) -> Self {
        Self { store }
    }

    /// Register a new sensor. Fails validation on a short uid or name, or
    /// on a uid that is already registered.
    pub async fn create(&self, new: NewSensor) -> CoreResult<Sensor> {
        validate_uid(&new.uid)?;
        if new.name.chars().count() < MIN_NAME_LEN {
            return Err(CoreError::validation(format!(
                "name must be at least {MIN_NAME_LEN} characters"
            )));
        }
        if self.store.find_by_uid(&new.uid).await?.is_some() {
            return Err(CoreError::validation(format!(
                "uid '{}' is already registered",
                new.uid
            )));
        }

        let now = Utc::now();
        let sensor = Sensor {
            id: SensorId::new(),
            uid: new.uid,
            name: new.name,
            status: SensorStatus::default(),
            user: new.user,
            zone: new.zone,
            created_at: now,
            updated_at: now,
        };
        self.store.insert(sensor.clone()).await?;
        info!(sensor = %sensor.id, uid = %sensor.uid, "sensor registered");
        Ok(sensor)
    }

    /// Resolve a sensor by its external uid (exact, case-sensitive).
    pub async fn lookup(&self, uid: &str) -> CoreResult<Sensor> {
        self.store
            .find_by_uid(uid)
            .await?
            .ok_or_else(|| CoreError::not_found("sensor", uid))
    }

    /// Fetch a sensor by internal id.
    pub async fn get(&self, id: SensorId) -> CoreResult<Sensor> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("sensor", id.to_string()))
    }

    /// Change a sensor's lifecycle status. Writes no audit event itself;
    /// callers decide whether the change is audit-worthy.
    pub async fn set_status(&self, id: SensorId, status: SensorStatus) -> CoreResult<Sensor> {
        let mut sensor = self.get(id).await?;
        let previous = sensor.status;
        sensor.status = status;
        sensor.updated_at = Utc::now();
        self.store.update(sensor.clone()).await?;
        debug!(sensor = %id, %previous, new = %status, "sensor status changed");
        Ok(sensor)
    }

    /// Status mutation keyed by external uid, the shape the inbound
    /// boundary uses.
    pub async fn set_status_by_uid(
        &self,
        uid: &str,
        status: SensorStatus,
    ) -> CoreResult<Sensor> {
        let sensor = self.lookup(uid).await?;
        self.set_status(sensor.id, status).await
    }

    /// Rewrite a sensor's uid. This is an update to the same identity, not
    /// a new one; the uid may not collide with a different sensor.
    pub async fn set_uid(&self, id: SensorId, new_uid: impl Into<String>) -> CoreResult<Sensor> {
        let new_uid = new_uid.into();
        validate_uid(&new_uid)?;

        let mut sensor = self.get(id).await?;
        if let Some(existing) = self.store.find_by_uid(&new_uid).await? {
            if existing.id != sensor.id {
                return Err(CoreError::validation(format!(
                    "uid '{new_uid}' belongs to another sensor"
                )));
            }
        }
        sensor.uid = new_uid;
        sensor.updated_at = Utc::now();
        self.store.update(sensor.clone()).await?;
        Ok(sensor)
    }

    /// All registered sensors.
    pub async fn list(&self) -> CoreResult<Vec<Sensor>> {
        Ok(self.store.list().await?)
    }
}

// Minimums count characters, not bytes; multibyte uids are legal.
fn validate_uid(uid: &str) -> CoreResult<()> {
    if uid.chars().count() < MIN_UID_LEN {
        return Err(CoreError::validation(format!(
            "uid must be at least {MIN_UID_LEN} characters"
        )));
    }
    Ok(())
}
