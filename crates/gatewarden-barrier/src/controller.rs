//! Barrier controller operations.

use crate::BarrierStore;
use chrono::Utc;
use gatewarden_types::{Barrier, BarrierId, BarrierPosition, CoreError, CoreResult, ZoneId};
use std::sync::Arc;
use tracing::{debug, info};

/// Owner of barrier position state. Position changes go through
/// [`BarrierController::set_position`] exclusively; callers pair each
/// change with an audit write.
#[derive(Clone)]
pub struct BarrierController {
    store: Arc<dyn BarrierStore>,
}

impl BarrierController {
    /// Create a controller over the given store.
    pub fn new(store: Arc<dyn BarrierStore>) -> Self {
        Self { store }
    }

    /// Register a new barrier, closed. A zone may hold at most one
    /// barrier; the invariant is enforced here rather than left to the
    /// storage schema.
    pub async fn create(&self, name: impl Into<String>, zone: Option<ZoneId>) -> CoreResult<Barrier> {
        let name = name.into();
        if name.is_empty() {
            return Err(CoreError::validation("barrier name must not be empty"));
        }
        if self.store.find_by_name(&name).await?.is_some() {
            return Err(CoreError::validation(format!(
                "barrier '{name}' already exists"
            )));
        }
        if let Some(zone) = zone {
            if let Some(existing) = self.store.find_by_zone(zone).await? {
                return Err(CoreError::validation(format!(
                    "zone {zone} already has barrier '{}'",
                    existing.name
                )));
            }
        }

        let barrier = Barrier {
            id: BarrierId::new(),
            name,
            position: BarrierPosition::default(),
            zone,
            changed_at: Utc::now(),
        };
        self.store.insert(barrier.clone()).await?;
        info!(barrier = %barrier.id, name = %barrier.name, "barrier registered");
        Ok(barrier)
    }

    /// Fetch a barrier by id.
    pub async fn get(&self, id: BarrierId) -> CoreResult<Barrier> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| CoreError::not_found("barrier", id.to_string()))
    }

    /// The single transition operation. Idempotent in the resulting
    /// position; the change timestamp always advances, so re-asserting the
    /// current position still records the attempt.
    pub async fn set_position(
        &self,
        id: BarrierId,
        position: BarrierPosition,
    ) -> CoreResult<Barrier> {
        let mut barrier = self.get(id).await?;
        barrier.position = position;
        barrier.changed_at = Utc::now();
        self.store.update(barrier.clone()).await?;
        debug!(barrier = %id, %position, "barrier position set");
        Ok(barrier)
    }

    /// All registered barriers.
    pub async fn list(&self) -> CoreResult<Vec<Barrier>> {
        Ok(self.store.list().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MemoryBarrierStore;

    fn controller() -> BarrierController {
        BarrierController::new(Arc::new(MemoryBarrierStore::new()))
    }

    #[tokio::test]
    async fn test_create_starts_closed() {
        let controller = controller();
        let barrier = controller.create("Main gate", None).await.unwrap();
        assert_eq!(barrier.position, BarrierPosition::Closed);
    }

    #[tokio::test]
    async fn test_duplicate_name_rejected() {
        let controller = controller();
        controller.create("Main gate", None).await.unwrap();
        let err = controller.create("Main gate", None).await.unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));
    }

    #[tokio::test]
    async fn test_zone_holds_at_most_one_barrier() {
        let controller = controller();
        let zone = ZoneId::new();
        controller.create("North gate", Some(zone)).await.unwrap();
        let err = controller
            .create("South gate", Some(zone))
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation { .. }));

        // A different zone is fine.
        assert!(controller
            .create("South gate", Some(ZoneId::new()))
            .await
            .is_ok());
    }

    #[tokio::test]
    async fn test_set_position_is_idempotent_in_position() {
        let controller = controller();
        let barrier = controller.create("Main gate", None).await.unwrap();

        let first = controller
            .set_position(barrier.id, BarrierPosition::Open)
            .await
            .unwrap();
        let second = controller
            .set_position(barrier.id, BarrierPosition::Open)
            .await
            .unwrap();

        assert_eq!(first.position, BarrierPosition::Open);
        assert_eq!(second.position, BarrierPosition::Open);
        assert!(second.changed_at >= first.changed_at);
    }

    #[tokio::test]
    async fn test_set_position_unknown_barrier() {
        let controller = controller();
        let err = controller
            .set_position(BarrierId::new(), BarrierPosition::Open)
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::NotFound { .. }));
    }
}
