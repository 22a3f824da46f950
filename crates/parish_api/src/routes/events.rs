//! Event management.

use crate::context::RequestContext;
use crate::error::ApiResult;
use crate::gate::{authorize, EVERYONE, LEADERSHIP};
use crate::service::Service;
use parish_core::{FieldMap, Kind};

impl Service {
    /// Lists every event. Open to all roles.
    pub fn list_events(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list events", EVERYONE)?;
        self.render_all(Kind::Event)
    }

    /// Creates an event. Admin and pastor.
    pub fn create_event(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create events", LEADERSHIP)?;
        let entity = self.decode(Kind::Event, body)?;
        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one event. Open to all roles.
    pub fn get_event(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view events", EVERYONE)?;
        Ok(self.fetch(Kind::Event, id)?.to_map()?)
    }

    /// Applies a partial update to an event. Admin and pastor.
    pub fn update_event(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update events", LEADERSHIP)?;

        let mut entity = self.fetch(Kind::Event, id)?;
        entity.merge(&patch)?;
        entity.validate()?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes an event. Admin and pastor.
    ///
    /// Attendance records for the event keep their reference; deletes
    /// never cascade.
    pub fn delete_event(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete events", LEADERSHIP)?;
        let entity = self.fetch(Kind::Event, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parish_core::model::UserRole;
    use parish_core::{Store, StoreConfig};
    use serde_json::json;
    use std::sync::Arc;

    fn service() -> Service {
        let store = Arc::new(Store::open(StoreConfig::memory()).unwrap());
        Service::new(store, b"test-secret".to_vec())
    }

    fn body(name: &str) -> FieldMap {
        json!({
            "name": name,
            "start_date": "2026-09-06",
            "location": "Main hall",
            "event_type": "service",
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn pastors_manage_members_view() {
        let service = service();
        let pastor = RequestContext::new("u-p", UserRole::Pastor);
        let member = RequestContext::new("u-m", UserRole::Member);

        let created = service.create_event(&pastor, body("Harvest")).unwrap();
        let id = created["id"].as_str().unwrap();

        assert!(service.get_event(&member, id).is_ok());
        assert_eq!(service.list_events(&member).unwrap().len(), 1);

        let err = service.create_event(&member, body("Picnic")).unwrap_err();
        assert_eq!(err.status_code(), 403);
        let err = service.delete_event(&member, id).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn end_before_start_is_rejected() {
        let service = service();
        let pastor = RequestContext::new("u-p", UserRole::Pastor);
        let mut event = body("Retreat");
        event.insert("end_date".into(), json!("2026-09-01"));
        let err = service.create_event(&pastor, event).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn update_can_extend_the_event() {
        let service = service();
        let pastor = RequestContext::new("u-p", UserRole::Pastor);
        let created = service.create_event(&pastor, body("Retreat")).unwrap();
        let id = created["id"].as_str().unwrap();

        let patch = json!({"end_date": "2026-09-08", "is_recurring": true})
            .as_object()
            .unwrap()
            .clone();
        let updated = service.update_event(&pastor, id, patch).unwrap();
        assert_eq!(updated["end_date"], json!("2026-09-08"));
        assert_eq!(updated["is_recurring"], json!(true));
    }
}
