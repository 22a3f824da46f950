//! Group management.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, ADMINS, LEADERSHIP};
use crate::service::Service;
use parish_core::model::Group;
use parish_core::{Entity, FieldMap, Kind};

impl Service {
    /// Lists every group. Admin and pastor.
    pub fn list_groups(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list groups", LEADERSHIP)?;
        self.render_all(Kind::Group)
    }

    /// Creates a group. Admin only.
    pub fn create_group(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create groups", ADMINS)?;

        let entity = self.decode(Kind::Group, body)?;
        let Entity::Group(group) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Group, "name", &group.name, None)?;
        self.check_group_links(group)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one group. Admin and pastor.
    pub fn get_group(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view groups", LEADERSHIP)?;
        Ok(self.fetch(Kind::Group, id)?.to_map()?)
    }

    /// Applies a partial update to a group. Admin only.
    pub fn update_group(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update groups", ADMINS)?;

        let mut entity = self.fetch(Kind::Group, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::Group(group) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Group, "name", &group.name, Some(id))?;
        self.check_group_links(group)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes a group. Admin only.
    pub fn delete_group(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete groups", ADMINS)?;
        let entity = self.fetch(Kind::Group, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    fn check_group_links(&self, group: &Group) -> ApiResult<()> {
        if let Some(id) = &group.head {
            self.require_exists(Kind::Member, id)?;
        }
        if let Some(id) = &group.department_id {
            self.require_exists(Kind::Department, id)?;
        }
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

    fn admin() -> RequestContext {
        RequestContext::new("u-admin", UserRole::Admin)
    }

    fn body(name: &str) -> FieldMap {
        json!({"name": name, "description": "bible study circle"})
            .as_object()
            .unwrap()
            .clone()
    }

    #[test]
    fn members_cannot_see_groups() {
        let service = service();
        let member = RequestContext::new("u-m", UserRole::Member);
        let err = service.list_groups(&member).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn pastor_reads_but_cannot_write() {
        let service = service();
        let pastor = RequestContext::new("u-p", UserRole::Pastor);

        let created = service.create_group(&admin(), body("Youth")).unwrap();
        let id = created["id"].as_str().unwrap();

        assert!(service.get_group(&pastor, id).is_ok());
        let err = service.create_group(&pastor, body("Elders")).unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn group_can_belong_to_a_department() {
        let service = service();
        let dept = service
            .create_department(
                &admin(),
                json!({"name": "Music"}).as_object().unwrap().clone(),
            )
            .unwrap();

        let mut group = body("Choir");
        group.insert("department_id".into(), dept["id"].clone());
        let created = service.create_group(&admin(), group).unwrap();
        assert_eq!(created["department_id"], dept["id"]);

        let mut dangling = body("Band");
        dangling.insert("department_id".into(), json!("d-404"));
        let err = service.create_group(&admin(), dangling).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn duplicate_name_is_a_conflict() {
        let service = service();
        service.create_group(&admin(), body("Youth")).unwrap();
        let err = service.create_group(&admin(), body("Youth")).unwrap_err();
        assert_eq!(err.status_code(), 409);
    }
}
