//! Member management.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, EVERYONE, LEADERSHIP};
use crate::service::Service;
use parish_core::model::{Member, UserRole};
use parish_core::{Entity, FieldMap, Kind};

impl Service {
    /// Lists every member. Leadership only.
    pub fn list_members(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list members", LEADERSHIP)?;
        self.render_all(Kind::Member)
    }

    /// Registers a new member. Leadership only.
    ///
    /// # Errors
    ///
    /// Conflict for a duplicate email; not-found for a dangling
    /// department or group reference.
    pub fn create_member(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create members", LEADERSHIP)?;
        let entity = self.decode(Kind::Member, body)?;
        let Entity::Member(member) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Member, "email", &member.email, None)?;
        self.check_member_links(member)?;
        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one member.
    ///
    /// A member-role caller may only fetch the record their account
    /// links to.
    pub fn get_member(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view members", EVERYONE)?;
        self.ensure_own_member_record(ctx, id)?;
        Ok(self.fetch(Kind::Member, id)?.to_map()?)
    }

    /// Applies a partial update to a member.
    ///
    /// A member-role caller may only update the record their account
    /// links to.
    pub fn update_member(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update members", EVERYONE)?;
        self.ensure_own_member_record(ctx, id)?;

        let mut entity = self.fetch(Kind::Member, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::Member(member) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Member, "email", &member.email, Some(id))?;
        self.check_member_links(member)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes a member. Nothing cascades; attendance and finance
    /// records keep their member reference.
    ///
    /// A member-role caller may only delete the record their account
    /// links to.
    pub fn delete_member(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete members", EVERYONE)?;
        self.ensure_own_member_record(ctx, id)?;
        let entity = self.fetch(Kind::Member, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    /// Restricts member-role callers to their linked member record.
    fn ensure_own_member_record(&self, ctx: &RequestContext, member_id: &str) -> ApiResult<()> {
        if ctx.role != UserRole::Member {
            return Ok(());
        }
        let linked = self
            .store()
            .get(Kind::User, &ctx.user_id)
            .and_then(|entity| match entity {
                Entity::User(user) => user.member_id,
                _ => None,
            });
        if linked.as_deref() == Some(member_id) {
            return Ok(());
        }
        Err(ApiError::Authorization(
            "members may only manage their own record".into(),
        ))
    }

    fn check_member_links(&self, member: &Member) -> ApiResult<()> {
        if let Some(id) = &member.department_id {
            self.require_exists(Kind::Department, id)?;
        }
        if let Some(id) = &member.group_id {
            self.require_exists(Kind::Group, id)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn member_body(email: &str) -> FieldMap {
        json!({
            "first_name": "Ama",
            "last_name": "Mensah",
            "email": email,
            "phone_number": "0244123456",
        })
        .as_object()
        .unwrap()
        .clone()
    }

    fn seed_member_account(service: &Service, user_id: &str, member_id: &str) {
        let member = service
            .decode(
                Kind::Member,
                json!({
                    "id": member_id,
                    "first_name": "Ama",
                    "last_name": "Mensah",
                    "email": format!("{member_id}@example.com"),
                    "phone_number": "0244123456",
                })
                .as_object()
                .unwrap()
                .clone(),
            )
            .unwrap();
        service.store().add(member).unwrap();

        let account = service
            .decode(
                Kind::User,
                json!({
                    "id": user_id,
                    "username": "amamensah",
                    "email": format!("{user_id}@example.com"),
                    "password_hash": "00$11",
                    "member_id": member_id,
                })
                .as_object()
                .unwrap()
                .clone(),
            )
            .unwrap();
        service.store().add(account).unwrap();
    }

    #[test]
    fn leadership_creates_and_lists_members() {
        let service = service();
        let created = service
            .create_member(&admin(), member_body("ama@example.com"))
            .unwrap();
        assert_eq!(created["type_tag"], json!("member"));
        assert_eq!(created["status"], json!("active"));

        let listed = service
            .list_members(&RequestContext::new("u-2", UserRole::Pastor))
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[test]
    fn member_role_cannot_list() {
        let service = service();
        let err = service
            .list_members(&RequestContext::new("u-1", UserRole::Member))
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
    }

    #[test]
    fn duplicate_email_is_a_conflict() {
        let service = service();
        service
            .create_member(&admin(), member_body("ama@example.com"))
            .unwrap();
        let err = service
            .create_member(&admin(), member_body("ama@example.com"))
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn dangling_department_reference_is_rejected() {
        let service = service();
        let mut body = member_body("ama@example.com");
        body.insert("department_id".into(), json!("d-404"));
        let err = service.create_member(&admin(), body).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[test]
    fn member_manages_only_their_own_record() {
        let service = service();
        seed_member_account(&service, "u-1", "m-1");
        seed_member_account(&service, "u-2", "m-2");
        let caller = RequestContext::new("u-1", UserRole::Member);

        assert!(service.get_member(&caller, "m-1").is_ok());
        let err = service.get_member(&caller, "m-2").unwrap_err();
        assert_eq!(err.status_code(), 403);

        let patch = json!({"address": "12 High Street"}).as_object().unwrap().clone();
        assert!(service.update_member(&caller, "m-1", patch.clone()).is_ok());
        assert_eq!(
            service.update_member(&caller, "m-2", patch).unwrap_err().status_code(),
            403
        );

        assert_eq!(
            service.delete_member(&caller, "m-2").unwrap_err().status_code(),
            403
        );
        assert!(service.delete_member(&caller, "m-1").is_ok());
    }

    #[test]
    fn update_merges_and_pins_identity() {
        let service = service();
        let created = service
            .create_member(&admin(), member_body("ama@example.com"))
            .unwrap();
        let id = created["id"].as_str().unwrap();

        let patch = json!({"address": "12 High Street", "id": "m-hijack"})
            .as_object()
            .unwrap()
            .clone();
        let updated = service.update_member(&admin(), id, patch).unwrap();
        assert_eq!(updated["id"], created["id"]);
        assert_eq!(updated["address"], json!("12 High Street"));
        assert_eq!(updated["created_at"], created["created_at"]);
    }

    #[test]
    fn update_to_taken_email_is_a_conflict() {
        let service = service();
        service
            .create_member(&admin(), member_body("ama@example.com"))
            .unwrap();
        let other = service
            .create_member(&admin(), member_body("kwame@example.com"))
            .unwrap();

        let patch = json!({"email": "ama@example.com"}).as_object().unwrap().clone();
        let err = service
            .update_member(&admin(), other["id"].as_str().unwrap(), patch)
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn delete_removes_the_record() {
        let service = service();
        let created = service
            .create_member(&admin(), member_body("ama@example.com"))
            .unwrap();
        let id = created["id"].as_str().unwrap();

        service.delete_member(&admin(), id).unwrap();
        assert_eq!(service.get_member(&admin(), id).unwrap_err().status_code(), 404);
    }
}
