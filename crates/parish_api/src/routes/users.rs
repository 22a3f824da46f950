//! User account management.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, ADMINS, LEADERSHIP};
use crate::password::hash_password;
use crate::service::Service;
use parish_core::model::User;
use parish_core::{Entity, FieldMap, Kind, ValidationError};
use serde_json::Value;

impl Service {
    /// Lists every user account. Admin only.
    ///
    /// Password hashes are stripped from the response.
    pub fn list_users(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list users", ADMINS)?;
        let mut maps = self.render_all(Kind::User)?;
        for map in &mut maps {
            map.remove("password_hash");
        }
        Ok(maps)
    }

    /// Creates a user account. Admin only.
    ///
    /// The body carries a plain `password` field which is salted and
    /// hashed before storage; a pre-hashed `password_hash` is also
    /// accepted.
    pub fn create_user(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create users", ADMINS)?;
        let body = hash_plain_password(body)?;

        let entity = self.decode(Kind::User, body)?;
        let Entity::User(user) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.check_user_uniqueness(user, None)?;
        self.check_user_links(user)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        present_user(stored.to_map()?)
    }

    /// Fetches one user account. Admin and pastor.
    pub fn get_user(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view users", LEADERSHIP)?;
        present_user(self.fetch(Kind::User, id)?.to_map()?)
    }

    /// Applies a partial update to a user account. Admin only.
    ///
    /// A `password` field in the patch replaces the stored hash.
    pub fn update_user(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update users", ADMINS)?;
        let patch = hash_plain_password(patch)?;

        let mut entity = self.fetch(Kind::User, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::User(user) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.check_user_uniqueness(user, Some(id))?;
        self.check_user_links(user)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        present_user(stored.to_map()?)
    }

    /// Deletes a user account. Admin only.
    pub fn delete_user(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete users", ADMINS)?;
        let entity = self.fetch(Kind::User, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    pub(crate) fn check_user_uniqueness(
        &self,
        user: &User,
        exclude_id: Option<&str>,
    ) -> ApiResult<()> {
        self.require_unique(Kind::User, "email", &user.email, exclude_id)?;
        self.require_unique(Kind::User, "username", &user.username, exclude_id)
    }

    pub(crate) fn check_user_links(&self, user: &User) -> ApiResult<()> {
        if let Some(id) = &user.member_id {
            self.require_exists(Kind::Member, id)?;
        }
        Ok(())
    }
}

/// Replaces a plain `password` body field with a fresh `password_hash`.
fn hash_plain_password(mut body: FieldMap) -> ApiResult<FieldMap> {
    if let Some(value) = body.remove("password") {
        let Value::String(password) = value else {
            return Err(ValidationError::single("password", "must be a string").into());
        };
        if password.len() < 8 {
            return Err(
                ValidationError::single("password", "must be at least 8 characters").into(),
            );
        }
        body.insert(
            "password_hash".to_owned(),
            Value::String(hash_password(&password)),
        );
    }
    Ok(body)
}

/// Strips the stored hash before a user map leaves the service.
pub(crate) fn present_user(mut map: FieldMap) -> ApiResult<FieldMap> {
    map.remove("password_hash");
    Ok(map)
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

    fn user_body(username: &str, email: &str) -> FieldMap {
        json!({
            "username": username,
            "email": email,
            "password": "long enough",
        })
        .as_object()
        .unwrap()
        .clone()
    }

    #[test]
    fn create_hashes_and_hides_the_password() {
        let service = service();
        let created = service
            .create_user(&admin(), user_body("kwame", "kwame@example.com"))
            .unwrap();
        assert!(created.get("password_hash").is_none());
        assert_eq!(created["role"], json!("member"));

        let id = created["id"].as_str().unwrap();
        match service.store().get(Kind::User, id).unwrap() {
            Entity::User(stored) => {
                assert_ne!(stored.password_hash, "long enough");
                assert!(stored.password_hash.contains('$'));
            }
            other => panic!("unexpected entity: {other:?}"),
        }
    }

    #[test]
    fn short_password_is_rejected() {
        let service = service();
        let mut body = user_body("kwame", "kwame@example.com");
        body.insert("password".into(), json!("short"));
        let err = service.create_user(&admin(), body).unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn only_admin_manages_users() {
        let service = service();
        let pastor = RequestContext::new("u-p", UserRole::Pastor);

        let err = service
            .create_user(&pastor, user_body("kwame", "kwame@example.com"))
            .unwrap_err();
        assert_eq!(err.status_code(), 403);
        assert_eq!(service.list_users(&pastor).unwrap_err().status_code(), 403);

        // pastors may still view a single account
        let created = service
            .create_user(&admin(), user_body("kwame", "kwame@example.com"))
            .unwrap();
        let id = created["id"].as_str().unwrap();
        assert!(service.get_user(&pastor, id).is_ok());
    }

    #[test]
    fn duplicate_username_is_a_conflict() {
        let service = service();
        service
            .create_user(&admin(), user_body("kwame", "kwame@example.com"))
            .unwrap();
        let err = service
            .create_user(&admin(), user_body("kwame", "other@example.com"))
            .unwrap_err();
        assert_eq!(err.status_code(), 409);
    }

    #[test]
    fn update_can_rotate_the_password() {
        let service = service();
        let created = service
            .create_user(&admin(), user_body("kwame", "kwame@example.com"))
            .unwrap();
        let id = created["id"].as_str().unwrap();
        let before = match service.store().get(Kind::User, id).unwrap() {
            Entity::User(u) => u.password_hash,
            other => panic!("unexpected entity: {other:?}"),
        };

        let patch = json!({"password": "even longer secret"})
            .as_object()
            .unwrap()
            .clone();
        service.update_user(&admin(), id, patch).unwrap();

        let after = match service.store().get(Kind::User, id).unwrap() {
            Entity::User(u) => u.password_hash,
            other => panic!("unexpected entity: {other:?}"),
        };
        assert_ne!(before, after);
    }

    #[test]
    fn dangling_member_link_is_rejected() {
        let service = service();
        let mut body = user_body("kwame", "kwame@example.com");
        body.insert("member_id".into(), json!("m-404"));
        let err = service.create_user(&admin(), body).unwrap_err();
        assert_eq!(err.status_code(), 404);
    }
}
