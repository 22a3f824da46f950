//! Role and permission management.
//!
//! These are administrative records describing the access scheme, not
//! the enforcement itself; the gate works off each user's `role` field.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, ADMINS};
use crate::service::Service;
use parish_core::{Entity, FieldMap, Kind};

impl Service {
    /// Lists every role. Admin only.
    pub fn list_roles(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list roles", ADMINS)?;
        self.render_all(Kind::Role)
    }

    /// Creates a role. Admin only.
    pub fn create_role(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create roles", ADMINS)?;

        let entity = self.decode(Kind::Role, body)?;
        let Entity::Role(role) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Role, "name", &role.name, None)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one role. Admin only.
    pub fn get_role(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view roles", ADMINS)?;
        Ok(self.fetch(Kind::Role, id)?.to_map()?)
    }

    /// Applies a partial update to a role. Admin only.
    pub fn update_role(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update roles", ADMINS)?;

        let mut entity = self.fetch(Kind::Role, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::Role(role) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Role, "name", &role.name, Some(id))?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes a role. Admin only.
    ///
    /// Permissions pointing at it keep their reference; deletes never
    /// cascade.
    pub fn delete_role(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete roles", ADMINS)?;
        let entity = self.fetch(Kind::Role, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    /// Lists every permission. Admin only.
    pub fn list_permissions(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list permissions", ADMINS)?;
        self.render_all(Kind::Permission)
    }

    /// Creates a permission. Admin only.
    pub fn create_permission(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create permissions", ADMINS)?;

        let entity = self.decode(Kind::Permission, body)?;
        let Entity::Permission(permission) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Permission, "name", &permission.name, None)?;
        if let Some(role_id) = &permission.role_id {
            self.require_exists(Kind::Role, role_id)?;
        }

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one permission. Admin only.
    pub fn get_permission(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view permissions", ADMINS)?;
        Ok(self.fetch(Kind::Permission, id)?.to_map()?)
    }

    /// Applies a partial update to a permission. Admin only.
    pub fn update_permission(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update permissions", ADMINS)?;

        let mut entity = self.fetch(Kind::Permission, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::Permission(permission) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Permission, "name", &permission.name, Some(id))?;
        if let Some(role_id) = &permission.role_id {
            self.require_exists(Kind::Role, role_id)?;
        }

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes a permission. Admin only.
    pub fn delete_permission(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete permissions", ADMINS)?;
        let entity = self.fetch(Kind::Permission, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }
}
