//! Department management.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, ADMINS, EVERYONE};
use crate::service::Service;
use parish_core::model::Department;
use parish_core::{Entity, FieldMap, Kind};

impl Service {
    /// Lists every department. Open to all roles.
    pub fn list_departments(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list departments", EVERYONE)?;
        self.render_all(Kind::Department)
    }

    /// Creates a department. Admin only.
    pub fn create_department(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create departments", ADMINS)?;

        let entity = self.decode(Kind::Department, body)?;
        let Entity::Department(department) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Department, "name", &department.name, None)?;
        self.check_department_links(department)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one department. Open to all roles.
    pub fn get_department(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view departments", EVERYONE)?;
        Ok(self.fetch(Kind::Department, id)?.to_map()?)
    }

    /// Applies a partial update to a department. Admin only.
    pub fn update_department(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update departments", ADMINS)?;

        let mut entity = self.fetch(Kind::Department, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::Department(department) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.require_unique(Kind::Department, "name", &department.name, Some(id))?;
        self.check_department_links(department)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes a department. Admin only.
    ///
    /// Member and group records pointing at it keep their reference;
    /// deletes never cascade.
    pub fn delete_department(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete departments", ADMINS)?;
        let entity = self.fetch(Kind::Department, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    fn check_department_links(&self, department: &Department) -> ApiResult<()> {
        if let Some(id) = &department.head {
            self.require_exists(Kind::Member, id)?;
        }
        Ok(())
    }
}
