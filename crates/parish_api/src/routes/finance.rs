//! Financial record management.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, LEADERSHIP};
use crate::service::Service;
use parish_core::model::FinancialRecord;
use parish_core::{Entity, FieldMap, Kind};

impl Service {
    /// Lists every financial record. Admin and pastor.
    pub fn list_finances(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list financial records", LEADERSHIP)?;
        self.render_all(Kind::FinancialRecord)
    }

    /// Creates a financial record. Admin and pastor.
    ///
    /// Linked events, departments, and groups must exist. The donor is
    /// free text and unchecked.
    pub fn create_finance(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "create financial records", LEADERSHIP)?;

        let entity = self.decode(Kind::FinancialRecord, body)?;
        let Entity::FinancialRecord(record) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.check_finance_links(record)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one financial record. Admin and pastor.
    pub fn get_finance(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view financial records", LEADERSHIP)?;
        Ok(self.fetch(Kind::FinancialRecord, id)?.to_map()?)
    }

    /// Applies a partial update to a financial record. Admin and pastor.
    pub fn update_finance(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update financial records", LEADERSHIP)?;

        let mut entity = self.fetch(Kind::FinancialRecord, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::FinancialRecord(record) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.check_finance_links(record)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes a financial record. Admin and pastor.
    pub fn delete_finance(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete financial records", LEADERSHIP)?;
        let entity = self.fetch(Kind::FinancialRecord, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    fn check_finance_links(&self, record: &FinancialRecord) -> ApiResult<()> {
        if let Some(id) = &record.event_id {
            self.require_exists(Kind::Event, id)?;
        }
        if let Some(id) = &record.department_id {
            self.require_exists(Kind::Department, id)?;
        }
        if let Some(id) = &record.group_id {
            self.require_exists(Kind::Group, id)?;
        }
        Ok(())
    }
}
