//! Attendance tracking.

use crate::context::RequestContext;
use crate::error::{ApiError, ApiResult};
use crate::gate::{authorize, LEADERSHIP};
use crate::service::Service;
use chrono::NaiveDate;
use parish_core::model::{Attendance, AttendanceStatus};
use parish_core::{Entity, FieldMap, Kind};
use serde::{Deserialize, Serialize};

/// Composable filter set for [`Service::search_attendance`].
///
/// Every field is optional; present fields must all match. The date
/// range is inclusive at both ends, and an open end defaults to the
/// edge of the calendar.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttendanceSearch {
    /// Restrict to one event.
    #[serde(default)]
    pub event_id: Option<String>,
    /// Restrict to one member.
    #[serde(default)]
    pub member_id: Option<String>,
    /// Restrict to one attendance status.
    #[serde(default)]
    pub status: Option<AttendanceStatus>,
    /// Earliest date to include.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    /// Latest date to include.
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl Service {
    /// Lists every attendance record. Admin and pastor.
    pub fn list_attendance(&self, ctx: &RequestContext) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "list attendance", LEADERSHIP)?;
        self.render_all(Kind::Attendance)
    }

    /// Marks attendance for a member at an event. Admin and pastor.
    ///
    /// Both the member and the event must exist, and a member can be
    /// marked at most once per event.
    pub fn create_attendance(&self, ctx: &RequestContext, body: FieldMap) -> ApiResult<FieldMap> {
        authorize(ctx, "record attendance", LEADERSHIP)?;

        let entity = self.decode(Kind::Attendance, body)?;
        let Entity::Attendance(attendance) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.check_attendance_links(attendance)?;
        self.ensure_unmarked(attendance, None)?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Fetches one attendance record. Admin and pastor.
    pub fn get_attendance(&self, ctx: &RequestContext, id: &str) -> ApiResult<FieldMap> {
        authorize(ctx, "view attendance", LEADERSHIP)?;
        Ok(self.fetch(Kind::Attendance, id)?.to_map()?)
    }

    /// Applies a partial update to an attendance record. Admin and pastor.
    pub fn update_attendance(
        &self,
        ctx: &RequestContext,
        id: &str,
        patch: FieldMap,
    ) -> ApiResult<FieldMap> {
        authorize(ctx, "update attendance", LEADERSHIP)?;

        let mut entity = self.fetch(Kind::Attendance, id)?;
        entity.merge(&patch)?;
        entity.validate()?;
        let Entity::Attendance(attendance) = &entity else {
            return Err(ApiError::Internal("decoded kind mismatch".into()));
        };
        self.check_attendance_links(attendance)?;
        self.ensure_unmarked(attendance, Some(id))?;

        let stored = self.store().add(entity)?;
        self.commit()?;
        Ok(stored.to_map()?)
    }

    /// Deletes an attendance record. Admin and pastor.
    pub fn delete_attendance(&self, ctx: &RequestContext, id: &str) -> ApiResult<()> {
        authorize(ctx, "delete attendance", LEADERSHIP)?;
        let entity = self.fetch(Kind::Attendance, id)?;
        self.store().remove(&entity)?;
        self.commit()?;
        Ok(())
    }

    /// Searches attendance records. Admin and pastor.
    pub fn search_attendance(
        &self,
        ctx: &RequestContext,
        search: &AttendanceSearch,
    ) -> ApiResult<Vec<FieldMap>> {
        authorize(ctx, "search attendance", LEADERSHIP)?;

        let mut query = self.store().query(Kind::Attendance);
        if let Some(event_id) = &search.event_id {
            query = query.eq("event_id", event_id.as_str());
        }
        if let Some(member_id) = &search.member_id {
            query = query.eq("member_id", member_id.as_str());
        }
        if let Some(status) = search.status {
            query = query.eq("status", status.as_str());
        }
        if search.start_date.is_some() || search.end_date.is_some() {
            let start = search.start_date.unwrap_or(NaiveDate::MIN);
            let end = search.end_date.unwrap_or(NaiveDate::MAX);
            query = query.date_between("date", start, end);
        }

        let mut maps = Vec::new();
        for entity in query.run()? {
            maps.push(entity.to_map()?);
        }
        Ok(maps)
    }

    fn check_attendance_links(&self, attendance: &Attendance) -> ApiResult<()> {
        self.require_exists(Kind::Member, &attendance.member_id)?;
        self.require_exists(Kind::Event, &attendance.event_id)
    }

    fn ensure_unmarked(&self, attendance: &Attendance, exclude_id: Option<&str>) -> ApiResult<()> {
        let hit = self
            .store()
            .query(Kind::Attendance)
            .eq("member_id", attendance.member_id.as_str())
            .eq("event_id", attendance.event_id.as_str())
            .first()?;
        match hit {
            Some(found) if exclude_id != Some(found.id()) => Err(ApiError::conflict(
                "attendance for this member and event is already marked",
            )),
            _ => Ok(()),
        }
    }
}
