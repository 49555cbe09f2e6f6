use tracing::{info, warn};

use crate::{
    CoreError, MaintenanceSchedule, NewSchedule, NewService, Principal, ScheduleId,
    ServiceRecord, ServiceRecordId, ServiceRepository,
};

/// Registry of maintenance schedules and the services performed against them.
///
/// Recording a service rolls its schedule forward and appends a record in one
/// step; readers never observe one without the other.
pub struct MaintenanceRegistry<R: ServiceRepository> {
    repo: R,
}

impl<R: ServiceRepository> MaintenanceRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Create a schedule whose first service is due `frequency_days` after
    /// `initial_service_date`. The equipment id is not validated.
    pub fn create_schedule(
        &self,
        input: NewSchedule,
        caller: &Principal,
    ) -> Result<ScheduleId, CoreError> {
        let schedule = MaintenanceSchedule::new(input, caller.clone())?;
        let equipment_id = schedule.equipment_id;
        let next_service_date = schedule.next_service_date;
        let id = self.repo.insert_schedule(schedule)?;
        info!(
            schedule_id = %id,
            equipment_id = %equipment_id,
            next_service_date = %next_service_date,
            "maintenance schedule created"
        );
        Ok(id)
    }

    pub fn get_schedule(&self, id: ScheduleId) -> Result<Option<MaintenanceSchedule>, CoreError> {
        self.repo.get_schedule(id)
    }

    /// Record a service by `caller` against `schedule_id` and return the new
    /// record id.
    pub fn record_service(
        &self,
        schedule_id: ScheduleId,
        input: NewService,
        caller: &Principal,
    ) -> Result<ServiceRecordId, CoreError> {
        let service_date = input.service_date;
        match self.repo.append_service(schedule_id, input, caller.clone()) {
            Ok((id, record)) => {
                info!(
                    record_id = %id,
                    schedule_id = %schedule_id,
                    equipment_id = %record.equipment_id,
                    service_date = %service_date,
                    status = %record.status,
                    "service recorded"
                );
                Ok(id)
            }
            Err(err @ CoreError::UnknownSchedule(_)) => {
                warn!(schedule_id = %schedule_id, "service rejected: unknown schedule");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn get_record(&self, id: ServiceRecordId) -> Result<Option<ServiceRecord>, CoreError> {
        self.repo.get_record(id)
    }
}
