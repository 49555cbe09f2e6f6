use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use crate::{
    ComplianceRecord, ComplianceRecordId, ComplianceRepository, ComplianceRequirement, CoreError,
    Equipment, EquipmentId, EquipmentRepository, MaintenanceSchedule, NewInspection, NewService,
    Principal, RequirementId, ScheduleId, ServiceRecord, ServiceRecordId, ServiceRepository,
};

/// In-memory backend for all three stores.
///
/// Each store sits behind its own mutex, which guards that store's maps and
/// its "next id" counters together. Every write is therefore one critical
/// section: id allocation, insertion and (for services) the schedule update
/// either all happen or none do. The stores never lock each other.
pub struct InMemoryRepo {
    equipment: Mutex<EquipmentStore>,
    compliance: Mutex<ComplianceStore>,
    maintenance: Mutex<MaintenanceStore>,
}

struct EquipmentStore {
    next_id: u64,
    items: BTreeMap<EquipmentId, Equipment>,
}

struct ComplianceStore {
    next_requirement_id: u64,
    next_record_id: u64,
    requirements: BTreeMap<RequirementId, ComplianceRequirement>,
    records: BTreeMap<ComplianceRecordId, ComplianceRecord>,
}

struct MaintenanceStore {
    next_schedule_id: u64,
    next_record_id: u64,
    schedules: BTreeMap<ScheduleId, MaintenanceSchedule>,
    records: BTreeMap<ServiceRecordId, ServiceRecord>,
}

impl InMemoryRepo {
    pub fn new() -> Self {
        Self {
            equipment: Mutex::new(EquipmentStore {
                next_id: 1,
                items: BTreeMap::new(),
            }),
            compliance: Mutex::new(ComplianceStore {
                next_requirement_id: 1,
                next_record_id: 1,
                requirements: BTreeMap::new(),
                records: BTreeMap::new(),
            }),
            maintenance: Mutex::new(MaintenanceStore {
                next_schedule_id: 1,
                next_record_id: 1,
                schedules: BTreeMap::new(),
                records: BTreeMap::new(),
            }),
        }
    }
}

impl Default for InMemoryRepo {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<MutexGuard<'_, T>, CoreError> {
    m.lock()
        .map_err(|_| CoreError::Repository("mutex poisoned".into()))
}

/// Hand out `*counter` and advance it. Callers only invoke this once every
/// fallible step of the write has succeeded.
fn take_id(counter: &mut u64) -> Result<u64, CoreError> {
    let id = *counter;
    *counter = id
        .checked_add(1)
        .ok_or_else(|| CoreError::Repository("id space exhausted".into()))?;
    Ok(id)
}

impl EquipmentRepository for InMemoryRepo {
    fn insert(&self, equipment: Equipment) -> Result<EquipmentId, CoreError> {
        let mut store = lock(&self.equipment)?;
        let id = EquipmentId(take_id(&mut store.next_id)?);
        store.items.insert(id, equipment);
        Ok(id)
    }

    fn get(&self, id: EquipmentId) -> Result<Option<Equipment>, CoreError> {
        let store = lock(&self.equipment)?;
        Ok(store.items.get(&id).cloned())
    }
}

impl ComplianceRepository for InMemoryRepo {
    fn insert_requirement(
        &self,
        requirement: ComplianceRequirement,
    ) -> Result<RequirementId, CoreError> {
        let mut store = lock(&self.compliance)?;
        let id = RequirementId(take_id(&mut store.next_requirement_id)?);
        store.requirements.insert(id, requirement);
        Ok(id)
    }

    fn get_requirement(
        &self,
        id: RequirementId,
    ) -> Result<Option<ComplianceRequirement>, CoreError> {
        let store = lock(&self.compliance)?;
        Ok(store.requirements.get(&id).cloned())
    }

    fn append_inspection(
        &self,
        input: NewInspection,
        inspector: Principal,
    ) -> Result<(ComplianceRecordId, ComplianceRecord), CoreError> {
        let mut store = lock(&self.compliance)?;
        let requirement = store
            .requirements
            .get(&input.requirement_id)
            .ok_or(CoreError::UnknownRequirement(input.requirement_id))?;
        let record = ComplianceRecord::project(input, requirement, inspector)?;
        let id = ComplianceRecordId(take_id(&mut store.next_record_id)?);
        store.records.insert(id, record.clone());
        Ok((id, record))
    }

    fn get_record(&self, id: ComplianceRecordId) -> Result<Option<ComplianceRecord>, CoreError> {
        let store = lock(&self.compliance)?;
        Ok(store.records.get(&id).cloned())
    }
}

impl ServiceRepository for InMemoryRepo {
    fn insert_schedule(&self, schedule: MaintenanceSchedule) -> Result<ScheduleId, CoreError> {
        let mut store = lock(&self.maintenance)?;
        let id = ScheduleId(take_id(&mut store.next_schedule_id)?);
        store.schedules.insert(id, schedule);
        Ok(id)
    }

    fn get_schedule(&self, id: ScheduleId) -> Result<Option<MaintenanceSchedule>, CoreError> {
        let store = lock(&self.maintenance)?;
        Ok(store.schedules.get(&id).cloned())
    }

    fn append_service(
        &self,
        schedule_id: ScheduleId,
        input: NewService,
        technician: Principal,
    ) -> Result<(ServiceRecordId, ServiceRecord), CoreError> {
        let mut store = lock(&self.maintenance)?;
        let mut schedule = store
            .schedules
            .get(&schedule_id)
            .cloned()
            .ok_or(CoreError::UnknownSchedule(schedule_id))?;
        schedule.roll_forward(input.service_date)?;
        let record = ServiceRecord::from_schedule(schedule_id, &schedule, input, technician);
        let id = ServiceRecordId(take_id(&mut store.next_record_id)?);
        store.schedules.insert(schedule_id, schedule);
        store.records.insert(id, record.clone());
        Ok((id, record))
    }

    fn get_record(&self, id: ServiceRecordId) -> Result<Option<ServiceRecord>, CoreError> {
        let store = lock(&self.maintenance)?;
        Ok(store.records.get(&id).cloned())
    }
}
