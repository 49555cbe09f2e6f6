//! Domain library for the equipment lifecycle ledger.
//!
//! This crate holds the domain types, ports (traits), error definitions and
//! the three registries (equipment, compliance, maintenance). Keep storage
//! engines and process concerns (config, subscriber setup) out of this crate;
//! the only backend living here is the in-memory one under [`adapters`].
//!
//! Dates are plain integers. The ledger never converts units: a projected
//! date is always `base + frequency_days` in whatever unit the caller uses for
//! both, so callers must keep the two consistent.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};
use thiserror::Error;

macro_rules! id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl $name {
            pub fn get(self) -> u64 {
                self.0
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_type!(
    /// Sequential identifier of a registered piece of equipment.
    EquipmentId
);
id_type!(
    /// Sequential identifier of a compliance requirement.
    RequirementId
);
id_type!(
    /// Sequential identifier of a compliance (inspection) record.
    ComplianceRecordId
);
id_type!(
    /// Sequential identifier of a maintenance schedule.
    ScheduleId
);
id_type!(
    /// Sequential identifier of a service record.
    ServiceRecordId
);

/// Opaque identity of a caller, supplied by the hosting environment.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Principal(String);

impl Principal {
    pub fn new<S: Into<String>>(s: S) -> Result<Self, CoreError> {
        let val = s.into();
        validate::validate_principal(&val)?;
        Ok(Self(val))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Principal {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Principal> for String {
    fn from(value: Principal) -> Self {
        value.0
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Recurrence interval of a requirement or schedule. Always positive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Frequency(u32);

impl Frequency {
    pub fn new(days: u32) -> Result<Self, CoreError> {
        validate::validate_frequency(days)?;
        Ok(Self(days))
    }

    pub fn days(self) -> u32 {
        self.0
    }
}

impl TryFrom<u32> for Frequency {
    type Error = CoreError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Frequency> for u32 {
    fn from(value: Frequency) -> Self {
        value.0
    }
}

/// A date on the ledger's integer timeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DayStamp(pub u64);

impl DayStamp {
    pub fn get(self) -> u64 {
        self.0
    }

    /// The date `frequency` units after this one.
    pub fn after(self, frequency: Frequency) -> Result<DayStamp, CoreError> {
        self.0
            .checked_add(u64::from(frequency.days()))
            .map(DayStamp)
            .ok_or(CoreError::DateOverflow)
    }
}

impl Display for DayStamp {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Input data for registering equipment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEquipment {
    pub name: String,
    pub equipment_type: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub installation_date: DayStamp,
    pub warranty_expiration: DayStamp,
}

/// Stored equipment. Never mutated after insertion.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Equipment {
    pub name: String,
    pub equipment_type: String,
    pub manufacturer: String,
    pub model: String,
    pub serial_number: String,
    pub installation_date: DayStamp,
    pub warranty_expiration: DayStamp,
    pub owner: Principal,
}

impl Equipment {
    pub fn new(input: NewEquipment, owner: Principal) -> Self {
        Self {
            name: input.name,
            equipment_type: input.equipment_type,
            manufacturer: input.manufacturer,
            model: input.model,
            serial_number: input.serial_number,
            installation_date: input.installation_date,
            warranty_expiration: input.warranty_expiration,
            owner,
        }
    }
}

/// Input data for defining a compliance requirement.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewRequirement {
    pub title: String,
    pub description: String,
    /// Equipment category the requirement applies to, not a specific item.
    pub equipment_type: String,
    pub frequency_days: Frequency,
}

/// An admin-defined recurring compliance obligation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRequirement {
    pub title: String,
    pub description: String,
    pub equipment_type: String,
    pub frequency_days: Frequency,
    pub is_active: bool,
    pub created_by: Principal,
}

impl ComplianceRequirement {
    /// Create a requirement; `is_active` starts out true.
    pub fn new(input: NewRequirement, created_by: Principal) -> Self {
        Self {
            title: input.title,
            description: input.description,
            equipment_type: input.equipment_type,
            frequency_days: input.frequency_days,
            is_active: true,
            created_by,
        }
    }
}

/// Input data for recording an inspection.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewInspection {
    /// Not checked against the equipment registry.
    pub equipment_id: EquipmentId,
    pub requirement_id: RequirementId,
    pub inspection_date: DayStamp,
    pub notes: String,
    pub passed: bool,
}

/// Immutable log entry of a completed inspection.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceRecord {
    pub equipment_id: EquipmentId,
    pub requirement_id: RequirementId,
    pub inspection_date: DayStamp,
    pub inspector: Principal,
    pub notes: String,
    pub passed: bool,
    pub next_due_date: DayStamp,
}

impl ComplianceRecord {
    /// Build the record for `input`, projecting the next due date from the
    /// requirement's current frequency. Computed once, never recomputed.
    pub fn project(
        input: NewInspection,
        requirement: &ComplianceRequirement,
        inspector: Principal,
    ) -> Result<Self, CoreError> {
        let next_due_date = input.inspection_date.after(requirement.frequency_days)?;
        Ok(Self {
            equipment_id: input.equipment_id,
            requirement_id: input.requirement_id,
            inspection_date: input.inspection_date,
            inspector,
            notes: input.notes,
            passed: input.passed,
            next_due_date,
        })
    }
}

/// Input data for creating a maintenance schedule.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewSchedule {
    /// Not checked against the equipment registry.
    pub equipment_id: EquipmentId,
    pub service_type: String,
    pub frequency_days: Frequency,
    pub initial_service_date: DayStamp,
}

/// Per-equipment recurring maintenance definition with rolling due dates.
///
/// The only mutable entity in the ledger: `last_service_date` and
/// `next_service_date` move forward every time a service is recorded.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaintenanceSchedule {
    pub equipment_id: EquipmentId,
    pub service_type: String,
    pub frequency_days: Frequency,
    pub last_service_date: DayStamp,
    pub next_service_date: DayStamp,
    pub created_by: Principal,
}

impl MaintenanceSchedule {
    pub fn new(input: NewSchedule, created_by: Principal) -> Result<Self, CoreError> {
        let next_service_date = input.initial_service_date.after(input.frequency_days)?;
        Ok(Self {
            equipment_id: input.equipment_id,
            service_type: input.service_type,
            frequency_days: input.frequency_days,
            last_service_date: input.initial_service_date,
            next_service_date,
            created_by,
        })
    }

    /// Move both service dates forward to `service_date`, regardless of their
    /// prior values. Leaves the schedule untouched on error.
    pub fn roll_forward(&mut self, service_date: DayStamp) -> Result<(), CoreError> {
        let next = service_date.after(self.frequency_days)?;
        self.last_service_date = service_date;
        self.next_service_date = next;
        Ok(())
    }
}

/// Input data for recording a completed service.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewService {
    pub service_date: DayStamp,
    pub notes: String,
    /// Free-form tag, e.g. "completed".
    pub status: String,
}

/// Immutable log entry of a completed service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRecord {
    pub equipment_id: EquipmentId,
    pub schedule_id: ScheduleId,
    pub service_date: DayStamp,
    pub service_type: String,
    pub technician: Principal,
    pub notes: String,
    pub status: String,
}

impl ServiceRecord {
    /// Build a record copying equipment and service type from `schedule`.
    pub fn from_schedule(
        schedule_id: ScheduleId,
        schedule: &MaintenanceSchedule,
        input: NewService,
        technician: Principal,
    ) -> Self {
        Self {
            equipment_id: schedule.equipment_id,
            schedule_id,
            service_date: input.service_date,
            service_type: schedule.service_type.clone(),
            technician,
            notes: input.notes,
            status: input.status,
        }
    }
}

/// Repository port for the equipment store.
pub trait EquipmentRepository: Send + Sync {
    /// Allocate the next id and store `equipment` under it, as one unit.
    fn insert(&self, equipment: Equipment) -> Result<EquipmentId, CoreError>;
    fn get(&self, id: EquipmentId) -> Result<Option<Equipment>, CoreError>;
}

/// Repository port for the compliance store.
pub trait ComplianceRepository: Send + Sync {
    fn insert_requirement(
        &self,
        requirement: ComplianceRequirement,
    ) -> Result<RequirementId, CoreError>;
    fn get_requirement(&self, id: RequirementId)
        -> Result<Option<ComplianceRequirement>, CoreError>;
    /// Look up the referenced requirement, project the record and store it
    /// under a fresh id, as one unit. Fails with `UnknownRequirement` without
    /// consuming an id when the requirement does not exist.
    fn append_inspection(
        &self,
        input: NewInspection,
        inspector: Principal,
    ) -> Result<(ComplianceRecordId, ComplianceRecord), CoreError>;
    fn get_record(&self, id: ComplianceRecordId) -> Result<Option<ComplianceRecord>, CoreError>;
}

/// Repository port for the maintenance store.
pub trait ServiceRepository: Send + Sync {
    fn insert_schedule(&self, schedule: MaintenanceSchedule) -> Result<ScheduleId, CoreError>;
    fn get_schedule(&self, id: ScheduleId) -> Result<Option<MaintenanceSchedule>, CoreError>;
    /// Roll the schedule forward and append a service record, as one unit.
    /// Fails with `UnknownSchedule` without touching anything when the
    /// schedule does not exist.
    fn append_service(
        &self,
        schedule_id: ScheduleId,
        input: NewService,
        technician: Principal,
    ) -> Result<(ServiceRecordId, ServiceRecord), CoreError>;
    fn get_record(&self, id: ServiceRecordId) -> Result<Option<ServiceRecord>, CoreError>;
}

/// Core domain errors. A lookup miss is not an error; ports return `Ok(None)`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("caller is not authorized for this operation")]
    Unauthorized,
    #[error("unknown compliance requirement: {0}")]
    UnknownRequirement(RequirementId),
    #[error("unknown maintenance schedule: {0}")]
    UnknownSchedule(ScheduleId),
    #[error("invalid frequency: must be a positive number of days")]
    InvalidFrequency,
    #[error("invalid principal: must not be empty")]
    InvalidPrincipal,
    #[error("date overflow while projecting the next due date")]
    DateOverflow,
    #[error("repository error: {0}")]
    Repository(String),
}

/// Return a short about/version line for hosts to log.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - equipment ledger domain loaded", pkg, ver)
}

pub mod adapters;
pub mod compliance;
pub mod equipment;
pub mod maintenance;
pub mod validate;
