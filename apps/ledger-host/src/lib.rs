//! ledger-host: embedding glue for the equipment lifecycle ledger.
//!
//! The hosting environment links this crate to get:
//! - Config: admin principal, storage backend and log format from the
//!   environment (see `config.rs`).
//! - Logging: a `tracing-subscriber` registry with `RUST_LOG` filtering and
//!   pretty or JSON output.
//! - Storage: in-memory, or SQLite (file) when the `sqlite` feature is enabled.
//! - A [`Ledger`] bundling the equipment, compliance and maintenance
//!   registries over the chosen backend.
//!
//! The caller identity for every operation is passed in by the host; this
//! crate never derives one itself.
//!
//! ```no_run
//! let cfg = ledger_host::Config::from_env()?;
//! ledger_host::init_tracing(&cfg)?;
//! let ledger = ledger_host::Ledger::open(&cfg)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod config;

pub use config::{Config, ConfigError, LogFormat, StorageProvider};

use std::sync::Arc;

use domain::adapters::memory_repo::InMemoryRepo;
use domain::compliance::ComplianceRegistry;
use domain::equipment::EquipmentRegistry;
use domain::maintenance::MaintenanceRegistry;
use domain::{
    ComplianceRecord, ComplianceRecordId, ComplianceRepository, ComplianceRequirement, CoreError,
    Equipment, EquipmentId, EquipmentRepository, MaintenanceSchedule, NewInspection, NewService,
    Principal, RequirementId, ScheduleId, ServiceRecord, ServiceRecordId, ServiceRepository,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, util::TryInitError, EnvFilter};

// Local repo abstraction supporting memory or sqlite (feature-gated).
enum RepoKind {
    Memory(InMemoryRepo),
    #[cfg(feature = "sqlite")]
    Sqlite(sqlite_adapter::SqliteRepo),
}

/// Backend shared by the three registries of one [`Ledger`].
#[derive(Clone)]
pub struct AnyRepo {
    kind: Arc<RepoKind>,
}

impl AnyRepo {
    fn memory() -> Self {
        Self {
            kind: Arc::new(RepoKind::Memory(InMemoryRepo::new())),
        }
    }

    #[cfg(feature = "sqlite")]
    fn sqlite(path: &std::path::Path) -> Result<Self, CoreError> {
        Ok(Self {
            kind: Arc::new(RepoKind::Sqlite(sqlite_adapter::SqliteRepo::new(path)?)),
        })
    }
}

impl EquipmentRepository for AnyRepo {
    fn insert(&self, equipment: Equipment) -> Result<EquipmentId, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.insert(equipment),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.insert(equipment),
        }
    }

    fn get(&self, id: EquipmentId) -> Result<Option<Equipment>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.get(id),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.get(id),
        }
    }
}

impl ComplianceRepository for AnyRepo {
    fn insert_requirement(
        &self,
        requirement: ComplianceRequirement,
    ) -> Result<RequirementId, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.insert_requirement(requirement),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.insert_requirement(requirement),
        }
    }

    fn get_requirement(
        &self,
        id: RequirementId,
    ) -> Result<Option<ComplianceRequirement>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.get_requirement(id),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.get_requirement(id),
        }
    }

    fn append_inspection(
        &self,
        input: NewInspection,
        inspector: Principal,
    ) -> Result<(ComplianceRecordId, ComplianceRecord), CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.append_inspection(input, inspector),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.append_inspection(input, inspector),
        }
    }

    fn get_record(&self, id: ComplianceRecordId) -> Result<Option<ComplianceRecord>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => ComplianceRepository::get_record(r, id),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => ComplianceRepository::get_record(r, id),
        }
    }
}

impl ServiceRepository for AnyRepo {
    fn insert_schedule(&self, schedule: MaintenanceSchedule) -> Result<ScheduleId, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.insert_schedule(schedule),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.insert_schedule(schedule),
        }
    }

    fn get_schedule(&self, id: ScheduleId) -> Result<Option<MaintenanceSchedule>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.get_schedule(id),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.get_schedule(id),
        }
    }

    fn append_service(
        &self,
        schedule_id: ScheduleId,
        input: NewService,
        technician: Principal,
    ) -> Result<(ServiceRecordId, ServiceRecord), CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => r.append_service(schedule_id, input, technician),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => r.append_service(schedule_id, input, technician),
        }
    }

    fn get_record(&self, id: ServiceRecordId) -> Result<Option<ServiceRecord>, CoreError> {
        match &*self.kind {
            RepoKind::Memory(r) => ServiceRepository::get_record(r, id),
            #[cfg(feature = "sqlite")]
            RepoKind::Sqlite(r) => ServiceRepository::get_record(r, id),
        }
    }
}

/// The three registries over one backend. The registries never call each
/// other; sharing a backend only shares the connection, not any state.
pub struct Ledger {
    equipment: EquipmentRegistry<AnyRepo>,
    compliance: ComplianceRegistry<AnyRepo>,
    maintenance: MaintenanceRegistry<AnyRepo>,
}

impl Ledger {
    /// Build a ledger over the backend selected by `cfg`.
    pub fn open(cfg: &Config) -> Result<Self, CoreError> {
        cfg.warn_if_volatile();
        let repo = build_repo(cfg)?;
        info!(
            about = %domain::about(),
            storage = ?cfg.storage_provider,
            admin = %cfg.admin,
            "ledger opened"
        );
        Ok(Self::with_repo(repo, cfg.admin.clone()))
    }

    /// Build a ledger over a fresh in-memory backend.
    pub fn in_memory(admin: Principal) -> Self {
        Self::with_repo(AnyRepo::memory(), admin)
    }

    fn with_repo(repo: AnyRepo, admin: Principal) -> Self {
        Self {
            equipment: EquipmentRegistry::new(repo.clone()),
            compliance: ComplianceRegistry::new(repo.clone(), admin),
            maintenance: MaintenanceRegistry::new(repo),
        }
    }

    pub fn equipment(&self) -> &EquipmentRegistry<AnyRepo> {
        &self.equipment
    }

    pub fn compliance(&self) -> &ComplianceRegistry<AnyRepo> {
        &self.compliance
    }

    pub fn maintenance(&self) -> &MaintenanceRegistry<AnyRepo> {
        &self.maintenance
    }
}

// Construct a repository instance based on config and feature flags.
fn build_repo(cfg: &Config) -> Result<AnyRepo, CoreError> {
    match cfg.storage_provider {
        StorageProvider::Memory => Ok(AnyRepo::memory()),
        #[cfg(feature = "sqlite")]
        StorageProvider::Sqlite => AnyRepo::sqlite(&cfg.db_path),
        #[cfg(not(feature = "sqlite"))]
        StorageProvider::Sqlite => Err(CoreError::Repository(
            "STORAGE_PROVIDER=sqlite but the `sqlite` feature is disabled".into(),
        )),
    }
}

/// Install the global tracing subscriber. Fails if one is already installed.
pub fn init_tracing(cfg: &Config) -> Result<(), TryInitError> {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);
    match cfg.log_format {
        LogFormat::Json => registry
            .with(
                fmt::layer()
                    .json()
                    .with_target(true)
                    .with_timer(fmt::time::SystemTime)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
        LogFormat::Pretty => registry
            .with(
                fmt::layer()
                    .pretty()
                    .with_target(true)
                    .with_writer(std::io::stdout),
            )
            .try_init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{DayStamp, Frequency, NewEquipment, NewRequirement, NewSchedule};

    const ADMIN: &str = "ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM";

    fn admin() -> Principal {
        Principal::new(ADMIN).unwrap()
    }

    fn oven() -> NewEquipment {
        NewEquipment {
            name: "Convection Oven".into(),
            equipment_type: "Cooking Equipment".into(),
            manufacturer: "KitchenTech".into(),
            model: "Pro5000".into(),
            serial_number: "OVEN12345".into(),
            installation_date: DayStamp(1672531200),
            warranty_expiration: DayStamp(1767225600),
        }
    }

    // Equipment -> requirement/schedule -> records, the way a host drives it.
    fn exercise_lifecycle(ledger: &Ledger) {
        let equipment_id = ledger.equipment().register(oven(), &admin()).unwrap();
        assert_eq!(equipment_id, EquipmentId(1));

        let requirement_id = ledger
            .compliance()
            .create_requirement(
                NewRequirement {
                    title: "Health Department Inspection".into(),
                    description: "Regular inspection required by local health department".into(),
                    equipment_type: "All Kitchen Equipment".into(),
                    frequency_days: Frequency::new(90).unwrap(),
                },
                &admin(),
            )
            .unwrap();
        let record_id = ledger
            .compliance()
            .record_inspection(
                NewInspection {
                    equipment_id,
                    requirement_id,
                    inspection_date: DayStamp(1675209600),
                    notes: "All equipment passed inspection".into(),
                    passed: true,
                },
                &admin(),
            )
            .unwrap();
        assert_eq!(record_id, ComplianceRecordId(1));
        assert_eq!(
            ledger.compliance().get_record(record_id).unwrap().unwrap().next_due_date,
            DayStamp(1675209690)
        );

        let schedule_id = ledger
            .maintenance()
            .create_schedule(
                NewSchedule {
                    equipment_id,
                    service_type: "Monthly Cleaning".into(),
                    frequency_days: Frequency::new(30).unwrap(),
                    initial_service_date: DayStamp(1672531200),
                },
                &admin(),
            )
            .unwrap();
        assert_eq!(
            ledger.maintenance().get_schedule(schedule_id).unwrap().unwrap().next_service_date,
            DayStamp(1672531230)
        );
        let service_id = ledger
            .maintenance()
            .record_service(
                schedule_id,
                NewService {
                    service_date: DayStamp(1675209600),
                    notes: "Cleaned all filters and surfaces".into(),
                    status: "completed".into(),
                },
                &admin(),
            )
            .unwrap();
        assert_eq!(service_id, ServiceRecordId(1));
        assert_eq!(
            ledger.maintenance().get_schedule(schedule_id).unwrap().unwrap().next_service_date,
            DayStamp(1675209630)
        );
    }

    #[test]
    fn in_memory_lifecycle() {
        exercise_lifecycle(&Ledger::in_memory(admin()));
    }

    #[cfg(feature = "sqlite")]
    #[test]
    fn sqlite_lifecycle_from_config() {
        let dir = tempfile::tempdir().unwrap();
        let db = dir.path().join("ledger.db");
        let db_str = db.to_string_lossy().into_owned();
        let cfg = Config::from_lookup(|key| match key {
            "LEDGER_ADMIN_PRINCIPAL" => Some(ADMIN.to_string()),
            "STORAGE_PROVIDER" => Some("sqlite".to_string()),
            "DB_PATH" => Some(db_str.clone()),
            _ => None,
        })
        .unwrap();

        let ledger = Ledger::open(&cfg).unwrap();
        exercise_lifecycle(&ledger);
        assert!(db.exists());
    }

    #[test]
    fn admin_comes_from_config() {
        let ledger = Ledger::in_memory(admin());
        assert_eq!(ledger.compliance().admin(), &admin());

        let intruder = Principal::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG").unwrap();
        let err = ledger
            .compliance()
            .create_requirement(
                NewRequirement {
                    title: "Health Department Inspection".into(),
                    description: String::new(),
                    equipment_type: "All Kitchen Equipment".into(),
                    frequency_days: Frequency::new(90).unwrap(),
                },
                &intruder,
            )
            .unwrap_err();
        assert_eq!(err, CoreError::Unauthorized);
    }

    #[test]
    fn stores_keep_independent_sequences() {
        let ledger = Ledger::in_memory(admin());
        ledger.equipment().register(oven(), &admin()).unwrap();
        ledger.equipment().register(oven(), &admin()).unwrap();

        // Schedules start at 1 regardless of how much equipment exists.
        let schedule_id = ledger
            .maintenance()
            .create_schedule(
                NewSchedule {
                    equipment_id: EquipmentId(2),
                    service_type: "Deep Fryer Oil Change".into(),
                    frequency_days: Frequency::new(7).unwrap(),
                    initial_service_date: DayStamp(19000),
                },
                &admin(),
            )
            .unwrap();
        assert_eq!(schedule_id, ScheduleId(1));
    }

    #[test]
    fn memory_provider_opens_without_touching_disk() {
        let cfg = Config::from_lookup(|key| match key {
            "LEDGER_ADMIN_PRINCIPAL" => Some(ADMIN.to_string()),
            "STORAGE_PROVIDER" => Some("memory".to_string()),
            "DB_PATH" => Some("/nonexistent/dir/ledger.db".to_string()),
            _ => None,
        })
        .unwrap();
        let ledger = Ledger::open(&cfg).unwrap();
        assert!(ledger.equipment().get(EquipmentId(1)).unwrap().is_none());
    }
}
