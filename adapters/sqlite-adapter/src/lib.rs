//! sqlite-adapter: SQLite implementation of the ledger's storage ports.
//!
//! Purpose
//! - Provide a durable, file-based backend for the three stores
//!   (equipment, compliance, maintenance).
//! - Implements `EquipmentRepository`, `ComplianceRepository` and
//!   `ServiceRepository` from the `domain` crate.
//!
//! Notes
//! - Uses `rusqlite` with the `bundled` feature for portability.
//! - One table per entity kind plus a `counters` table holding the last id
//!   issued per entity kind. Every write bumps its counter and inserts its
//!   row inside one transaction, so a failed write never consumes an id.
//! - Dates and ids are `u64` in the domain and stored as `INTEGER` (i64);
//!   the cast is bit-preserving in both directions.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use domain::{
    ComplianceRecord, ComplianceRecordId, ComplianceRepository, ComplianceRequirement, CoreError,
    DayStamp, Equipment, EquipmentId, EquipmentRepository, Frequency, MaintenanceSchedule,
    NewInspection, NewService, Principal, RequirementId, ScheduleId, ServiceRecord,
    ServiceRecordId, ServiceRepository,
};
use rusqlite::{params, Connection};
use tracing::debug;

const EQUIPMENT_COUNTER: &str = "equipment";
const REQUIREMENT_COUNTER: &str = "compliance_requirement";
const COMPLIANCE_RECORD_COUNTER: &str = "compliance_record";
const SCHEDULE_COUNTER: &str = "maintenance_schedule";
const SERVICE_RECORD_COUNTER: &str = "service_record";

/// SQLite-backed repository for all three stores.
pub struct SqliteRepo {
    conn: Mutex<Connection>,
}

impl SqliteRepo {
    /// Open (or create) a SQLite database at the given path and ensure schema.
    /// Missing parent directories are created.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self, CoreError> {
        let path = path.as_ref();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .map_err(|e| CoreError::Repository(format!("create {}: {e}", dir.display())))?;
        }
        let conn = Connection::open(path).map_err(map_sqerr)?;
        init_schema(&conn)?;
        debug!(path = %path.display(), "sqlite ledger schema ready");
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, CoreError> {
        self.conn
            .lock()
            .map_err(|_| CoreError::Repository("mutex poisoned".into()))
    }
}

fn init_schema(conn: &Connection) -> Result<(), CoreError> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS counters (
            name TEXT PRIMARY KEY,
            value INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS equipment (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL,
            equipment_type TEXT NOT NULL,
            manufacturer TEXT NOT NULL,
            model TEXT NOT NULL,
            serial_number TEXT NOT NULL,
            installation_date INTEGER NOT NULL,
            warranty_expiration INTEGER NOT NULL,
            owner TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS compliance_requirements (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL,
            description TEXT NOT NULL,
            equipment_type TEXT NOT NULL,
            frequency_days INTEGER NOT NULL,
            is_active INTEGER NOT NULL DEFAULT 1,
            created_by TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS compliance_records (
            id INTEGER PRIMARY KEY,
            equipment_id INTEGER NOT NULL,
            requirement_id INTEGER NOT NULL,
            inspection_date INTEGER NOT NULL,
            inspector TEXT NOT NULL,
            notes TEXT NOT NULL,
            passed INTEGER NOT NULL,
            next_due_date INTEGER NOT NULL
        );
        CREATE TABLE IF NOT EXISTS maintenance_schedules (
            id INTEGER PRIMARY KEY,
            equipment_id INTEGER NOT NULL,
            service_type TEXT NOT NULL,
            frequency_days INTEGER NOT NULL,
            last_service_date INTEGER NOT NULL,
            next_service_date INTEGER NOT NULL,
            created_by TEXT NOT NULL
        );
        CREATE TABLE IF NOT EXISTS service_records (
            id INTEGER PRIMARY KEY,
            equipment_id INTEGER NOT NULL,
            schedule_id INTEGER NOT NULL,
            service_date INTEGER NOT NULL,
            service_type TEXT NOT NULL,
            technician TEXT NOT NULL,
            notes TEXT NOT NULL,
            status TEXT NOT NULL
        );
        CREATE INDEX IF NOT EXISTS idx_compliance_records_requirement ON compliance_records(requirement_id);
        CREATE INDEX IF NOT EXISTS idx_service_records_schedule ON service_records(schedule_id);
        "#,
    )
    .map_err(map_sqerr)
}

fn map_sqerr<E: std::fmt::Display>(e: E) -> CoreError {
    CoreError::Repository(format!("sqlite error: {e}"))
}

/// Bump the named counter and return the id it now holds. Must run inside the
/// same transaction as the insert that uses the id.
fn next_id(conn: &Connection, name: &str) -> Result<u64, CoreError> {
    conn.execute(
        "INSERT OR IGNORE INTO counters(name, value) VALUES(?1, 0)",
        params![name],
    )
    .map_err(map_sqerr)?;
    conn.execute(
        "UPDATE counters SET value = value + 1 WHERE name = ?1",
        params![name],
    )
    .map_err(map_sqerr)?;
    conn.query_row(
        "SELECT value FROM counters WHERE name = ?1",
        params![name],
        |row| row.get::<_, i64>(0),
    )
    .map(|v| v as u64)
    .map_err(map_sqerr)
}

fn principal_col(row: &rusqlite::Row, idx: usize) -> Result<Principal, CoreError> {
    let raw: String = row.get(idx).map_err(map_sqerr)?;
    Principal::new(raw).map_err(|_| CoreError::Repository("bad principal in db".into()))
}

fn frequency_col(row: &rusqlite::Row, idx: usize) -> Result<Frequency, CoreError> {
    let raw: i64 = row.get(idx).map_err(map_sqerr)?;
    let days = u32::try_from(raw)
        .map_err(|_| CoreError::Repository(format!("bad frequency in db: {raw}")))?;
    Frequency::new(days).map_err(|_| CoreError::Repository("zero frequency in db".into()))
}

fn u64_col(row: &rusqlite::Row, idx: usize) -> Result<u64, CoreError> {
    row.get::<_, i64>(idx).map(|v| v as u64).map_err(map_sqerr)
}

/// Run `sql` with a single id parameter and map the first row, if any.
fn query_one<T>(
    conn: &Connection,
    sql: &str,
    id: u64,
    map: fn(&rusqlite::Row) -> Result<T, CoreError>,
) -> Result<Option<T>, CoreError> {
    let mut stmt = conn.prepare(sql).map_err(map_sqerr)?;
    let mut rows = stmt.query(params![id as i64]).map_err(map_sqerr)?;
    match rows.next().map_err(map_sqerr)? {
        Some(row) => Ok(Some(map(row)?)),
        None => Ok(None),
    }
}

// ============ EquipmentRepository ============

fn row_to_equipment(row: &rusqlite::Row) -> Result<Equipment, CoreError> {
    Ok(Equipment {
        name: row.get(0).map_err(map_sqerr)?,
        equipment_type: row.get(1).map_err(map_sqerr)?,
        manufacturer: row.get(2).map_err(map_sqerr)?,
        model: row.get(3).map_err(map_sqerr)?,
        serial_number: row.get(4).map_err(map_sqerr)?,
        installation_date: DayStamp(u64_col(row, 5)?),
        warranty_expiration: DayStamp(u64_col(row, 6)?),
        owner: principal_col(row, 7)?,
    })
}

impl EquipmentRepository for SqliteRepo {
    fn insert(&self, equipment: Equipment) -> Result<EquipmentId, CoreError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(map_sqerr)?;
        let id = next_id(&tx, EQUIPMENT_COUNTER)?;
        tx.execute(
            "INSERT INTO equipment(id, name, equipment_type, manufacturer, model, serial_number, installation_date, warranty_expiration, owner) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                id as i64,
                equipment.name,
                equipment.equipment_type,
                equipment.manufacturer,
                equipment.model,
                equipment.serial_number,
                equipment.installation_date.get() as i64,
                equipment.warranty_expiration.get() as i64,
                equipment.owner.as_str(),
            ],
        )
        .map_err(map_sqerr)?;
        tx.commit().map_err(map_sqerr)?;
        Ok(EquipmentId(id))
    }

    fn get(&self, id: EquipmentId) -> Result<Option<Equipment>, CoreError> {
        let conn = self.lock()?;
        query_one(
            &conn,
            "SELECT name, equipment_type, manufacturer, model, serial_number, installation_date, warranty_expiration, owner FROM equipment WHERE id = ?1",
            id.get(),
            row_to_equipment,
        )
    }
}

// ============ ComplianceRepository ============

const SELECT_REQUIREMENT: &str = "SELECT title, description, equipment_type, frequency_days, is_active, created_by FROM compliance_requirements WHERE id = ?1";

fn row_to_requirement(row: &rusqlite::Row) -> Result<ComplianceRequirement, CoreError> {
    let is_active: i64 = row.get(4).map_err(map_sqerr)?;
    Ok(ComplianceRequirement {
        title: row.get(0).map_err(map_sqerr)?,
        description: row.get(1).map_err(map_sqerr)?,
        equipment_type: row.get(2).map_err(map_sqerr)?,
        frequency_days: frequency_col(row, 3)?,
        is_active: is_active != 0,
        created_by: principal_col(row, 5)?,
    })
}

fn row_to_compliance_record(row: &rusqlite::Row) -> Result<ComplianceRecord, CoreError> {
    let passed: i64 = row.get(5).map_err(map_sqerr)?;
    Ok(ComplianceRecord {
        equipment_id: EquipmentId(u64_col(row, 0)?),
        requirement_id: RequirementId(u64_col(row, 1)?),
        inspection_date: DayStamp(u64_col(row, 2)?),
        inspector: principal_col(row, 3)?,
        notes: row.get(4).map_err(map_sqerr)?,
        passed: passed != 0,
        next_due_date: DayStamp(u64_col(row, 6)?),
    })
}

impl ComplianceRepository for SqliteRepo {
    fn insert_requirement(
        &self,
        requirement: ComplianceRequirement,
    ) -> Result<RequirementId, CoreError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(map_sqerr)?;
        let id = next_id(&tx, REQUIREMENT_COUNTER)?;
        tx.execute(
            "INSERT INTO compliance_requirements(id, title, description, equipment_type, frequency_days, is_active, created_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id as i64,
                requirement.title,
                requirement.description,
                requirement.equipment_type,
                requirement.frequency_days.days() as i64,
                requirement.is_active as i64,
                requirement.created_by.as_str(),
            ],
        )
        .map_err(map_sqerr)?;
        tx.commit().map_err(map_sqerr)?;
        Ok(RequirementId(id))
    }

    fn get_requirement(
        &self,
        id: RequirementId,
    ) -> Result<Option<ComplianceRequirement>, CoreError> {
        let conn = self.lock()?;
        query_one(&conn, SELECT_REQUIREMENT, id.get(), row_to_requirement)
    }

    fn append_inspection(
        &self,
        input: NewInspection,
        inspector: Principal,
    ) -> Result<(ComplianceRecordId, ComplianceRecord), CoreError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(map_sqerr)?;
        let requirement = query_one(
            &tx,
            SELECT_REQUIREMENT,
            input.requirement_id.get(),
            row_to_requirement,
        )?
        .ok_or(CoreError::UnknownRequirement(input.requirement_id))?;
        let record = ComplianceRecord::project(input, &requirement, inspector)?;
        let id = next_id(&tx, COMPLIANCE_RECORD_COUNTER)?;
        tx.execute(
            "INSERT INTO compliance_records(id, equipment_id, requirement_id, inspection_date, inspector, notes, passed, next_due_date) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id as i64,
                record.equipment_id.get() as i64,
                record.requirement_id.get() as i64,
                record.inspection_date.get() as i64,
                record.inspector.as_str(),
                record.notes,
                record.passed as i64,
                record.next_due_date.get() as i64,
            ],
        )
        .map_err(map_sqerr)?;
        tx.commit().map_err(map_sqerr)?;
        Ok((ComplianceRecordId(id), record))
    }

    fn get_record(&self, id: ComplianceRecordId) -> Result<Option<ComplianceRecord>, CoreError> {
        let conn = self.lock()?;
        query_one(
            &conn,
            "SELECT equipment_id, requirement_id, inspection_date, inspector, notes, passed, next_due_date FROM compliance_records WHERE id = ?1",
            id.get(),
            row_to_compliance_record,
        )
    }
}

// ============ ServiceRepository ============

const SELECT_SCHEDULE: &str = "SELECT equipment_id, service_type, frequency_days, last_service_date, next_service_date, created_by FROM maintenance_schedules WHERE id = ?1";

fn row_to_schedule(row: &rusqlite::Row) -> Result<MaintenanceSchedule, CoreError> {
    Ok(MaintenanceSchedule {
        equipment_id: EquipmentId(u64_col(row, 0)?),
        service_type: row.get(1).map_err(map_sqerr)?,
        frequency_days: frequency_col(row, 2)?,
        last_service_date: DayStamp(u64_col(row, 3)?),
        next_service_date: DayStamp(u64_col(row, 4)?),
        created_by: principal_col(row, 5)?,
    })
}

fn row_to_service_record(row: &rusqlite::Row) -> Result<ServiceRecord, CoreError> {
    Ok(ServiceRecord {
        equipment_id: EquipmentId(u64_col(row, 0)?),
        schedule_id: ScheduleId(u64_col(row, 1)?),
        service_date: DayStamp(u64_col(row, 2)?),
        service_type: row.get(3).map_err(map_sqerr)?,
        technician: principal_col(row, 4)?,
        notes: row.get(5).map_err(map_sqerr)?,
        status: row.get(6).map_err(map_sqerr)?,
    })
}

impl ServiceRepository for SqliteRepo {
    fn insert_schedule(&self, schedule: MaintenanceSchedule) -> Result<ScheduleId, CoreError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(map_sqerr)?;
        let id = next_id(&tx, SCHEDULE_COUNTER)?;
        tx.execute(
            "INSERT INTO maintenance_schedules(id, equipment_id, service_type, frequency_days, last_service_date, next_service_date, created_by) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                id as i64,
                schedule.equipment_id.get() as i64,
                schedule.service_type,
                schedule.frequency_days.days() as i64,
                schedule.last_service_date.get() as i64,
                schedule.next_service_date.get() as i64,
                schedule.created_by.as_str(),
            ],
        )
        .map_err(map_sqerr)?;
        tx.commit().map_err(map_sqerr)?;
        Ok(ScheduleId(id))
    }

    fn get_schedule(&self, id: ScheduleId) -> Result<Option<MaintenanceSchedule>, CoreError> {
        let conn = self.lock()?;
        query_one(&conn, SELECT_SCHEDULE, id.get(), row_to_schedule)
    }

    fn append_service(
        &self,
        schedule_id: ScheduleId,
        input: NewService,
        technician: Principal,
    ) -> Result<(ServiceRecordId, ServiceRecord), CoreError> {
        let conn = self.lock()?;
        let tx = conn.unchecked_transaction().map_err(map_sqerr)?;
        let mut schedule = query_one(&tx, SELECT_SCHEDULE, schedule_id.get(), row_to_schedule)?
            .ok_or(CoreError::UnknownSchedule(schedule_id))?;
        schedule.roll_forward(input.service_date)?;
        let record = ServiceRecord::from_schedule(schedule_id, &schedule, input, technician);
        let id = next_id(&tx, SERVICE_RECORD_COUNTER)?;
        tx.execute(
            "UPDATE maintenance_schedules SET last_service_date = ?1, next_service_date = ?2 WHERE id = ?3",
            params![
                schedule.last_service_date.get() as i64,
                schedule.next_service_date.get() as i64,
                schedule_id.get() as i64,
            ],
        )
        .map_err(map_sqerr)?;
        tx.execute(
            "INSERT INTO service_records(id, equipment_id, schedule_id, service_date, service_type, technician, notes, status) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                id as i64,
                record.equipment_id.get() as i64,
                record.schedule_id.get() as i64,
                record.service_date.get() as i64,
                record.service_type,
                record.technician.as_str(),
                record.notes,
                record.status,
            ],
        )
        .map_err(map_sqerr)?;
        tx.commit().map_err(map_sqerr)?;
        Ok((ServiceRecordId(id), record))
    }

    fn get_record(&self, id: ServiceRecordId) -> Result<Option<ServiceRecord>, CoreError> {
        let conn = self.lock()?;
        query_one(
            &conn,
            "SELECT equipment_id, schedule_id, service_date, service_type, technician, notes, status FROM service_records WHERE id = ?1",
            id.get(),
            row_to_service_record,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::{NewEquipment, NewRequirement, NewSchedule};

    fn tmp_db() -> (SqliteRepo, tempfile::TempDir) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("t.db");
        let repo = SqliteRepo::new(path).unwrap();
        (repo, dir)
    }

    fn admin() -> Principal {
        Principal::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap()
    }

    fn oven() -> Equipment {
        Equipment::new(
            NewEquipment {
                name: "Convection Oven".into(),
                equipment_type: "Cooking Equipment".into(),
                manufacturer: "KitchenTech".into(),
                model: "Pro5000".into(),
                serial_number: "OVEN12345".into(),
                installation_date: DayStamp(1672531200),
                warranty_expiration: DayStamp(1767225600),
            },
            admin(),
        )
    }

    fn health_inspection() -> ComplianceRequirement {
        ComplianceRequirement::new(
            NewRequirement {
                title: "Health Department Inspection".into(),
                description: "Regular inspection required by local health department".into(),
                equipment_type: "All Kitchen Equipment".into(),
                frequency_days: Frequency::new(90).unwrap(),
            },
            admin(),
        )
    }

    fn monthly_cleaning() -> MaintenanceSchedule {
        MaintenanceSchedule::new(
            NewSchedule {
                equipment_id: EquipmentId(1),
                service_type: "Monthly Cleaning".into(),
                frequency_days: Frequency::new(30).unwrap(),
                initial_service_date: DayStamp(1672531200),
            },
            admin(),
        )
        .unwrap()
    }

    fn cleaning_done(date: u64) -> NewService {
        NewService {
            service_date: DayStamp(date),
            notes: "Cleaned all filters and surfaces".into(),
            status: "completed".into(),
        }
    }

    #[test]
    fn equipment_insert_get_roundtrip() {
        let (repo, _dir) = tmp_db();
        let first = repo.insert(oven()).unwrap();
        let second = repo.insert(oven()).unwrap();
        assert_eq!((first, second), (EquipmentId(1), EquipmentId(2)));

        let got = repo.get(first).unwrap().unwrap();
        assert_eq!(got, oven());
        assert!(repo.get(EquipmentId(3)).unwrap().is_none());
    }

    #[test]
    fn inspection_projects_next_due_date() {
        let (repo, _dir) = tmp_db();
        let req_id = repo.insert_requirement(health_inspection()).unwrap();
        assert_eq!(req_id, RequirementId(1));
        assert_eq!(repo.get_requirement(req_id).unwrap(), Some(health_inspection()));

        let (id, record) = repo
            .append_inspection(
                NewInspection {
                    equipment_id: EquipmentId(1),
                    requirement_id: req_id,
                    inspection_date: DayStamp(1675209600),
                    notes: "All equipment passed inspection".into(),
                    passed: true,
                },
                admin(),
            )
            .unwrap();
        assert_eq!(id, ComplianceRecordId(1));
        assert_eq!(record.next_due_date, DayStamp(1675209690));
        assert_eq!(ComplianceRepository::get_record(&repo, id).unwrap(), Some(record));
    }

    #[test]
    fn unknown_requirement_rolls_back_counter() {
        let (repo, _dir) = tmp_db();
        let input = NewInspection {
            equipment_id: EquipmentId(1),
            requirement_id: RequirementId(999),
            inspection_date: DayStamp(1675209600),
            notes: "Notes".into(),
            passed: true,
        };
        let err = repo.append_inspection(input.clone(), admin()).unwrap_err();
        assert_eq!(err, CoreError::UnknownRequirement(RequirementId(999)));

        let req_id = repo.insert_requirement(health_inspection()).unwrap();
        let (id, _) = repo
            .append_inspection(
                NewInspection {
                    requirement_id: req_id,
                    ..input
                },
                admin(),
            )
            .unwrap();
        assert_eq!(id, ComplianceRecordId(1));
    }

    #[test]
    fn service_rolls_schedule_forward() {
        let (repo, _dir) = tmp_db();
        let schedule_id = repo.insert_schedule(monthly_cleaning()).unwrap();
        assert_eq!(
            repo.get_schedule(schedule_id).unwrap().unwrap().next_service_date,
            DayStamp(1672531230)
        );

        let (id, record) = repo
            .append_service(schedule_id, cleaning_done(1675209600), admin())
            .unwrap();
        assert_eq!(id, ServiceRecordId(1));
        assert_eq!(record.service_type, "Monthly Cleaning");
        assert_eq!(ServiceRepository::get_record(&repo, id).unwrap(), Some(record));

        let schedule = repo.get_schedule(schedule_id).unwrap().unwrap();
        assert_eq!(schedule.last_service_date, DayStamp(1675209600));
        assert_eq!(schedule.next_service_date, DayStamp(1675209630));
    }

    #[test]
    fn unknown_schedule_touches_nothing() {
        let (repo, _dir) = tmp_db();
        let err = repo
            .append_service(ScheduleId(999), cleaning_done(1675209600), admin())
            .unwrap_err();
        assert_eq!(err, CoreError::UnknownSchedule(ScheduleId(999)));
        assert!(ServiceRepository::get_record(&repo, ServiceRecordId(1))
            .unwrap()
            .is_none());

        let schedule_id = repo.insert_schedule(monthly_cleaning()).unwrap();
        let (id, _) = repo
            .append_service(schedule_id, cleaning_done(1675209600), admin())
            .unwrap();
        assert_eq!(id, ServiceRecordId(1));
    }

    #[test]
    fn large_dates_survive_the_integer_column() {
        let (repo, _dir) = tmp_db();
        let schedule_id = repo.insert_schedule(monthly_cleaning()).unwrap();
        let date = u64::MAX - 30;
        repo.append_service(schedule_id, cleaning_done(date), admin())
            .unwrap();
        let schedule = repo.get_schedule(schedule_id).unwrap().unwrap();
        assert_eq!(schedule.last_service_date, DayStamp(date));
        assert_eq!(schedule.next_service_date, DayStamp(u64::MAX));
    }

    #[test]
    fn state_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("ledger.db");
        {
            let repo = SqliteRepo::new(&path).unwrap();
            repo.insert(oven()).unwrap();
            let schedule_id = repo.insert_schedule(monthly_cleaning()).unwrap();
            repo.append_service(schedule_id, cleaning_done(1675209600), admin())
                .unwrap();
        }

        let repo = SqliteRepo::new(&path).unwrap();
        assert_eq!(repo.insert(oven()).unwrap(), EquipmentId(2));
        let schedule = repo.get_schedule(ScheduleId(1)).unwrap().unwrap();
        assert_eq!(schedule.next_service_date, DayStamp(1675209630));
        let (id, _) = repo
            .append_service(ScheduleId(1), cleaning_done(1677628800), admin())
            .unwrap();
        assert_eq!(id, ServiceRecordId(2));
    }
}
