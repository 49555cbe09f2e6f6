use tracing::{info, warn};

use crate::{
    ComplianceRecord, ComplianceRecordId, ComplianceRepository, ComplianceRequirement, CoreError,
    NewInspection, NewRequirement, Principal, RequirementId,
};

/// Registry of compliance requirements and the inspections recorded against
/// them.
///
/// Requirements may only be defined by the admin principal fixed at
/// construction. Inspections may be recorded by anyone, but only against a
/// requirement that exists; each one projects its own next due date from the
/// requirement's frequency. The `equipment_id` on an inspection is a weak
/// reference and is not checked against the equipment registry.
pub struct ComplianceRegistry<R: ComplianceRepository> {
    repo: R,
    admin: Principal,
}

impl<R: ComplianceRepository> ComplianceRegistry<R> {
    pub fn new(repo: R, admin: Principal) -> Self {
        Self { repo, admin }
    }

    pub fn admin(&self) -> &Principal {
        &self.admin
    }

    /// Define a new requirement. Only the admin may do this; anyone else gets
    /// `Unauthorized` and the store is left exactly as it was.
    pub fn create_requirement(
        &self,
        input: NewRequirement,
        caller: &Principal,
    ) -> Result<RequirementId, CoreError> {
        if caller != &self.admin {
            warn!(caller = %caller, "requirement creation denied: caller is not admin");
            return Err(CoreError::Unauthorized);
        }
        let frequency = input.frequency_days;
        let requirement = ComplianceRequirement::new(input, caller.clone());
        let id = self.repo.insert_requirement(requirement)?;
        info!(
            requirement_id = %id,
            frequency_days = frequency.days(),
            "compliance requirement created"
        );
        Ok(id)
    }

    pub fn get_requirement(
        &self,
        id: RequirementId,
    ) -> Result<Option<ComplianceRequirement>, CoreError> {
        self.repo.get_requirement(id)
    }

    /// Record an inspection by `caller` and return the new record id.
    pub fn record_inspection(
        &self,
        input: NewInspection,
        caller: &Principal,
    ) -> Result<ComplianceRecordId, CoreError> {
        let requirement_id = input.requirement_id;
        match self.repo.append_inspection(input, caller.clone()) {
            Ok((id, record)) => {
                info!(
                    record_id = %id,
                    requirement_id = %requirement_id,
                    equipment_id = %record.equipment_id,
                    passed = record.passed,
                    next_due_date = %record.next_due_date,
                    "inspection recorded"
                );
                Ok(id)
            }
            Err(err @ CoreError::UnknownRequirement(_)) => {
                warn!(requirement_id = %requirement_id, "inspection rejected: unknown requirement");
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    pub fn get_record(&self, id: ComplianceRecordId) -> Result<Option<ComplianceRecord>, CoreError> {
        self.repo.get_record(id)
    }
}
