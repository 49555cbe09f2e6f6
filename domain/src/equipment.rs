use tracing::info;

use crate::{CoreError, Equipment, EquipmentId, EquipmentRepository, NewEquipment, Principal};

/// Registry of physical equipment. Records are immutable once registered.
pub struct EquipmentRegistry<R: EquipmentRepository> {
    repo: R,
}

impl<R: EquipmentRepository> EquipmentRegistry<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Register equipment owned by `caller` and return its id. Fields are
    /// opaque to the ledger and are stored as given.
    pub fn register(
        &self,
        input: NewEquipment,
        caller: &Principal,
    ) -> Result<EquipmentId, CoreError> {
        let equipment = Equipment::new(input, caller.clone());
        let id = self.repo.insert(equipment)?;
        info!(equipment_id = %id, owner = %caller, "equipment registered");
        Ok(id)
    }

    pub fn get(&self, id: EquipmentId) -> Result<Option<Equipment>, CoreError> {
        self.repo.get(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory_repo::InMemoryRepo;
    use crate::DayStamp;

    fn caller() -> Principal {
        Principal::new("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM").unwrap()
    }

    fn oven() -> NewEquipment {
        NewEquipment {
            name: "Convection Oven".to_string(),
            equipment_type: "Cooking Equipment".to_string(),
            manufacturer: "KitchenTech".to_string(),
            model: "Pro5000".to_string(),
            serial_number: "OVEN12345".to_string(),
            installation_date: DayStamp(1672531200),
            warranty_expiration: DayStamp(1767225600),
        }
    }

    fn fridge() -> NewEquipment {
        NewEquipment {
            name: "Commercial Refrigerator".to_string(),
            equipment_type: "Refrigeration".to_string(),
            manufacturer: "CoolCo".to_string(),
            model: "Chill500".to_string(),
            serial_number: "FRIDGE6789".to_string(),
            installation_date: DayStamp(1672531200),
            warranty_expiration: DayStamp(1767225600),
        }
    }

    #[test]
    fn register_stores_all_fields() {
        let reg = EquipmentRegistry::new(InMemoryRepo::new());
        let id = reg.register(oven(), &caller()).unwrap();
        assert_eq!(id, EquipmentId(1));

        let stored = reg.get(id).unwrap().expect("registered");
        assert_eq!(stored.name, "Convection Oven");
        assert_eq!(stored.equipment_type, "Cooking Equipment");
        assert_eq!(stored.serial_number, "OVEN12345");
        assert_eq!(stored.warranty_expiration, DayStamp(1767225600));
        assert_eq!(stored.owner, caller());
    }

    #[test]
    fn register_increments_ids() {
        let reg = EquipmentRegistry::new(InMemoryRepo::new());
        let first = reg.register(oven(), &caller()).unwrap();
        let second = reg.register(fridge(), &caller()).unwrap();
        assert_eq!(first, EquipmentId(1));
        assert_eq!(second, EquipmentId(2));

        assert_eq!(reg.get(first).unwrap().unwrap().name, "Convection Oven");
        assert_eq!(reg.get(second).unwrap().unwrap().name, "Commercial Refrigerator");
    }

    #[test]
    fn get_missing_is_absent_not_error() {
        let reg = EquipmentRegistry::new(InMemoryRepo::new());
        assert_eq!(reg.get(EquipmentId(999)).unwrap(), None);
    }

    #[test]
    fn owner_is_the_caller() {
        let reg = EquipmentRegistry::new(InMemoryRepo::new());
        let other = Principal::new("ST2CY5V39NHDPWSXMW9QDT3HC3GD6Q6XX4CFRK9AG").unwrap();
        let id = reg.register(oven(), &other).unwrap();
        assert_eq!(reg.get(id).unwrap().unwrap().owner, other);
    }
}
