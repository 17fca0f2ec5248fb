// ABOUTME: Parcel lifecycle operations on top of the parcel store
// ABOUTME: Registration, status advancement, address changes and removal

use thiserror::Error;

use crate::db::{ParcelStore, StoreError};
use crate::models::{Parcel, ParcelStatus};

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("Parcel {number} has unknown status '{status}'")]
    UnknownStatus { number: i64, status: String },
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Store(e) if e.is_not_found())
    }
}

pub struct ParcelService {
    store: ParcelStore,
}

impl ParcelService {
    pub fn new(store: ParcelStore) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &ParcelStore {
        &self.store
    }

    /// Register a new parcel for a client. The returned parcel carries its assigned number.
    pub fn register(&self, client: i64, address: &str) -> Result<Parcel, ServiceError> {
        let mut parcel = Parcel::registered(client, address);
        parcel.number = self.store.add(&parcel)?;

        log::info!(
            "Registered parcel #{} for client {} to '{}' at {}",
            parcel.number,
            parcel.client,
            parcel.address,
            parcel.created_at
        );
        Ok(parcel)
    }

    pub fn get(&self, number: i64) -> Result<Parcel, ServiceError> {
        Ok(self.store.get(number)?)
    }

    pub fn client_parcels(&self, client: i64) -> Result<Vec<Parcel>, ServiceError> {
        let parcels = self.store.get_by_client(client)?;
        log::debug!("Client {} has {} parcel(s)", client, parcels.len());
        Ok(parcels)
    }

    /// Move a parcel to the next lifecycle state.
    ///
    /// Returns the new status, or `None` when the parcel is already delivered.
    pub fn next_status(&self, number: i64) -> Result<Option<ParcelStatus>, ServiceError> {
        let parcel = self.store.get(number)?;
        let current = parcel.status().ok_or_else(|| ServiceError::UnknownStatus {
            number,
            status: parcel.status.clone(),
        })?;

        let Some(next) = current.next() else {
            log::info!("Parcel #{} is already {}", number, current);
            return Ok(None);
        };

        self.store.set_status(number, next.as_str())?;
        log::info!("Parcel #{} moved from {} to {}", number, current, next);
        Ok(Some(next))
    }

    /// Change the address while the parcel is still registered. `false` means nothing changed.
    pub fn change_address(&self, number: i64, address: &str) -> Result<bool, ServiceError> {
        let changed = self.store.set_address(number, address)?;
        if changed {
            log::info!("Parcel #{} address changed to '{}'", number, address);
        } else {
            log::warn!(
                "Address of parcel #{} not changed: missing or no longer registered",
                number
            );
        }
        Ok(changed)
    }

    /// Delete a parcel while it is still registered. `false` means nothing was deleted.
    pub fn delete(&self, number: i64) -> Result<bool, ServiceError> {
        let deleted = self.store.delete(number)?;
        if deleted {
            log::info!("Parcel #{} deleted", number);
        } else {
            log::warn!(
                "Parcel #{} not deleted: missing or no longer registered",
                number
            );
        }
        Ok(deleted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> ParcelService {
        ParcelService::new(ParcelStore::open_in_memory().unwrap())
    }

    #[test]
    fn test_register() {
        let service = service();
        let parcel = service.register(1000, "Lenina 1").unwrap();

        assert_ne!(parcel.number, 0);
        assert_eq!(parcel.status(), Some(ParcelStatus::Registered));
        assert_eq!(service.get(parcel.number).unwrap(), parcel);
    }

    #[test]
    fn test_next_status_walks_lifecycle() {
        let service = service();
        let number = service.register(1, "addr").unwrap().number;

        assert_eq!(service.next_status(number).unwrap(), Some(ParcelStatus::Sent));
        assert_eq!(
            service.next_status(number).unwrap(),
            Some(ParcelStatus::Delivered)
        );
        assert_eq!(service.next_status(number).unwrap(), None);
        assert_eq!(service.get(number).unwrap().status, "delivered");
    }

    #[test]
    fn test_next_status_missing() {
        let service = service();
        assert!(service.next_status(77).unwrap_err().is_not_found());
    }

    #[test]
    fn test_next_status_unknown() {
        let service = service();
        let number = service.register(1, "addr").unwrap().number;
        service.store().set_status(number, "lost").unwrap();

        let err = service.next_status(number).unwrap_err();
        assert!(matches!(err, ServiceError::UnknownStatus { status, .. } if status == "lost"));
    }

    #[test]
    fn test_change_address_and_delete_only_while_registered() {
        let service = service();
        let number = service.register(5, "old").unwrap().number;

        assert!(service.change_address(number, "new").unwrap());
        service.next_status(number).unwrap();

        assert!(!service.change_address(number, "newer").unwrap());
        assert!(!service.delete(number).unwrap());
        assert_eq!(service.get(number).unwrap().address, "new");
    }

    #[test]
    fn test_client_parcels() {
        let service = service();
        let a = service.register(9, "a").unwrap();
        let b = service.register(9, "b").unwrap();
        service.register(10, "c").unwrap();

        let mut numbers: Vec<i64> = service
            .client_parcels(9)
            .unwrap()
            .into_iter()
            .map(|p| p.number)
            .collect();
        numbers.sort_unstable();
        assert_eq!(numbers, vec![a.number, b.number]);
    }
}
