use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{Bill, BillStatus, CommunityStore, CoreError, House, Request, RequestStatus, Service};

/// Simple in-memory store mirroring the SQLite table semantics: houses and
/// services ignore id conflicts, requests and bills append.
pub struct InMemoryStore {
    houses: Mutex<BTreeMap<u32, House>>,
    services: Mutex<BTreeMap<u32, Service>>,
    requests: Mutex<Vec<Request>>,
    bills: Mutex<Vec<Bill>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self {
            houses: Mutex::new(BTreeMap::new()),
            services: Mutex::new(BTreeMap::new()),
            requests: Mutex::new(Vec::new()),
            bills: Mutex::new(Vec::new()),
        }
    }

    pub fn house_count(&self) -> Result<usize, CoreError> {
        Ok(lock(&self.houses)?.len())
    }

    pub fn service_count(&self) -> Result<usize, CoreError> {
        Ok(lock(&self.services)?.len())
    }

    /// Stored rows for a house, if any.
    pub fn house(&self, house_id: u32) -> Result<Option<House>, CoreError> {
        Ok(lock(&self.houses)?.get(&house_id).cloned())
    }

    pub fn bills(&self) -> Result<Vec<Bill>, CoreError> {
        Ok(lock(&self.bills)?.clone())
    }

    pub fn requests(&self) -> Result<Vec<Request>, CoreError> {
        Ok(lock(&self.requests)?.clone())
    }
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(m: &Mutex<T>) -> Result<std::sync::MutexGuard<'_, T>, CoreError> {
    m.lock()
        .map_err(|_| CoreError::Repository("mutex poisoned".into()))
}

impl CommunityStore for InMemoryStore {
    fn insert_house(&self, house: &House) -> Result<(), CoreError> {
        lock(&self.houses)?
            .entry(house.id)
            .or_insert_with(|| house.clone());
        Ok(())
    }

    fn insert_service(&self, service: &Service) -> Result<(), CoreError> {
        lock(&self.services)?
            .entry(service.id)
            .or_insert_with(|| service.clone());
        Ok(())
    }

    fn insert_request(&self, request: &Request) -> Result<(), CoreError> {
        lock(&self.requests)?.push(request.clone());
        Ok(())
    }

    fn insert_bill(&self, bill: &Bill) -> Result<(), CoreError> {
        lock(&self.bills)?.push(bill.clone());
        Ok(())
    }

    fn update_bill_status(&self, bill_id: u32, status: BillStatus) -> Result<(), CoreError> {
        let mut bills = lock(&self.bills)?;
        for bill in bills.iter_mut().filter(|b| b.id == bill_id) {
            bill.status = status;
        }
        Ok(())
    }

    fn update_request_status(
        &self,
        request_id: u32,
        status: RequestStatus,
    ) -> Result<(), CoreError> {
        let mut requests = lock(&self.requests)?;
        for request in requests.iter_mut().filter(|r| r.id == request_id) {
            request.status = status;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_insert_ignores_conflicting_id() {
        let store = InMemoryStore::new();
        let mut first = House::new(1, "Ravi");
        first.add_resident("Anita");
        store.insert_house(&first).unwrap();
        store.insert_house(&House::new(1, "Someone Else")).unwrap();
        assert_eq!(store.house_count().unwrap(), 1);
        assert_eq!(store.house(1).unwrap().unwrap().owner, "Ravi");
    }

    #[test]
    fn service_insert_ignores_conflicting_id() {
        let store = InMemoryStore::new();
        store
            .insert_service(&Service::new(2, "Grocery Delivery", Some("FreshMart".into()), 200))
            .unwrap();
        store.insert_service(&Service::new(2, "Other", None, 1)).unwrap();
        store.insert_service(&Service::new(3, "Electrician", None, 700)).unwrap();
        assert_eq!(store.service_count().unwrap(), 2);
    }

    #[test]
    fn bill_status_update_and_missing_id() {
        let store = InMemoryStore::new();
        store.insert_bill(&Bill::new(1, 1, 500)).unwrap();
        store.update_bill_status(1, BillStatus::Paid).unwrap();
        store.update_bill_status(42, BillStatus::Paid).unwrap();
        let bills = store.bills().unwrap();
        assert_eq!(bills.len(), 1);
        assert_eq!(bills[0].status, BillStatus::Paid);
    }

    #[test]
    fn request_status_update() {
        let store = InMemoryStore::new();
        let h = House::new(1, "Ravi");
        let s = Service::new(1, "Plumbing", None, 500);
        store.insert_request(&Request::new(1, &h, &s)).unwrap();
        store.update_request_status(1, RequestStatus::Completed).unwrap();
        assert_eq!(store.requests().unwrap()[0].status, RequestStatus::Completed);
    }
}
