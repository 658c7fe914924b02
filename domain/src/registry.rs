//! In-memory registry of houses, services, requests, and bills.

use serde::Serialize;

use crate::{Bill, CoreError, House, Request, Service};

/// Which lookup failed when a service request could not be raised.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum LookupMiss {
    House,
    Service,
    HouseAndService,
}

/// Result of [`Community::request_service`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RequestOutcome {
    Found { request: Request, bill: Bill },
    NotFound { reason: LookupMiss },
}

impl RequestOutcome {
    pub fn is_found(&self) -> bool {
        matches!(self, RequestOutcome::Found { .. })
    }
}

/// Result of [`Community::pay_bill`] for a bill that exists.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Payment {
    Paid(Bill),
    AlreadyPaid(Bill),
}

impl Payment {
    pub fn bill(&self) -> &Bill {
        match self {
            Payment::Paid(b) | Payment::AlreadyPaid(b) => b,
        }
    }
}

/// The community registry. Source of truth at runtime.
///
/// Houses and services are not deduplicated by id; every lookup returns the
/// first match. Request and bill ids come from counters owned by this
/// instance and start at 1.
#[derive(Debug)]
pub struct Community {
    name: String,
    houses: Vec<House>,
    services: Vec<Service>,
    requests: Vec<Request>,
    bills: Vec<Bill>,
    next_request_id: u32,
    next_bill_id: u32,
}

impl Community {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            houses: Vec::new(),
            services: Vec::new(),
            requests: Vec::new(),
            bills: Vec::new(),
            next_request_id: 1,
            next_bill_id: 1,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_house(&mut self, house: House) {
        self.houses.push(house);
    }

    pub fn add_service(&mut self, service: Service) {
        self.services.push(service);
    }

    /// Append a resident to the first house with `house_id`.
    ///
    /// Registry only: the stored house row keeps the residents it was first
    /// inserted with, since house inserts ignore conflicts.
    pub fn add_resident<S: Into<String>>(&mut self, house_id: u32, name: S) -> Result<(), CoreError> {
        let house = self
            .houses
            .iter_mut()
            .find(|h| h.id == house_id)
            .ok_or(CoreError::NotFound)?;
        house.add_resident(name);
        Ok(())
    }

    pub fn house(&self, house_id: u32) -> Option<&House> {
        self.houses.iter().find(|h| h.id == house_id)
    }

    pub fn service(&self, service_id: u32) -> Option<&Service> {
        self.services.iter().find(|s| s.id == service_id)
    }

    /// Raise a request for `service_id` on behalf of `house_id`, billing the
    /// service's current cost.
    pub fn request_service(&mut self, house_id: u32, service_id: u32) -> RequestOutcome {
        let (house, service) = match (self.house(house_id), self.service(service_id)) {
            (Some(h), Some(s)) => (h, s),
            (None, Some(_)) => {
                return RequestOutcome::NotFound {
                    reason: LookupMiss::House,
                }
            }
            (Some(_), None) => {
                return RequestOutcome::NotFound {
                    reason: LookupMiss::Service,
                }
            }
            (None, None) => {
                return RequestOutcome::NotFound {
                    reason: LookupMiss::HouseAndService,
                }
            }
        };

        let request = Request::new(self.next_request_id, house, service);
        let bill = Bill::new(self.next_bill_id, house.id, service.cost);
        self.next_request_id += 1;
        self.next_bill_id += 1;
        self.requests.push(request.clone());
        self.bills.push(bill.clone());
        RequestOutcome::Found { request, bill }
    }

    /// Pay a bill. Paying an already-paid bill is a reported no-op.
    pub fn pay_bill(&mut self, bill_id: u32) -> Result<Payment, CoreError> {
        let bill = self
            .bills
            .iter_mut()
            .find(|b| b.id == bill_id)
            .ok_or(CoreError::NotFound)?;
        if bill.pay() {
            Ok(Payment::Paid(bill.clone()))
        } else {
            Ok(Payment::AlreadyPaid(bill.clone()))
        }
    }

    pub fn complete_request(&mut self, request_id: u32) -> Result<Request, CoreError> {
        let request = self
            .requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or(CoreError::NotFound)?;
        request.complete();
        Ok(request.clone())
    }

    pub fn houses(&self) -> &[House] {
        &self.houses
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn requests(&self) -> &[Request] {
        &self.requests
    }

    pub fn bills(&self) -> &[Bill] {
        &self.bills
    }

    /// Bills raised for `house_id`, in creation order.
    pub fn bills_for_house(&self, house_id: u32) -> Vec<&Bill> {
        self.bills.iter().filter(|b| b.house_id == house_id).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{BillStatus, RequestStatus};

    fn seeded() -> Community {
        let mut c = Community::new("Test Enclave");
        c.add_house(House::new(1, "Rajesh"));
        c.add_house(House::new(2, "Priya"));
        c.add_service(Service::new(1, "Plumbing", None, 200));
        c.add_service(Service::new(2, "Electrician", None, 250));
        c
    }

    #[test]
    fn request_then_pay_scenario() {
        let mut c = seeded();

        let RequestOutcome::Found { request, bill } = c.request_service(1, 1) else {
            panic!("expected a request");
        };
        assert_eq!(request.id, 1);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(bill.id, 1);
        assert_eq!(bill.amount, 200);
        assert_eq!(bill.status, BillStatus::Unpaid);

        let payment = c.pay_bill(1).unwrap();
        assert!(matches!(payment, Payment::Paid(_)));
        assert_eq!(payment.bill().status, BillStatus::Paid);

        assert_eq!(
            c.request_service(99, 1),
            RequestOutcome::NotFound {
                reason: LookupMiss::House
            }
        );
        assert!(c.bills_for_house(2).is_empty());
    }

    #[test]
    fn request_service_reports_which_lookup_missed() {
        let mut c = seeded();
        assert_eq!(
            c.request_service(1, 42),
            RequestOutcome::NotFound {
                reason: LookupMiss::Service
            }
        );
        assert_eq!(
            c.request_service(7, 42),
            RequestOutcome::NotFound {
                reason: LookupMiss::HouseAndService
            }
        );
        assert!(c.requests().is_empty());
        assert!(c.bills().is_empty());
    }

    #[test]
    fn every_found_request_bills_the_service_cost() {
        let mut c = seeded();
        for house_id in [1, 2] {
            for service_id in [1, 2] {
                let outcome = c.request_service(house_id, service_id);
                let RequestOutcome::Found { request, bill } = outcome else {
                    panic!("expected a request for {house_id}/{service_id}");
                };
                let cost = c.service(service_id).unwrap().cost;
                assert_eq!(bill.amount, cost);
                assert_eq!(bill.house_id, house_id);
                assert_eq!(request.status, RequestStatus::Pending);
                assert_eq!(bill.status, BillStatus::Unpaid);
            }
        }
        let ids: Vec<u32> = c.bills().iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn pay_bill_twice_is_a_reported_no_op() {
        let mut c = seeded();
        assert!(c.request_service(2, 2).is_found());
        assert!(matches!(c.pay_bill(1), Ok(Payment::Paid(_))));
        let second = c.pay_bill(1).unwrap();
        assert!(matches!(second, Payment::AlreadyPaid(_)));
        assert_eq!(c.bills()[0].status, BillStatus::Paid);
    }

    #[test]
    fn pay_unknown_bill_mutates_nothing() {
        let mut c = seeded();
        assert!(c.request_service(1, 2).is_found());
        assert_eq!(c.pay_bill(5), Err(CoreError::NotFound));
        assert_eq!(c.bills()[0].status, BillStatus::Unpaid);
    }

    #[test]
    fn bills_for_house_filters_in_creation_order() {
        let mut c = seeded();
        c.request_service(1, 1);
        c.request_service(2, 2);
        c.request_service(1, 2);
        let ids: Vec<u32> = c.bills_for_house(1).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![1, 3]);
        let ids: Vec<u32> = c.bills_for_house(2).iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![2]);
    }

    #[test]
    fn later_service_with_same_id_does_not_change_billing() {
        let mut c = seeded();
        c.request_service(1, 1);
        // Lookups are first-match, so the re-priced duplicate is never billed.
        // Bills copy the cost at creation and services are never mutated.
        c.add_service(Service::new(1, "Plumbing", None, 999));
        c.request_service(1, 1);
        assert_eq!(c.bills()[0].amount, 200);
        assert_eq!(c.bills()[1].amount, 200);
    }

    #[test]
    fn duplicate_house_ids_resolve_to_first() {
        let mut c = seeded();
        c.add_house(House::new(1, "Impostor"));
        let RequestOutcome::Found { request, .. } = c.request_service(1, 1) else {
            panic!("expected a request");
        };
        assert_eq!(request.owner, "Rajesh");
    }

    #[test]
    fn complete_request_and_missing_request() {
        let mut c = seeded();
        c.request_service(1, 1);
        let done = c.complete_request(1).unwrap();
        assert_eq!(done.status, RequestStatus::Completed);
        assert_eq!(c.requests()[0].status, RequestStatus::Completed);
        assert_eq!(c.complete_request(2), Err(CoreError::NotFound));
    }

    #[test]
    fn add_resident_appends_to_first_match() {
        let mut c = seeded();
        c.add_resident(2, "Arjun").unwrap();
        assert_eq!(c.house(2).unwrap().residents, vec!["Arjun".to_string()]);
        assert_eq!(c.add_resident(9, "Nobody"), Err(CoreError::NotFound));
    }
}
