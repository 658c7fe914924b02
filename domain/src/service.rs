use crate::registry::{Community, Payment, RequestOutcome};
use crate::{BillStatus, CommunityStore, CoreError, House, Request, Service};

/// A registry result paired with the outcome of mirroring it into the store.
///
/// The registry mutation stands even when `mirror_error` is set.
#[derive(Debug)]
pub struct Mirrored<T> {
    pub value: T,
    pub mirror_error: Option<CoreError>,
}

impl<T> Mirrored<T> {
    fn new(value: T, mirror: Result<(), CoreError>) -> Self {
        Self {
            value,
            mirror_error: mirror.err(),
        }
    }

    fn unmirrored(value: T) -> Self {
        Self {
            value,
            mirror_error: None,
        }
    }
}

/// Application service applying registry mutations and mirroring them into a
/// store.
///
/// Generic over the store so the registry stays testable without IO. The
/// registry is always updated first and never rolled back.
pub struct CommunityService<S: CommunityStore> {
    community: Community,
    store: S,
}

impl<S: CommunityStore> CommunityService<S> {
    pub fn new(community: Community, store: S) -> Self {
        Self { community, store }
    }

    pub fn community(&self) -> &Community {
        &self.community
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn seed_house(&mut self, house: House) -> Mirrored<()> {
        let mirror = self.store.insert_house(&house);
        self.community.add_house(house);
        Mirrored::new((), mirror)
    }

    pub fn seed_service(&mut self, service: Service) -> Mirrored<()> {
        let mirror = self.store.insert_service(&service);
        self.community.add_service(service);
        Mirrored::new((), mirror)
    }

    /// Raise a request and its bill, then mirror both. A lookup miss touches
    /// neither the registry nor the store.
    pub fn request_service(&mut self, house_id: u32, service_id: u32) -> Mirrored<RequestOutcome> {
        let outcome = self.community.request_service(house_id, service_id);
        let mirror = match &outcome {
            // Independent tables: a failed request row must not drop the bill row.
            RequestOutcome::Found { request, bill } => {
                let request_row = self.store.insert_request(request);
                let bill_row = self.store.insert_bill(bill);
                request_row.and(bill_row)
            }
            RequestOutcome::NotFound { .. } => Ok(()),
        };
        Mirrored::new(outcome, mirror)
    }

    /// Pay a bill. Only a real transition is mirrored.
    pub fn pay_bill(&mut self, bill_id: u32) -> Result<Mirrored<Payment>, CoreError> {
        let payment = self.community.pay_bill(bill_id)?;
        Ok(match payment {
            Payment::Paid(_) => {
                let mirror = self.store.update_bill_status(bill_id, BillStatus::Paid);
                Mirrored::new(payment, mirror)
            }
            Payment::AlreadyPaid(_) => Mirrored::unmirrored(payment),
        })
    }

    pub fn complete_request(&mut self, request_id: u32) -> Result<Mirrored<Request>, CoreError> {
        let request = self.community.complete_request(request_id)?;
        let mirror = self.store.update_request_status(request_id, request.status);
        Ok(Mirrored::new(request, mirror))
    }
}
