//! Domain library for the gated community desk.
//!
//! This crate holds the domain records, the in-memory registry, the store
//! port (trait), and error definitions. Keep adapters and IO concerns out of
//! this crate; the only dependency is `serde` for structured output.

use std::error::Error;
use std::fmt::{Display, Formatter};

use serde::Serialize;

/// A house in the community. Residents are kept in the order they were added.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct House {
    pub id: u32,
    pub owner: String,
    pub residents: Vec<String>,
}

impl House {
    pub fn new<S: Into<String>>(id: u32, owner: S) -> Self {
        Self {
            id,
            owner: owner.into(),
            residents: Vec::new(),
        }
    }

    pub fn add_resident<S: Into<String>>(&mut self, name: S) {
        self.residents.push(name.into());
    }

    /// Residents joined for display and storage; `None` when there are none.
    pub fn residents_joined(&self) -> Option<String> {
        if self.residents.is_empty() {
            None
        } else {
            Some(self.residents.join(", "))
        }
    }
}

impl Display for House {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "House {} | Owner: {} | Residents: {}",
            self.id,
            self.owner,
            self.residents.join(", ")
        )
    }
}

/// A service offered to residents. Immutable once created.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Service {
    pub id: u32,
    pub name: String,
    pub provider: Option<String>,
    pub cost: u64,
}

impl Service {
    pub fn new<S: Into<String>>(id: u32, name: S, provider: Option<String>, cost: u64) -> Self {
        Self {
            id,
            name: name.into(),
            provider,
            cost,
        }
    }
}

impl Display for Service {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match &self.provider {
            Some(p) => write!(
                f,
                "Service {} | {} by {} | Cost: ₹{}",
                self.id, self.name, p, self.cost
            ),
            None => write!(f, "Service {} | {} | Cost: ₹{}", self.id, self.name, self.cost),
        }
    }
}

/// Lifecycle of a service request. Only moves forward.
#[derive(Clone, Debug, PartialEq, Eq, Copy, Serialize)]
pub enum RequestStatus {
    Pending,
    Completed,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "Pending",
            RequestStatus::Completed => "Completed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(RequestStatus::Pending),
            "completed" => Some(RequestStatus::Completed),
            _ => None,
        }
    }
}

/// Payment state of a bill. Only moves forward.
#[derive(Clone, Debug, PartialEq, Eq, Copy, Serialize)]
pub enum BillStatus {
    Unpaid,
    Paid,
}

impl BillStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillStatus::Unpaid => "Unpaid",
            BillStatus::Paid => "Paid",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "unpaid" => Some(BillStatus::Unpaid),
            "paid" => Some(BillStatus::Paid),
            _ => None,
        }
    }
}

/// A service request raised by a house.
///
/// The owner and service name are snapshots taken at creation time so the
/// summary line does not need the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Request {
    pub id: u32,
    pub house_id: u32,
    pub service_id: u32,
    pub owner: String,
    pub service_name: String,
    pub status: RequestStatus,
}

impl Request {
    pub fn new(id: u32, house: &House, service: &Service) -> Self {
        Self {
            id,
            house_id: house.id,
            service_id: service.id,
            owner: house.owner.clone(),
            service_name: service.name.clone(),
            status: RequestStatus::Pending,
        }
    }

    /// Mark the request as completed. No guard: completing twice is harmless.
    pub fn complete(&mut self) {
        self.status = RequestStatus::Completed;
    }
}

impl Display for Request {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Request {} | {} requested {} | Status: {}",
            self.id,
            self.owner,
            self.service_name,
            self.status.as_str()
        )
    }
}

/// A bill raised alongside a request. The amount is fixed at creation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Bill {
    pub id: u32,
    pub house_id: u32,
    pub amount: u64,
    pub status: BillStatus,
}

impl Bill {
    pub fn new(id: u32, house_id: u32, amount: u64) -> Self {
        Self {
            id,
            house_id,
            amount,
            status: BillStatus::Unpaid,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == BillStatus::Paid
    }

    /// Mark the bill as paid. Returns `false` if it already was.
    pub fn pay(&mut self) -> bool {
        if self.is_paid() {
            return false;
        }
        self.status = BillStatus::Paid;
        true
    }
}

impl Display for Bill {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Bill {} | House {} | Amount: ₹{} | Status: {}",
            self.id,
            self.house_id,
            self.amount,
            self.status.as_str()
        )
    }
}

/// Store port mirroring registry mutations into durable tables.
///
/// Write-only: the registry is never rehydrated from the store.
pub trait CommunityStore {
    /// Insert a house; ignored if the id already exists.
    fn insert_house(&self, house: &House) -> Result<(), CoreError>;
    /// Insert a service; ignored if the id already exists.
    fn insert_service(&self, service: &Service) -> Result<(), CoreError>;
    fn insert_request(&self, request: &Request) -> Result<(), CoreError>;
    fn insert_bill(&self, bill: &Bill) -> Result<(), CoreError>;
    /// Unconditional update; a missing id is not an error.
    fn update_bill_status(&self, bill_id: u32, status: BillStatus) -> Result<(), CoreError>;
    /// Unconditional update; a missing id is not an error.
    fn update_request_status(
        &self,
        request_id: u32,
        status: RequestStatus,
    ) -> Result<(), CoreError>;
}

/// Core domain errors (no external error crates to keep deps minimal).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    InvalidInput(String),
    NotFound,
    Repository(String),
}

impl Display for CoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::InvalidInput(msg) => write!(f, "invalid input: {}", msg),
            CoreError::NotFound => write!(f, "not found"),
            CoreError::Repository(msg) => write!(f, "repository error: {}", msg),
        }
    }
}

impl Error for CoreError {}

/// Return a short about/version line for the binaries to print.
pub fn about() -> String {
    let pkg = env!("CARGO_PKG_NAME");
    let ver = env!("CARGO_PKG_VERSION");
    format!("{} v{} - community desk domain", pkg, ver)
}

pub mod actions;
pub mod adapters;
pub mod registry;
pub mod seed;
pub mod service;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn house_summary_joins_residents() {
        let mut h = House::new(1, "Ravi");
        h.add_resident("Anita");
        h.add_resident("Kiran");
        assert_eq!(h.to_string(), "House 1 | Owner: Ravi | Residents: Anita, Kiran");
        assert_eq!(h.residents_joined().as_deref(), Some("Anita, Kiran"));
    }

    #[test]
    fn house_without_residents_has_no_joined_value() {
        let h = House::new(4, "Meera");
        assert_eq!(h.residents_joined(), None);
        assert_eq!(h.to_string(), "House 4 | Owner: Meera | Residents: ");
    }

    #[test]
    fn service_summary_with_and_without_provider() {
        let s = Service::new(1, "Plumbing", Some("Mr. Kumar".into()), 500);
        assert_eq!(s.to_string(), "Service 1 | Plumbing by Mr. Kumar | Cost: ₹500");
        let bare = Service::new(2, "Electrician", None, 250);
        assert_eq!(bare.to_string(), "Service 2 | Electrician | Cost: ₹250");
    }

    #[test]
    fn bill_pay_is_one_way() {
        let mut b = Bill::new(1, 2, 200);
        assert_eq!(b.status, BillStatus::Unpaid);
        assert!(b.pay());
        assert!(!b.pay());
        assert_eq!(b.status, BillStatus::Paid);
        assert_eq!(b.to_string(), "Bill 1 | House 2 | Amount: ₹200 | Status: Paid");
    }

    #[test]
    fn request_complete_flips_status() {
        let h = House::new(1, "Ravi");
        let s = Service::new(3, "Electrician", None, 700);
        let mut r = Request::new(7, &h, &s);
        assert_eq!(r.status, RequestStatus::Pending);
        r.complete();
        r.complete();
        assert_eq!(r.status, RequestStatus::Completed);
        assert_eq!(r.to_string(), "Request 7 | Ravi requested Electrician | Status: Completed");
    }

    #[test]
    fn status_parsing() {
        assert_eq!(BillStatus::parse("Paid"), Some(BillStatus::Paid));
        assert_eq!(BillStatus::parse("UNPAID"), Some(BillStatus::Unpaid));
        assert_eq!(BillStatus::parse("overdue"), None);
        assert_eq!(RequestStatus::parse("pending"), Some(RequestStatus::Pending));
        assert_eq!(RequestStatus::parse(RequestStatus::Completed.as_str()), Some(RequestStatus::Completed));
        assert_eq!(RequestStatus::parse(""), None);
    }
}
