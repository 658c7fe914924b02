//! Front-desk actions: the contract between the registry and whatever
//! presents it.
//!
//! Every action takes raw text input, coerces ids, and returns a structured
//! [`Reply`] or an [`ActionError`]. Store mirror failures never turn a
//! successful action into an error; they are handed back in
//! [`Outcome::mirror_error`] for the caller to log.

use std::fmt::{Display, Formatter};

use serde::Serialize;

use crate::registry::{LookupMiss, Payment, RequestOutcome};
use crate::service::{CommunityService, Mirrored};
use crate::{Bill, CommunityStore, CoreError, House, Request, Service};

/// Successful action results.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Reply {
    Houses { houses: Vec<House> },
    Services { services: Vec<Service> },
    RequestCreated { request: Request, bill: Bill },
    Bills { house_id: i64, bills: Vec<Bill> },
    BillPaid { bill: Bill },
    /// Informational, not an error.
    BillAlreadyPaid { bill: Bill },
    RequestCompleted { request: Request },
}

/// Action failures, all absorbed at the desk and rendered for the user.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionError {
    MalformedInput(String),
    LookupFailed(LookupMiss),
    BillNotFound(i64),
    RequestNotFound(i64),
}

impl ActionError {
    pub fn code(&self) -> &'static str {
        match self {
            ActionError::MalformedInput(_) => "malformed_input",
            ActionError::LookupFailed(_) => "lookup_failed",
            ActionError::BillNotFound(_) => "bill_not_found",
            ActionError::RequestNotFound(_) => "request_not_found",
        }
    }
}

impl Display for ActionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            ActionError::MalformedInput(_) => write!(f, "Invalid input."),
            // The miss reason is kept for logs; users see one message.
            ActionError::LookupFailed(_) => write!(f, "Invalid House ID or Service ID"),
            ActionError::BillNotFound(_) => write!(f, "Bill not found."),
            ActionError::RequestNotFound(_) => write!(f, "Request not found."),
        }
    }
}

impl std::error::Error for ActionError {}

/// A reply plus any store mirror failure that accompanied it.
#[derive(Debug)]
pub struct Outcome {
    pub result: Result<Reply, ActionError>,
    pub mirror_error: Option<CoreError>,
}

impl Outcome {
    fn plain(result: Result<Reply, ActionError>) -> Self {
        Self {
            result,
            mirror_error: None,
        }
    }

    fn from_mirrored<T>(m: Mirrored<T>, f: impl FnOnce(T) -> Result<Reply, ActionError>) -> Self {
        Self {
            result: f(m.value),
            mirror_error: m.mirror_error,
        }
    }
}

/// Parse a user-entered id. Surrounding whitespace is ignored.
///
/// Any integer is accepted; ids outside the registry's range simply match
/// nothing. Only non-integer text is malformed.
pub fn parse_id(raw: &str) -> Result<i64, ActionError> {
    raw.trim()
        .parse::<i64>()
        .map_err(|_| ActionError::MalformedInput(raw.to_string()))
}

/// Narrow a parsed id to a registry id. `None` means it cannot exist.
fn registry_id(id: i64) -> Option<u32> {
    u32::try_from(id).ok()
}

pub fn view_houses<S: CommunityStore>(svc: &CommunityService<S>) -> Outcome {
    Outcome::plain(Ok(Reply::Houses {
        houses: svc.community().houses().to_vec(),
    }))
}

pub fn view_services<S: CommunityStore>(svc: &CommunityService<S>) -> Outcome {
    Outcome::plain(Ok(Reply::Services {
        services: svc.community().services().to_vec(),
    }))
}

pub fn request_service<S: CommunityStore>(
    svc: &mut CommunityService<S>,
    house_raw: &str,
    service_raw: &str,
) -> Outcome {
    let ids = parse_id(house_raw).and_then(|h| parse_id(service_raw).map(|s| (h, s)));
    let (house_id, service_id) = match ids {
        Ok(ids) => ids,
        Err(e) => return Outcome::plain(Err(e)),
    };
    let (house_id, service_id) = match (registry_id(house_id), registry_id(service_id)) {
        (Some(h), Some(s)) => (h, s),
        (None, Some(s)) if svc.community().service(s).is_some() => {
            return Outcome::plain(Err(ActionError::LookupFailed(LookupMiss::House)))
        }
        (Some(h), None) if svc.community().house(h).is_some() => {
            return Outcome::plain(Err(ActionError::LookupFailed(LookupMiss::Service)))
        }
        _ => return Outcome::plain(Err(ActionError::LookupFailed(LookupMiss::HouseAndService))),
    };
    Outcome::from_mirrored(svc.request_service(house_id, service_id), |outcome| {
        match outcome {
            RequestOutcome::Found { request, bill } => Ok(Reply::RequestCreated { request, bill }),
            RequestOutcome::NotFound { reason } => Err(ActionError::LookupFailed(reason)),
        }
    })
}

pub fn view_bills<S: CommunityStore>(svc: &CommunityService<S>, house_raw: &str) -> Outcome {
    let house_id = match parse_id(house_raw) {
        Ok(id) => id,
        Err(e) => return Outcome::plain(Err(e)),
    };
    let bills = match registry_id(house_id) {
        Some(id) => svc
            .community()
            .bills_for_house(id)
            .into_iter()
            .cloned()
            .collect(),
        None => Vec::new(),
    };
    Outcome::plain(Ok(Reply::Bills { house_id, bills }))
}

pub fn pay_bill<S: CommunityStore>(svc: &mut CommunityService<S>, bill_raw: &str) -> Outcome {
    let bill_id = match parse_id(bill_raw) {
        Ok(id) => id,
        Err(e) => return Outcome::plain(Err(e)),
    };
    let Some(id) = registry_id(bill_id) else {
        return Outcome::plain(Err(ActionError::BillNotFound(bill_id)));
    };
    match svc.pay_bill(id) {
        Ok(m) => Outcome::from_mirrored(m, |payment| {
            Ok(match payment {
                Payment::Paid(bill) => Reply::BillPaid { bill },
                Payment::AlreadyPaid(bill) => Reply::BillAlreadyPaid { bill },
            })
        }),
        Err(_) => Outcome::plain(Err(ActionError::BillNotFound(bill_id))),
    }
}

pub fn complete_request<S: CommunityStore>(
    svc: &mut CommunityService<S>,
    request_raw: &str,
) -> Outcome {
    let request_id = match parse_id(request_raw) {
        Ok(id) => id,
        Err(e) => return Outcome::plain(Err(e)),
    };
    let Some(id) = registry_id(request_id) else {
        return Outcome::plain(Err(ActionError::RequestNotFound(request_id)));
    };
    match svc.complete_request(id) {
        Ok(m) => Outcome::from_mirrored(m, |request| Ok(Reply::RequestCompleted { request })),
        Err(_) => Outcome::plain(Err(ActionError::RequestNotFound(request_id))),
    }
}
