use std::env;
use std::process;

use domain::actions::{self, Outcome, Reply};
use domain::adapters::memory_store::InMemoryStore;
use domain::registry::Community;
use domain::seed;
use domain::service::CommunityService;

fn print_usage() {
    eprintln!(
        "{}\n\nUsage:\n  domain houses\n  domain services\n  domain request <house-id> <service-id> [--pay]\n\nNotes:\n  - This demo CLI uses an in-memory store seeded on every run; nothing is persisted.",
        domain::about()
    );
}

/// Display lines for a successful reply, or the error message.
fn outcome_lines(out: Outcome) -> Result<Vec<String>, String> {
    let lines = match out.result.map_err(|e| e.to_string())? {
        Reply::Houses { houses } => houses.iter().map(|h| h.to_string()).collect(),
        Reply::Services { services } => services.iter().map(|s| s.to_string()).collect(),
        Reply::RequestCreated { request, bill } => vec![request.to_string(), bill.to_string()],
        Reply::BillPaid { bill } | Reply::BillAlreadyPaid { bill } => vec![bill.to_string()],
        Reply::Bills { house_id, bills } if bills.is_empty() => {
            vec![format!("No bills for house {}", house_id)]
        }
        Reply::Bills { bills, .. } => bills.iter().map(|b| b.to_string()).collect(),
        Reply::RequestCompleted { request } => vec![request.to_string()],
    };
    Ok(lines)
}

fn print_outcome(out: Outcome) -> Result<(), String> {
    outcome_lines(out)?.iter().for_each(|l| println!("{}", l));
    Ok(())
}

fn run() -> Result<(), String> {
    let mut args = env::args().skip(1); // skip program name

    let Some(cmd) = args.next() else {
        print_usage();
        return Ok(());
    };

    let mut svc = CommunityService::new(
        Community::new(seed::DEFAULT_COMMUNITY_NAME),
        InMemoryStore::new(),
    );
    seed::houses().into_iter().for_each(|h| {
        svc.seed_house(h);
    });
    seed::services().into_iter().for_each(|s| {
        svc.seed_service(s);
    });

    match cmd.as_str() {
        "houses" => print_outcome(actions::view_houses(&svc)),
        "services" => print_outcome(actions::view_services(&svc)),
        "request" => {
            let Some(house) = args.next() else {
                return Err("missing <house-id> for request".into());
            };
            let Some(service) = args.next() else {
                return Err("missing <service-id> for request".into());
            };
            let pay = match args.next().as_deref() {
                None => false,
                Some("--pay") => true,
                Some(unk) => return Err(format!("unknown argument: {}", unk)),
            };
            let out = actions::request_service(&mut svc, &house, &service);
            let bill_id = match &out.result {
                Ok(Reply::RequestCreated { bill, .. }) => Some(bill.id),
                _ => None,
            };
            print_outcome(out)?;
            if let (true, Some(id)) = (pay, bill_id) {
                print_outcome(actions::pay_bill(&mut svc, &id.to_string()))?;
            }
            Ok(())
        }
        _ => {
            print_usage();
            Ok(())
        }
    }
}

fn main() {
    if let Err(msg) = run() {
        eprintln!("error: {}", msg);
        process::exit(1);
    }
}
