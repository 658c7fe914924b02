//! Interactive front desk: a numbered menu over stdin/stdout.

use std::io::{self, BufRead, Write};

use domain::actions::{self, Outcome};
use domain::service::CommunityService;
use domain::CommunityStore;
use report_common::{render_json, render_text};
use tracing::{info, warn};

use crate::config::OutputFormat;

const MENU: &str = "\
1) View Houses
2) View Services
3) Request a Service
4) View My Bills
5) Pay a Bill
6) Complete a Request
0) Exit";

/// Print `label` and read one trimmed line. `None` on end of input.
fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, label: &str) -> io::Result<Option<String>> {
    write!(out, "{}", label)?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim().to_string()))
}

fn emit<W: Write>(out: &mut W, format: OutputFormat, action: &str, outcome: Outcome) -> io::Result<()> {
    if let Some(e) = &outcome.mirror_error {
        warn!(action, err = %e, "store mirror failed; registry change kept");
    }
    if let Err(e) = &outcome.result {
        info!(action, code = e.code(), detail = ?e, "action rejected");
    }
    match format {
        OutputFormat::Text => writeln!(out, "{}\n", render_text(&outcome.result)),
        OutputFormat::Json => writeln!(out, "{}", render_json(&outcome.result)),
    }
}

/// Run the menu until the user exits or input ends.
pub fn run_menu<S, R, W>(
    svc: &mut CommunityService<S>,
    format: OutputFormat,
    mut input: R,
    out: &mut W,
) -> io::Result<()>
where
    S: CommunityStore,
    R: BufRead,
    W: Write,
{
    writeln!(out, "=== {} ===", svc.community().name())?;
    loop {
        writeln!(out, "{}", MENU)?;
        let Some(choice) = prompt(&mut input, out, "Choose an option: ")? else {
            break;
        };
        match choice.as_str() {
            "1" => emit(out, format, "view_houses", actions::view_houses(svc))?,
            "2" => emit(out, format, "view_services", actions::view_services(svc))?,
            "3" => {
                let Some(house) = prompt(&mut input, out, "Enter your House ID: ")? else {
                    break;
                };
                let Some(service) = prompt(&mut input, out, "Enter Service ID: ")? else {
                    break;
                };
                let outcome = actions::request_service(svc, &house, &service);
                emit(out, format, "request_service", outcome)?
            }
            "4" => {
                let Some(house) = prompt(&mut input, out, "Enter your House ID: ")? else {
                    break;
                };
                emit(out, format, "view_bills", actions::view_bills(svc, &house))?
            }
            "5" => {
                let Some(bill) = prompt(&mut input, out, "Enter Bill ID to pay: ")? else {
                    break;
                };
                emit(out, format, "pay_bill", actions::pay_bill(svc, &bill))?
            }
            "6" => {
                let Some(request) = prompt(&mut input, out, "Enter Request ID to complete: ")? else {
                    break;
                };
                let outcome = actions::complete_request(svc, &request);
                emit(out, format, "complete_request", outcome)?
            }
            "0" | "q" | "exit" => break,
            "" => continue,
            other => writeln!(out, "Unknown option: {}\n", other)?,
        }
    }
    writeln!(out, "Goodbye.")?;
    Ok(())
}
