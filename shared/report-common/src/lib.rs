//! Shared rendering for front-desk replies.
//!
//! Turns the structured results of `domain::actions` into either a titled
//! text block (what a message box would show) or a JSON value.

use domain::actions::{ActionError, Reply};

// ============================================================================
// Text Blocks
// ============================================================================

/// Whether a block reports success/information or an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockKind {
    Info,
    Error,
}

/// A titled, multi-line message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TextBlock {
    pub kind: BlockKind,
    pub title: String,
    pub body: String,
}

impl TextBlock {
    fn info(title: &str, body: String) -> Self {
        Self {
            kind: BlockKind::Info,
            title: title.to_string(),
            body,
        }
    }

    fn error(body: String) -> Self {
        Self {
            kind: BlockKind::Error,
            title: "Error".to_string(),
            body,
        }
    }
}

impl std::fmt::Display for TextBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "== {} ==", self.title)?;
        write!(f, "{}", self.body)
    }
}

/// One summary line per item, or `empty` when there are none.
fn lines<T: std::fmt::Display>(items: &[T], empty: &str) -> String {
    if items.is_empty() {
        empty.to_string()
    } else {
        items
            .iter()
            .map(|i| i.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Render an action result as a text block.
pub fn render_text(result: &Result<Reply, ActionError>) -> TextBlock {
    match result {
        Ok(Reply::Houses { houses }) => TextBlock::info("Houses", lines(houses, "No houses found.")),
        Ok(Reply::Services { services }) => {
            TextBlock::info("Services", lines(services, "No services found."))
        }
        Ok(Reply::RequestCreated { request, bill }) => {
            TextBlock::info("Request Created", format!("{}\n{}", request, bill))
        }
        Ok(Reply::Bills { bills, .. }) => TextBlock::info("Bills", lines(bills, "No bills found.")),
        Ok(Reply::BillPaid { bill }) => TextBlock::info("Payment Success", bill.to_string()),
        Ok(Reply::BillAlreadyPaid { .. }) => TextBlock::info("Info", "Bill already paid.".into()),
        Ok(Reply::RequestCompleted { request }) => {
            TextBlock::info("Request Completed", request.to_string())
        }
        Err(e) => TextBlock::error(e.to_string()),
    }
}

// ============================================================================
// JSON
// ============================================================================

/// Create a structured error JSON with a custom message.
///
/// Returns: `{"error": {"code": "<code>", "message": "<message>"}}`
pub fn json_error_with_message(code: &str, message: &str) -> serde_json::Value {
    serde_json::json!({"error": {"code": code, "message": message}})
}

/// Render an action result as JSON. Replies serialize with a `kind` tag;
/// errors use the `{"error": {...}}` envelope.
pub fn render_json(result: &Result<Reply, ActionError>) -> serde_json::Value {
    match result {
        Ok(reply) => serde_json::to_value(reply).unwrap_or_else(|e| {
            json_error_with_message("internal", &format!("serialization failed: {e}"))
        }),
        Err(e) => json_error_with_message(e.code(), &e.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain::registry::LookupMiss;
    use domain::{Bill, House, Request, Service};

    fn request_and_bill() -> (Request, Bill) {
        let h = House::new(1, "Rajesh");
        let s = Service::new(1, "Plumbing", None, 200);
        (Request::new(1, &h, &s), Bill::new(1, 1, 200))
    }

    #[test]
    fn empty_lists_render_placeholders() {
        let block = render_text(&Ok(Reply::Houses { houses: vec![] }));
        assert_eq!(block.body, "No houses found.");
        let block = render_text(&Ok(Reply::Services { services: vec![] }));
        assert_eq!(block.body, "No services found.");
        let block = render_text(&Ok(Reply::Bills {
            house_id: 2,
            bills: vec![],
        }));
        assert_eq!(block.title, "Bills");
        assert_eq!(block.body, "No bills found.");
    }

    #[test]
    fn request_created_block() {
        let (request, bill) = request_and_bill();
        let block = render_text(&Ok(Reply::RequestCreated { request, bill }));
        assert_eq!(block.kind, BlockKind::Info);
        assert_eq!(
            block.body,
            "Request 1 | Rajesh requested Plumbing | Status: Pending\nBill 1 | House 1 | Amount: ₹200 | Status: Unpaid"
        );
    }

    #[test]
    fn already_paid_is_informational() {
        let mut bill = Bill::new(3, 1, 500);
        bill.pay();
        let block = render_text(&Ok(Reply::BillAlreadyPaid { bill }));
        assert_eq!(block.kind, BlockKind::Info);
        assert_eq!(block.body, "Bill already paid.");
    }

    #[test]
    fn errors_render_as_error_blocks() {
        let block = render_text(&Err(ActionError::LookupFailed(LookupMiss::Service)));
        assert_eq!(block.kind, BlockKind::Error);
        assert_eq!(block.to_string(), "== Error ==\nInvalid House ID or Service ID");
        let block = render_text(&Err(ActionError::MalformedInput("abc".into())));
        assert_eq!(block.body, "Invalid input.");
    }

    #[test]
    fn json_reply_is_tagged() {
        let (request, bill) = request_and_bill();
        let v = render_json(&Ok(Reply::RequestCreated { request, bill }));
        assert_eq!(v["kind"], "request_created");
        assert_eq!(v["bill"]["amount"], 200);
        assert_eq!(v["bill"]["status"], "Unpaid");
        assert_eq!(v["request"]["status"], "Pending");
    }

    #[test]
    fn json_error_envelope() {
        let v = render_json(&Err(ActionError::BillNotFound(9)));
        assert_eq!(
            v,
            serde_json::json!({"error": {"code": "bill_not_found", "message": "Bill not found."}})
        );
    }
}
