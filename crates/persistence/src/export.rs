//! CSV export of the ticket log
//!
//! One row per ticket: `ticket_id,service,city,state,payload,created_at`.
//! The payload is JSON-serialized into a single CSV field; timestamps are
//! ISO-8601 with seconds precision.

use intake_core::Ticket;

use crate::PersistenceError;

const HEADER: &str = "ticket_id,service,city,state,payload,created_at";

/// Render tickets as a CSV document, header included
pub fn export_csv(tickets: &[Ticket]) -> Result<String, PersistenceError> {
    let mut out = String::from(HEADER);
    out.push('\n');

    for ticket in tickets {
        let payload = serde_json::to_string(&ticket.payload)?;
        let row = [
            ticket.ticket_id.as_str(),
            ticket.service.as_str(),
            ticket.city.as_str(),
            ticket.state.as_str(),
            payload.as_str(),
            &ticket.created_at_iso(),
        ]
        .iter()
        .map(|field| escape(field))
        .collect::<Vec<_>>()
        .join(",");
        out.push_str(&row);
        out.push('\n');
    }

    Ok(out)
}

/// RFC 4180 quoting: wrap when a field contains a comma, quote, or newline
fn escape(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
