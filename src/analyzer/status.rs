use crate::parser::types::TicketRecord;

const OPEN_STATUSES: &[&str] = &[
    "assigned to engineer!",
    "reopened",
    "waiting information from user - 1",
    "waiting information from user - 2",
    "waiting information from user - 3",
];

const WAITING_PREFIX: &str = "waiting information from user";
const CLOSED: &str = "closed";
const CLOSED_LACK_OF_INFO: &str = "closed due to lack of information";

fn classification_contains(ticket: &TicketRecord, needle: &str) -> bool {
    ticket
        .classification
        .as_deref()
        .is_some_and(|c| c.to_lowercase().contains(needle))
}

/// Status is one of the open states, whatever the classification.
pub fn has_open_status(ticket: &TicketRecord) -> bool {
    OPEN_STATUSES.contains(&ticket.status.as_str())
}

/// Open ticket, excluding "waiting information" tickets already classified
/// as "request open" (those are counted with the request tickets).
pub fn is_open(ticket: &TicketRecord) -> bool {
    if !has_open_status(ticket) {
        return false;
    }
    !(ticket.status.starts_with(WAITING_PREFIX) && classification_contains(ticket, "request open"))
}

pub fn is_closed(ticket: &TicketRecord) -> bool {
    ticket.status == CLOSED
}

/// Closed, or closed for lack of user information. Bug reports only.
pub fn is_closed_or_lack_of_info(ticket: &TicketRecord) -> bool {
    ticket.status == CLOSED || ticket.status == CLOSED_LACK_OF_INFO
}

/// Request ticket. Without a classification column every ticket counts.
pub fn is_request(ticket: &TicketRecord, has_classification_column: bool) -> bool {
    !has_classification_column || classification_contains(ticket, "request")
}

/// Ticket routed to a client-facing group.
pub fn is_client_group(ticket: &TicketRecord) -> bool {
    ticket
        .group
        .as_deref()
        .is_some_and(|g| g.to_lowercase().contains("client"))
}

/// Stable filter over a ticket slice.
pub fn partition<'a>(
    tickets: &'a [TicketRecord],
    pred: impl Fn(&TicketRecord) -> bool,
) -> Vec<&'a TicketRecord> {
    tickets.iter().filter(|&t| pred(t)).collect()
}
