//! Authentication against the CAS single-sign-on gateway
//!
//! # Components
//!
//! - `tickets`: the ticket-granting / service ticket handshake and redemption
//! - `SessionContext`: the authenticated handle every portal fetch goes through

mod session;
mod tickets;

pub use session::SessionContext;
pub use tickets::{
    authenticate, extract_ticket, redeem, request_service_ticket,
    request_ticket_granting_ticket, ticket_url, tickets_url, Credentials, ServiceTicket,
    TicketGrantingTicket,
};
