//! Shared HTTP adapter state.
//!
//! Handlers receive this via `web::Data` and only see driving ports, so
//! they can be tested against mocks without I/O.

use std::sync::Arc;

use crate::domain::ports::{CustomerQuery, InvoiceCommand, InvoiceQuery, LoginService, OverviewQuery};

/// Port implementations used by the HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub invoices: Arc<dyn InvoiceCommand>,
    pub invoice_query: Arc<dyn InvoiceQuery>,
    pub customers: Arc<dyn CustomerQuery>,
    pub overview: Arc<dyn OverviewQuery>,
}
