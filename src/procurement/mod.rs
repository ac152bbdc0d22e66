//! Procurement - stock status, stock synthesis, parts requests and orders

pub mod order;
pub mod request;
pub mod status;
pub mod stock;

pub use order::{
    check_line, plan_order, suggested_reorder_quantity, Availability, OrderLine,
    ProcurementOrder, StockCheck,
};
pub use request::{parse_request, RequestError, RequestLine};
pub use status::StockStatus;
pub use stock::{synthesize, StockEntry, StockProfile, STOCK_PROFILES, SUPPLIERS};
