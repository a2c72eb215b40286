//! Routing module
//!
//! Pattern routes bound to handlers, matched in registration order.

mod matcher;

pub use matcher::{Handler, HandlerResult, Params, Route, RouteMatch, RouteTable};
