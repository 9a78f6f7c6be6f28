pub mod req;
pub mod res;
pub mod method;
pub mod matcher;
pub mod router;
pub mod ctx;
mod error;
mod headers;

pub use {
    req::Req,
    res::Res,
    method::Method,
    matcher::{Pattern, Segment, Vars},
    router::{Router, Route, Lookup, Handler, HandlerRef},
    ctx::{Ctx, not_found, method_not_allowed},
    error::RouteError,
};
