mod server;
mod line;
pub mod http;

pub use {
    server::Server,
    line::serve_stream,
    http::{
        Router, Route, Lookup, Ctx, Req, Res, Method, Pattern, Segment, Vars,
        RouteError, Handler, HandlerRef, not_found, method_not_allowed,
    },
};
