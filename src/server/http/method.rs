use std::{
    fmt,
};

#[derive(Copy, Clone, PartialEq, Debug, Eq, Hash, PartialOrd)]
pub enum Method {
    GET,
    HEAD,
    POST,
    PUT,
    PATCH,
    DELETE,
    OPTIONS,
    CONNECT,
    TRACE,
    UNKNOWN,
}

impl Method {
    /// Whether a route registered for `self` answers a request made with `requested`.
    /// HEAD requests fall back to GET routes, never the other way around.
    pub fn serves(self, requested: Method) -> bool {
        self == requested || (requested == Method::HEAD && self == Method::GET)
    }
}

impl From<&str> for Method {
    fn from(method_str: &str) -> Self {
        match method_str {
            "GET" => Method::GET,
            "HEAD" => Method::HEAD,
            "POST" => Method::POST,
            "PUT" => Method::PUT,
            "PATCH" => Method::PATCH,
            "DELETE" => Method::DELETE,
            "OPTIONS" => Method::OPTIONS,
            "CONNECT" => Method::CONNECT,
            "TRACE" => Method::TRACE,
            _ => Method::UNKNOWN,
        }
    }
}

impl Default for Method {
    fn default() -> Self {Method::UNKNOWN}
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Method::GET => "GET",
            Method::HEAD => "HEAD",
            Method::POST => "POST",
            Method::PUT => "PUT",
            Method::PATCH => "PATCH",
            Method::DELETE => "DELETE",
            Method::OPTIONS => "OPTIONS",
            Method::CONNECT => "CONNECT",
            Method::TRACE => "TRACE",
            Method::UNKNOWN => "UNKNOWN",
        };
        f.write_str(s)
    }
}
