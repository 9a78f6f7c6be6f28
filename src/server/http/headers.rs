
pub const HTTP_HEADER_CONTENT_LENGTH: &str = "Content-Length";
pub const HTTP_HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const HTTP_HEADER_CONNECTION: &str = "Connection";

pub const CONTENT_TYPE_TEXT_PLAIN: &str = "text/plain; charset=utf-8";
