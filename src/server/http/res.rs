use {
    std::io,
    super::headers::*,
    crate::logger::micro::*,
};

const HTTP_VERSION: &str = "HTTP/1.1";

pub struct Res<'w> {
    writer: &'w mut dyn io::Write,
    status_code: u16,
    headers: Vec<(String, String)>,
    head_only: bool,
    responded: bool,
}

impl<'w> Res<'w> {
    pub fn new(writer: &'w mut dyn io::Write) -> Self {
        Res {
            writer,
            status_code: 200,
            headers: Vec::new(),
            head_only: false,
            responded: false,
        }
    }

    /// Keeps the headers of every response but drops the body, as HEAD requires.
    pub fn set_head_only(&mut self, head_only: bool) {
        self.head_only = head_only;
    }

    pub fn set_status(&mut self, status_code: u16) {
        self.status_code = status_code;
    }

    pub fn status_code(&self) -> u16 {
        self.status_code
    }

    pub fn status(&self) -> &'static str {
        reason_phrase(self.status_code)
    }

    /// Sets a header, replacing any earlier value under the same name.
    /// Line breaks are stripped so a header can't end the response head early.
    pub fn set_header(&mut self, key: &str, value: &str) {
        let (key, value) = (strip_line_breaks(key), strip_line_breaks(value));
        let (key, value) = (key.as_str(), value.as_str());
        if key.is_empty() {
            warn!("dropping response header with an empty name");
            return;
        }
        match self.headers.iter_mut().find(|(k, _)| k.eq_ignore_ascii_case(key)) {
            Some(entry) => entry.1 = value.to_string(),
            None => self.headers.push((key.to_string(), value.to_string())),
        }
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    pub fn responded(&self) -> bool {
        self.responded
    }

    pub fn respond(&mut self, body: &[u8]) -> io::Result<()> {
        if self.responded {
            return Err(io::Error::new(io::ErrorKind::Other, "response already written"));
        }
        self.responded = true;

        let mut head = format!("{} {} {}\r\n", HTTP_VERSION, self.status_code, self.status());
        for (key, value) in self.headers.iter() {
            if key.eq_ignore_ascii_case(HTTP_HEADER_CONTENT_LENGTH) || key.eq_ignore_ascii_case(HTTP_HEADER_CONNECTION) {
                continue;
            }
            head += &format!("{}: {}\r\n", key, value);
        }
        head += &format!("{}: {}\r\n", HTTP_HEADER_CONTENT_LENGTH, body.len());
        head += &format!("{}: close\r\n\r\n", HTTP_HEADER_CONNECTION);

        self.writer.write_all(head.as_bytes())?;
        if !self.head_only {
            self.writer.write_all(body)?;
        }
        self.writer.flush()
    }

    /// Responds with `status_code` and an empty body.
    pub fn write_status(&mut self, status_code: u16) -> io::Result<()> {
        self.set_status(status_code);
        self.respond(b"")
    }
}

fn strip_line_breaks(s: &str) -> String {
    if !s.contains(|c: char| c == '\r' || c == '\n') {
        return s.to_string();
    }
    warn!("line breaks stripped from response header {:?}", s);
    s.chars().filter(|c| *c != '\r' && *c != '\n').collect()
}

pub fn reason_phrase(status_code: u16) -> &'static str {
    match status_code {
        100 => "Continue",
        101 => "Switching Protocols",
        200 => "OK",
        201 => "Created",
        202 => "Accepted",
        204 => "No Content",
        301 => "Moved Permanently",
        302 => "Found",
        304 => "Not Modified",
        307 => "Temporary Redirect",
        308 => "Permanent Redirect",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        409 => "Conflict",
        413 => "Payload Too Large",
        415 => "Unsupported Media Type",
        422 => "Unprocessable Entity",
        429 => "Too Many Requests",
        500 => "Internal Server Error",
        501 => "Not Implemented",
        502 => "Bad Gateway",
        503 => "Service Unavailable",
        504 => "Gateway Timeout",
        _ => "Unknown",
    }
}
