
use std::{
    io,
    io::{BufRead, Read},
};

use percent_encoding::percent_decode_str;

use super::{
    method,
    headers::HTTP_HEADER_CONTENT_LENGTH,
};

const MAX_HTTP_LINE_LENGTH: usize = 4096;
const MAX_HTTP_BODY_LENGTH: usize = 8 * 1024 * 1024;

pub struct Req {
    method: method::Method,
    path: String,
    raw_path: String,
    query: Option<String>,
    version: String,
    headers: Vec<(String, String)>,
    body: Vec<u8>,
}

impl Req {
    pub fn new(s: &mut impl BufRead) -> io::Result<Self> {
        let mut req = Req::default();
        let first_line = read_until_new_line(s)?;
        let mut iter = first_line.split_whitespace();
        match iter.next() {
            Some(mstr) => req.method = method::Method::from(mstr),
            None => return Err(invalid_data("tcp stream doesn't have valid http first line")),
        }

        match iter.next() {
            Some(target) => req.set_target(target)?,
            None => return Err(invalid_data("http first line doesn't have a request target")),
        }

        if let Some(version) = iter.next() {
            req.version = version.to_string();
        }
        req.parse_headers(s)?;
        req.read_body(s)?;

        Ok(req)
    }

    fn set_target(&mut self, target: &str) -> io::Result<()> {
        let (raw_path, query) = match target.split_once('?') {
            Some((path, query)) => (path, Some(query.to_string())),
            None => (target, None),
        };
        self.path = percent_decode_str(raw_path)
            .decode_utf8()
            .map_err(|_| invalid_data("request path is not valid utf8 once decoded"))?
            .into_owned();
        self.raw_path = raw_path.to_string();
        self.query = query;
        Ok(())
    }

    fn parse_headers(&mut self, stream: &mut impl BufRead) -> io::Result<()> {
        loop {
            let line = read_until_new_line(stream)?;
            if line.is_empty() {
                return Ok(());
            }
            self.headers.push(split_header_line(&line));
        }
    }

    fn read_body(&mut self, stream: &mut impl BufRead) -> io::Result<()> {
        let len = match self.header(HTTP_HEADER_CONTENT_LENGTH) {
            Some(v) => v.parse::<usize>().map_err(|_| invalid_data("invalid Content-Length"))?,
            None => return Ok(()),
        };
        if len > MAX_HTTP_BODY_LENGTH {
            return Err(invalid_data(&format!("HTTP body length exceed maximum({})", MAX_HTTP_BODY_LENGTH)));
        }
        self.body = vec![0u8; len];
        stream.read_exact(&mut self.body)
    }

    pub fn method(&self) -> &method::Method {
        &self.method
    }

    /// The percent-decoded request target up to, not including, the `?`.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The path exactly as it appeared on the request line.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    /// Raw query string, left unparsed.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

impl Default for Req {
    fn default()->Self {
        Self {
            method: method::Method::GET,
            path: "/".to_string(),
            raw_path: "/".to_string(),
            query: None,
            version: "HTTP/1.1".to_string(),
            headers: Vec::new(),
            body: Vec::new(),
        }
    }
}

fn invalid_data(msg: &str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, msg.to_string())
}

fn read_until_new_line(s: &mut impl BufRead) -> io::Result<String> {
    let mut buf = Vec::with_capacity(256);
    let n = s.take(MAX_HTTP_LINE_LENGTH as u64 + 2).read_until(b'\n', &mut buf)?;
    if n == 0 {
        return Err(io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed before end of http head"));
    }
    if buf.last() != Some(&b'\n') {
        return Err(io::Error::new(
            io::ErrorKind::Other,
            format!("HTTP header line length exceed maximum({})", MAX_HTTP_LINE_LENGTH),
        ));
    }
    buf.pop();
    if buf.last() == Some(&b'\r') {
        buf.pop();
    }
    String::from_utf8(buf).map_err(|_| invalid_data("http head is not valid utf8"))
}

fn split_header_line(line: &str) -> (String, String) {
    match line.split_once(':') {
        Some((k, v)) => (k.trim().to_string(), v.trim().to_string()),
        None => (line.trim().to_string(), String::new()),
    }
}
