use {
    std::{net, io, io::Write, sync},
    super::*,
    super::super::http,
    crate::logger::micro::*,
};

/// Spreads accepted streams over worker lines, growing up to `max_line` of them.
pub struct LinePool {
    lines: Vec<Line>,
    max_line: usize,
    router: sync::Arc<http::Router>,
}

impl LinePool {
    pub fn new(max_line: usize, router: sync::Arc<http::Router>) -> Self {
        LinePool {
            lines: vec![],
            max_line: max_line.max(1),
            router,
        }
    }

    pub fn handle(&mut self, s: net::TcpStream) {
        let before = self.lines.len();
        self.lines.retain(|l| !l.is_finished());
        if self.lines.len() < before {
            debug!("{} finished line(s) dropped. line count:{}", before - self.lines.len(), self.lines.len());
        }
        if let Some(s) = self.send_to_line(s, 0) {
            warn!("out of capacity to handle incoming TCP stream");
            if let Err(e) = s.shutdown(net::Shutdown::Both) {
                error!("failed to shut down over capacity TCP stream: {}", e);
            }
        }
    }

    fn add_new_line(&mut self) {
        let id = self.lines.len();
        self.lines.push(Line::spawn(id, self.router.clone()));
        debug!("new line added. line count:{}", self.lines.len());
    }

    /// Returns the stream back when every line is busy and no line can be added.
    fn send_to_line(&mut self, s: net::TcpStream, idx: usize) -> Option<net::TcpStream> {
        if idx == self.lines.len() {
            if self.lines.len() >= self.max_line {
                return Some(s);
            }
            self.add_new_line();
        }
        match self.lines[idx].send(s) {
            Ok(_) => None,
            Err((s_back, e)) => {
                trace!("line#{}: {}", self.lines[idx].id(), e);
                match e {
                    SendError::LineBusy => self.send_to_line(s_back, idx + 1),
                    SendError::Disconnected => {
                        self.lines.remove(idx);
                        debug!("line#{} removed due to disconnection", idx);
                        self.send_to_line(s_back, idx)
                    }
                }
            }
        }
    }
}

/// Reads one request off the stream, routes it and makes sure something is written back.
pub fn serve_stream<S>(router: &http::Router, s: S) -> io::Result<()>
where
    S: io::Read + io::Write,
{
    let mut stream = s;
    let parsed = {
        let mut buf_read = io::BufReader::new(&mut stream);
        http::Req::new(&mut buf_read)
    };
    let mut buf_write = io::BufWriter::new(&mut stream);
    let mut res = http::Res::new(&mut buf_write);
    let req = match parsed {
        Ok(req) => req,
        Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => return Err(e),
        Err(e) => {
            warn!("bad request: {}", e);
            res.set_status(400);
            return res.respond(b"Bad Request");
        },
    };
    info!("{} {}", req.method(), req.path());
    res.set_head_only(*req.method() == http::Method::HEAD);
    router.serve(&req, &mut res);
    if !res.responded() {
        res.respond(b"")?;
    }
    drop(res);
    buf_write.flush()
}

#[cfg(test)]
mod line_pool_tests {
    use {
        super::*,
        std::{
            io::{Cursor, Read},
            sync::{mpsc, Arc, Mutex},
            thread, time,
        },
        crate::server::http::Ctx,
    };

    /// In-memory stream: reads the request, collects whatever is written.
    struct MockStream {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl MockStream {
        fn new(raw: &str) -> Self {
            MockStream { input: Cursor::new(raw.as_bytes().to_vec()), output: vec![] }
        }
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn test_router() -> http::Router {
        let mut router = http::Router::new();
        router.get("/hello", |ctx: &mut Ctx| {
            ctx.res().respond(b"Hello").unwrap();
        }).unwrap();
        router.delete("/users/:id", |_: &mut Ctx| {}).unwrap();
        router
    }

    fn run(router: &http::Router, raw: &str) -> String {
        let mut stream = MockStream::new(raw);
        serve_stream(router, &mut stream).unwrap();
        String::from_utf8(stream.output).unwrap()
    }

    #[test]
    fn routes_and_writes_response() {
        let out = run(&test_router(), "GET /hello HTTP/1.1\r\nHost: localhost\r\n\r\n");
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.ends_with("\r\n\r\nHello"));
    }

    #[test]
    fn silent_handler_gets_empty_ok() {
        let out = run(&test_router(), "DELETE /users/3 HTTP/1.1\r\n\r\n");
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.contains("Content-Length: 0\r\n"));
    }

    #[test]
    fn head_request_omits_body() {
        let out = run(&test_router(), "HEAD /hello HTTP/1.1\r\n\r\n");
        assert!(out.starts_with("HTTP/1.1 200 OK\r\n"));
        assert!(out.contains("Content-Length: 5\r\n"));
        assert!(!out.contains("Hello"));
    }

    #[test]
    fn fallbacks_reach_the_wire() {
        let router = test_router();
        assert!(run(&router, "GET /nope HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 404 Not Found\r\n"));
        assert!(run(&router, "POST /hello HTTP/1.1\r\n\r\n").starts_with("HTTP/1.1 405 Method Not Allowed\r\n"));
    }

    #[test]
    fn malformed_request_is_bad_request() {
        let out = run(&test_router(), "GET\r\n\r\n");
        assert!(out.starts_with("HTTP/1.1 400 Bad Request\r\n"));
    }

    #[test]
    fn closed_connection_writes_nothing() {
        let mut stream = MockStream::new("");
        assert!(serve_stream(&test_router(), &mut stream).is_err());
        assert!(stream.output.is_empty());
    }

    fn connect(listener: &net::TcpListener, raw: &str) -> (net::TcpStream, net::TcpStream) {
        let mut client = net::TcpStream::connect(listener.local_addr().unwrap()).unwrap();
        client.write_all(raw.as_bytes()).unwrap();
        let (conn, _) = listener.accept().unwrap();
        (client, conn)
    }

    fn read_all(mut client: net::TcpStream) -> String {
        let mut out = String::new();
        client.read_to_string(&mut out).unwrap();
        out
    }

    #[test]
    fn sheds_streams_beyond_capacity() {
        let listener = net::TcpListener::bind("127.0.0.1:0").unwrap();
        let (started_tx, started) = mpsc::channel::<()>();
        let (release, release_rx) = mpsc::channel::<()>();
        let (started_tx, release_rx) = (Mutex::new(started_tx), Mutex::new(release_rx));
        let mut router = test_router();
        router.get("/hold", move |ctx: &mut Ctx| {
            started_tx.lock().unwrap().send(()).unwrap();
            release_rx.lock().unwrap().recv().unwrap();
            ctx.res().respond(b"done").unwrap();
        }).unwrap();
        let mut pool = LinePool::new(1, Arc::new(router));

        let (first, conn) = connect(&listener, "GET /hold HTTP/1.1\r\n\r\n");
        pool.handle(conn);
        started.recv().unwrap();
        let mut queued = vec![first];
        for _ in 0..2 {
            let (client, conn) = connect(&listener, "GET /hold HTTP/1.1\r\n\r\n");
            pool.handle(conn);
            queued.push(client);
        }

        // the only line is serving one stream with two more waiting
        let (rejected, conn) = connect(&listener, "");
        pool.handle(conn);
        assert_eq!(pool.lines.len(), 1);
        assert_eq!(read_all(rejected), "");

        for _ in 0..queued.len() {
            release.send(()).unwrap();
        }
        for client in queued {
            assert!(read_all(client).ends_with("done"));
        }
    }

    #[test]
    fn replaces_line_lost_to_a_panic() {
        let listener = net::TcpListener::bind("127.0.0.1:0").unwrap();
        let mut router = test_router();
        router.get("/boom", |_: &mut Ctx| panic!("handler blew up")).unwrap();
        let mut pool = LinePool::new(1, Arc::new(router));

        let (_boom, conn) = connect(&listener, "GET /boom HTTP/1.1\r\n\r\n");
        pool.handle(conn);
        for _ in 0..200 {
            if pool.lines[0].is_finished() {
                break;
            }
            thread::sleep(time::Duration::from_millis(10));
        }
        assert!(pool.lines[0].is_finished());

        let (client, conn) = connect(&listener, "GET /hello HTTP/1.1\r\n\r\n");
        pool.handle(conn);
        assert_eq!(pool.lines.len(), 1);
        assert!(read_all(client).ends_with("\r\n\r\nHello"));
    }
}
