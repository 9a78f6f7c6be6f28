use {
    crate::{config::Config, logger::micro::*},
    std::{
        io, net,
        sync::{Arc, atomic::{AtomicBool, Ordering}},
        thread, time,
    },
    super::{line, http},
};

const MAX_CONSECUTIVE_ACCEPT_ERRORS: usize = 64;
const ACCEPT_RETRY_DELAY_MILLIS: u64 = 10;

pub struct Server {
    listener: net::TcpListener,
    stop: Arc<AtomicBool>,
    max_lines: usize,
}

impl Server {
    pub fn bind(config: &Config) -> io::Result<Self> {
        let addr = config.addr();
        let listener = net::TcpListener::bind(&addr)?;
        info!("server created @ {}", listener.local_addr()?);
        Ok(Server{
            listener,
            stop: Arc::new(AtomicBool::new(false)),
            max_lines: config.max_lines,
        })
    }

    pub fn local_addr(&self) -> io::Result<net::SocketAddr> {
        self.listener.local_addr()
    }

    /// Setting the flag stops the accept loop after the next incoming connection.
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    /// Takes ownership of the router: registration is over once serving starts.
    pub fn serve(&self, router: http::Router) -> io::Result<()> {
        info!("server start listening with {} routes", router.len());
        let mut pool = line::LinePool::new(self.max_lines, Arc::new(router));
        let mut failures = 0usize;
        while !self.stop.load(Ordering::SeqCst) {
            match self.listener.accept() {
                Ok((stream, addr)) => {
                    failures = 0;
                    trace!("incoming connection from {}", addr);
                    pool.handle(stream);
                },
                Err(e) => {
                    failures += 1;
                    check_accept_error(e, failures)?;
                    thread::sleep(time::Duration::from_millis(ACCEPT_RETRY_DELAY_MILLIS));
                },
            }
        }
        info!("server stopped");
        Ok(())
    }
}

/// Accept errors tied to one connection (aborted, reset) or to a momentary shortage
/// such as running out of file descriptors are retried. A listener that keeps
/// failing, or fails in a way no retry fixes, ends the accept loop.
fn check_accept_error(e: io::Error, failures: usize) -> io::Result<()> {
    let fatal = matches!(e.kind(), io::ErrorKind::InvalidInput | io::ErrorKind::Unsupported);
    if fatal || failures >= MAX_CONSECUTIVE_ACCEPT_ERRORS {
        error!("accept failed {} time(s) in a row, giving up: {}", failures, e);
        return Err(e);
    }
    warn!("accept failed, retrying: {}", e);
    Ok(())
}
