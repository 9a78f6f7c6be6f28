use {
    std::{net, sync, sync::mpsc, thread, time},
    thiserror::Error,
    super::serve_stream,
    super::super::http,
    crate::logger::micro::*,
};

/// Streams a line holds on top of the one being served.
const LINE_QUEUE_DEPTH: usize = 2;
const STREAM_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("line is busy")]
    LineBusy,
    #[error("line worker has exited")]
    Disconnected,
}

/// A worker thread answering routed requests, one connection at a time.
pub struct Line {
    id: usize,
    queue: mpsc::SyncSender<net::TcpStream>,
    worker: thread::JoinHandle<()>,
}

impl Line {
    pub fn spawn(id: usize, router: sync::Arc<http::Router>) -> Self {
        let (queue, incoming) = mpsc::sync_channel::<net::TcpStream>(LINE_QUEUE_DEPTH);
        let worker = thread::spawn(move || {
            for stream in incoming {
                serve_connection(id, &router, stream);
            }
            trace!("line#{} drained", id);
        });
        Line { id, queue, worker }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    /// True once the worker thread is gone, e.g. after a handler panicked.
    pub fn is_finished(&self) -> bool {
        self.worker.is_finished()
    }

    /// Queues the stream, handing it back when the line can't take it.
    pub fn send(&self, stream: net::TcpStream) -> Result<(), (net::TcpStream, SendError)> {
        self.queue.try_send(stream).map_err(|e| match e {
            mpsc::TrySendError::Full(s) => (s, SendError::LineBusy),
            mpsc::TrySendError::Disconnected(s) => (s, SendError::Disconnected),
        })
    }
}

fn serve_connection(id: usize, router: &http::Router, stream: net::TcpStream) {
    let timeout = Some(time::Duration::from_secs(STREAM_TIMEOUT_SECS));
    if let Err(e) = stream.set_read_timeout(timeout).and_then(|_| stream.set_write_timeout(timeout)) {
        warn!("line#{}: failed to set stream timeouts: {}", id, e);
    }
    if let Err(e) = serve_stream(router, &stream) {
        debug!("line#{}: connection ended without a response: {}", id, e);
    }
    if let Err(e) = stream.shutdown(net::Shutdown::Both) {
        trace!("line#{}: stream shutdown: {}", id, e);
    }
}
