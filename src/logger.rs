
use std::{
    io,
    sync::{mpsc, Mutex},
    thread,
};

use log::{Record, Metadata};
pub use log::{
    Log,
    Level,
    SetLoggerError, LevelFilter,
    set_boxed_logger, set_max_level,
};

pub mod micro {
    pub use log::{trace, debug, error, warn, info};
}

enum LogMsg {
    Line(String),
    Flush(mpsc::Sender<()>),
}

/// Formats records on the calling thread and writes them on a dedicated one,
/// so request workers never block on the log destination.
pub struct MuxLogger {
    sender: Mutex<Option<mpsc::SyncSender<LogMsg>>>,
    jhand: Option<thread::JoinHandle<()>>,
    level: Level,
}

impl MuxLogger {
    pub fn new<T: io::Write + Send + 'static>(buf_size: usize, mut destination: T, level: Level) -> Self {
        let (tx, rx) = mpsc::sync_channel(buf_size);
        let jh = thread::spawn(move || {
            for msg in rx {
                let r = match msg {
                    LogMsg::Line(line) => destination.write_all(line.as_bytes()),
                    LogMsg::Flush(done) => {
                        let r = destination.flush();
                        let _ = done.send(());
                        r
                    },
                };
                if let Err(e) = r {
                    eprintln!("logger error: {}", e);
                }
            }
            let _ = destination.flush();
        });
        Self {
            sender: Mutex::new(Some(tx)),
            jhand: Some(jh),
            level,
        }
    }

    fn send(&self, msg: LogMsg) -> bool {
        let sender = match self.sender.lock() {
            Ok(guard) => guard.clone(),
            Err(_) => return false,
        };
        match sender {
            Some(s) => s.send(msg).is_ok(),
            None => false,
        }
    }
}

impl Log for MuxLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            if !self.send(LogMsg::Line(format!("[{}] {}\n", record.level(), record.args()))) {
                eprintln!("logger error: writer thread is gone");
            }
        }
    }

    /// Blocks until every record sent so far has been written out.
    fn flush(&self) {
        let (tx, rx) = mpsc::channel();
        if self.send(LogMsg::Flush(tx)) {
            let _ = rx.recv();
        }
    }
}

impl Drop for MuxLogger {
    fn drop(&mut self) {
        if let Ok(mut sender) = self.sender.lock() {
            sender.take();
        }
        if let Some(jh) = self.jhand.take() {
            let _ = jh.join();
        }
    }
}

pub fn init_stdout_logger(msg_buffer_size: usize, level: Level) -> Result<(), SetLoggerError> {
    set_boxed_logger(Box::new(MuxLogger::new(msg_buffer_size, io::stdout(), level))).map(|()|{
        set_max_level(level.to_level_filter());
    })
}
