mod line;
mod line_pool;

pub use {
    line::{Line, SendError},
    line_pool::{LinePool, serve_stream},
};
