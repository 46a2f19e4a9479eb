//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter        | Implements   | Connects to                 |
//! |----------------|--------------|-----------------------------|
//! | `audio`        | AudioPort    | Log output (no speaker)     |
//! | `channel_sink` | EventSink    | `mpsc` subscribers          |
//! | `config_file`  | ConfigPort   | JSON file on disk           |
//! | `log_sink`     | EventSink    | `log` facade                |
//! | `memory_link`  | ByteLink     | In-process bounded pipe     |
//! | `time`         | Clock        | `Instant` / virtual time    |

pub mod audio;
pub mod channel_sink;
pub mod config_file;
pub mod log_sink;
pub mod memory_link;
pub mod time;
