use std::path::PathBuf;
use std::sync::mpsc;

use serde::Serialize;

/// Observer events emitted while a dataset is assembled.
///
/// When a `progress` channel is configured in
/// [`AssembleConfig`](crate::dataset::AssembleConfig), the assembler sends
/// one event per file boundary and one per decoded record. Decoding never
/// depends on the receiver: a dropped receiver simply mutes the stream.
/// `file_index` positions an event within the manifest, which keeps the
/// stream unambiguous when files are processed in parallel.
#[derive(Debug, Clone, Serialize)]
pub enum AssembleEvent {
    FileStarted {
        file_index: usize,
        path: PathBuf,
        declared: usize,
    },
    RecordDecoded {
        file_index: usize,
        record_index: usize,
        label: String,
        serial_id: u64,
    },
    FileFinished {
        file_index: usize,
        path: PathBuf,
        decoded: usize,
        min_pixel: u8,
        max_pixel: u8,
    },
    /// Sent when a file fails with a recoverable error and the error
    /// policy keeps the run going.
    FileFailed {
        file_index: usize,
        path: PathBuf,
        error: String,
    },
}

/// Sending half of the observer channel.
pub type ProgressSender = mpsc::Sender<AssembleEvent>;

/// Sends an event if an observer is attached, ignoring a dropped receiver.
pub(crate) fn emit(progress: &Option<ProgressSender>, event: AssembleEvent) {
    if let Some(tx) = progress {
        let _ = tx.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emit_is_silent_without_an_observer() {
        emit(&None, AssembleEvent::FileStarted {
            file_index: 0,
            path: PathBuf::from("ETL4C"),
            declared: 10,
        });
    }

    #[test]
    fn emit_survives_a_dropped_receiver() {
        let (tx, rx) = mpsc::channel();
        drop(rx);
        emit(&Some(tx), AssembleEvent::FileFailed {
            file_index: 0,
            path: PathBuf::from("ETL4C"),
            error: "truncated".to_string(),
        });
    }
}
