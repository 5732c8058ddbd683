//! # ActionLog: sequence-numbered, atomically written protocol log.
//!
//! ```text
//! log(action)
//!   └─► lock ─► seq += 1 ─► write "<seq>: <action>\n" ─► flush ─► publish ActionLogged ─► unlock
//! ```
//!
//! ## Rules
//! - Numbers run 1, 2, 3, … with no gaps or repeats.
//! - Sink order equals numbering order: both happen under one lock.
//! - Every line is flushed before the lock is released.
//! - A write error never stops numbering; the first one is kept and returned by
//!   [`ActionLog::close`]. Workers must not stall on a broken sink.
//! - This lock is a leaf: nothing else is ever acquired while it is held.

use std::io::{self, Write};

use tokio::sync::Mutex;

use crate::events::{Action, Bus, Event};

/// Destination of the action log.
pub type LogSink = Box<dyn Write + Send>;

struct LogState {
    seq: u64,
    sink: Option<LogSink>,
    failure: Option<io::Error>,
}

/// Shared, ordered writer of protocol actions.
pub struct ActionLog {
    state: Mutex<LogState>,
    bus: Bus,
}

impl ActionLog {
    /// Creates a log writing to `sink` and mirroring each line onto `bus`.
    pub fn new(sink: LogSink, bus: Bus) -> Self {
        Self {
            state: Mutex::new(LogState {
                seq: 0,
                sink: Some(sink),
                failure: None,
            }),
            bus,
        }
    }

    /// Numbers and writes one action; returns its line number.
    pub async fn log(&self, action: Action) -> u64 {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        state.seq += 1;
        let line = state.seq;

        if let Some(sink) = state.sink.as_mut() {
            let written = writeln!(sink, "{line}: {action}").and_then(|()| sink.flush());
            if let Err(e) = written {
                state.failure.get_or_insert(e);
            }
        }

        self.bus.publish(Event::logged(line, action));
        line
    }

    /// Number of lines assigned so far.
    pub async fn count(&self) -> u64 {
        self.state.lock().await.seq
    }

    /// Flushes and drops the sink.
    ///
    /// Returns the first write error seen during the run, if any. Later calls
    /// to [`log`](Self::log) still number lines but write nowhere.
    pub async fn close(&self) -> io::Result<()> {
        let mut state = self.state.lock().await;
        let flushed = match state.sink.take() {
            Some(mut sink) => sink.flush(),
            None => Ok(()),
        };
        match state.failure.take() {
            Some(e) => Err(e),
            None => flushed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::EventKind;
    use crate::workshop::MemorySink;
    use std::sync::Arc;

    struct BrokenSink;

    impl Write for BrokenSink {
        fn write(&mut self, _: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn lines_are_numbered_from_one() {
        let sink = MemorySink::new();
        let log = ActionLog::new(Box::new(sink.clone()), Bus::new(16));

        assert_eq!(log.log(Action::SantaSleeping).await, 1);
        assert_eq!(log.log(Action::ElfStarted(1)).await, 2);
        assert_eq!(log.count().await, 2);

        assert_eq!(
            sink.lines(),
            vec!["1: Santa: going to sleep", "2: Elf 1: started"]
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writers_never_reorder_lines() {
        let sink = MemorySink::new();
        let log = Arc::new(ActionLog::new(Box::new(sink.clone()), Bus::new(16)));

        let mut handles = Vec::new();
        for id in 1..=8u16 {
            let log = Arc::clone(&log);
            handles.push(tokio::spawn(async move {
                for _ in 0..50 {
                    log.log(Action::ElfNeedHelp(id)).await;
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let lines = sink.lines();
        assert_eq!(lines.len(), 400);
        for (i, line) in lines.iter().enumerate() {
            let (n, _) = line.split_once(": ").unwrap();
            assert_eq!(n.parse::<usize>().unwrap(), i + 1);
        }
    }

    #[tokio::test]
    async fn every_line_is_mirrored_on_the_bus() {
        let bus = Bus::new(16);
        let mut rx = bus.subscribe();
        let log = ActionLog::new(Box::new(io::sink()), bus);

        log.log(Action::ReindeerHome(2)).await;

        let ev = rx.recv().await.unwrap();
        assert_eq!(ev.kind, EventKind::ActionLogged);
        assert_eq!(ev.line, Some(1));
        assert_eq!(ev.action, Some(Action::ReindeerHome(2)));
    }

    #[tokio::test]
    async fn write_failure_is_reported_on_close_without_stopping_numbering() {
        let log = ActionLog::new(Box::new(BrokenSink), Bus::new(16));

        assert_eq!(log.log(Action::SantaSleeping).await, 1);
        assert_eq!(log.log(Action::SantaHelping).await, 2);

        let err = log.close().await.unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(log.close().await.is_ok());
    }
}
