//! Line input fed to the loop through a channel.
//!
//! Reading happens on a dedicated OS thread so a pending terminal read never
//! blocks the async runtime or its shutdown. The channel closes on EOF or on
//! a read error, which the loop treats as end of input.

use std::io::BufRead;
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// Lines buffered between the reader thread and the loop.
const LINE_BUFFER: usize = 16;

/// Spawns a reader over the process's standard input.
pub fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    spawn_line_reader(std::io::BufReader::new(std::io::stdin()))
}

/// Spawns a reader thread forwarding each line of `reader`.
///
/// Line terminators are stripped. The thread exits when the input ends or
/// the receiver is dropped.
pub fn spawn_line_reader<R>(reader: R) -> mpsc::Receiver<String>
where
    R: BufRead + Send + 'static,
{
    let (tx, rx) = mpsc::channel(LINE_BUFFER);

    let spawned = thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in reader.lines() {
                match line {
                    Ok(line) => {
                        if tx.blocking_send(line).is_err() {
                            debug!("Input receiver dropped, stopping reader");
                            return;
                        }
                    }
                    Err(e) => {
                        warn!(error = %e, "Failed to read input line");
                        return;
                    }
                }
            }
            debug!("Input reached end of file");
        });

    if let Err(e) = spawned {
        // The sender was moved into the failed closure and dropped, so the
        // receiver reports end of input immediately.
        warn!(error = %e, "Failed to spawn input reader thread");
    }

    rx
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[tokio::test]
    async fn forwards_lines_then_closes() {
        let mut rx = spawn_line_reader(Cursor::new("first query\r\nquit\n"));

        assert_eq!(rx.recv().await.as_deref(), Some("first query"));
        assert_eq!(rx.recv().await.as_deref(), Some("quit"));
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test]
    async fn empty_input_closes_immediately() {
        let mut rx = spawn_line_reader(Cursor::new(""));
        assert_eq!(rx.recv().await, None);
    }
}
