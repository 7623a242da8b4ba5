use std::io::{BufRead, BufReader, ErrorKind};
use std::time::Duration;

use anyhow::{Context, Result};
use log::info;
use serialport::SerialPort;

use crate::error::SourceError;

use super::record::{parse_record, RawSample};
use super::SampleSource;

/// Reads newline-terminated records from any buffered byte stream.
///
/// Bytes of a record interrupted by a read timeout are kept and completed on
/// the next pull, so a slow link never yields half a record.
pub struct LineSource<R> {
    reader: R,
    pending: Vec<u8>,
    read_timeout_ms: u64,
}

impl<R: BufRead + Send> LineSource<R> {
    pub fn new(reader: R, read_timeout_ms: u64) -> Self {
        Self {
            reader,
            pending: Vec::new(),
            read_timeout_ms,
        }
    }
}

impl<R: BufRead + Send> SampleSource for LineSource<R> {
    fn pull(&mut self) -> Result<RawSample, SourceError> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => return Err(SourceError::Disconnected),
            Ok(_) => {}
            Err(err) if matches!(err.kind(), ErrorKind::TimedOut | ErrorKind::WouldBlock) => {
                return Err(SourceError::Timeout(self.read_timeout_ms));
            }
            Err(err) => return Err(SourceError::Io(err)),
        }

        let bytes = std::mem::take(&mut self.pending);
        let line = String::from_utf8(bytes).map_err(|err| SourceError::Malformed {
            position: 0,
            token: String::from_utf8_lossy(err.as_bytes()).into_owned(),
        })?;
        parse_record(&line)
    }
}

pub type SerialSource = LineSource<BufReader<Box<dyn SerialPort>>>;

/// Opens the acquisition device. Failure here is fatal at start-up.
pub fn open_serial(port: &str, baud_rate: u32, read_timeout_ms: u64) -> Result<SerialSource> {
    let link = serialport::new(port, baud_rate)
        .timeout(Duration::from_millis(read_timeout_ms))
        .open()
        .with_context(|| format!("Failed to open serial port {port} at {baud_rate} baud"))?;

    info!("Opened sample link {} at {} baud", port, baud_rate);
    Ok(LineSource::new(BufReader::new(link), read_timeout_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{self, Cursor, Read};

    #[test]
    fn pulls_records_in_order_then_reports_disconnect() {
        let mut source = LineSource::new(Cursor::new(b"1,2\n3,4\n".to_vec()), 100);
        assert_eq!(source.pull().unwrap().values, vec![1.0, 2.0]);
        assert_eq!(source.pull().unwrap().values, vec![3.0, 4.0]);
        assert!(matches!(source.pull(), Err(SourceError::Disconnected)));
    }

    #[test]
    fn trailing_record_without_newline_is_unterminated() {
        let mut source = LineSource::new(Cursor::new(b"1,2".to_vec()), 100);
        assert!(matches!(source.pull(), Err(SourceError::Unterminated)));
        assert!(matches!(source.pull(), Err(SourceError::Disconnected)));
    }

    /// Yields a fixed chunk, then one timeout, then the rest.
    struct StutteringLink {
        chunks: Vec<io::Result<Vec<u8>>>,
    }

    impl Read for StutteringLink {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            if self.chunks.is_empty() {
                return Ok(0);
            }
            match self.chunks.remove(0) {
                Ok(bytes) => {
                    buf[..bytes.len()].copy_from_slice(&bytes);
                    Ok(bytes.len())
                }
                Err(err) => Err(err),
            }
        }
    }

    #[test]
    fn timeout_keeps_partial_record_for_next_pull() {
        let link = StutteringLink {
            chunks: vec![
                Ok(b"0.5,".to_vec()),
                Err(io::Error::new(ErrorKind::TimedOut, "slow")),
                Ok(b"1.5\n".to_vec()),
            ],
        };
        let mut source = LineSource::new(BufReader::new(link), 250);
        assert!(matches!(source.pull(), Err(SourceError::Timeout(250))));
        assert_eq!(source.pull().unwrap().values, vec![0.5, 1.5]);
    }
}
