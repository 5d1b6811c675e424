use super::putval::putval_line;
use super::MetricSink;
use crate::error::SinkError;
use crate::models::metric::MetricValue;
use std::io::{BufRead, BufReader, Write};
use std::os::unix::net::UnixStream;
use std::path::PathBuf;

/// Sends `PUTVAL` commands over collectd's unixsock plugin socket.
///
/// Each command is answered with a status line such as
/// `0 Success: 1 value has been dispatched.`; a negative status is a rejection.
/// The connection is opened on first use and dropped after any error, so the
/// next dispatch reconnects.
pub struct UnixSockSink {
    path: PathBuf,
    conn: Option<BufReader<UnixStream>>,
}

impl UnixSockSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), conn: None }
    }

    fn connection(&mut self) -> Result<&mut BufReader<UnixStream>, SinkError> {
        let conn = match self.conn.take() {
            Some(c) => c,
            None    => {
                let stream = UnixStream::connect(&self.path)?;
                tracing::debug!(path = %self.path.display(), "connected to collectd unixsock");
                BufReader::new(stream)
            }
        };
        Ok(self.conn.insert(conn))
    }

    fn send(&mut self, values: &[MetricValue]) -> Result<(), SinkError> {
        let conn = self.connection()?;
        for v in values {
            writeln!(conn.get_mut(), "{}", putval_line(v))?;
            let mut reply = String::new();
            if conn.read_line(&mut reply)? == 0 {
                return Err(SinkError::Io(std::io::ErrorKind::UnexpectedEof.into()));
            }
            check_status(&reply)?;
        }
        Ok(())
    }
}

impl MetricSink for UnixSockSink {
    fn dispatch(&mut self, values: &[MetricValue]) -> Result<(), SinkError> {
        let res = self.send(values);
        if res.is_err() {
            self.conn = None;
        }
        res
    }
}

/// Parse a unixsock status line; negative status codes are errors.
fn check_status(reply: &str) -> Result<(), SinkError> {
    let reply = reply.trim();
    let (code, message) = reply.split_once(' ').unwrap_or((reply, ""));
    let status: i64 = code.parse().map_err(|_| SinkError::Rejected {
        status:  -1,
        message: format!("unparsable reply {:?}", reply),
    })?;
    if status < 0 {
        return Err(SinkError::Rejected { status, message: message.to_string() });
    }
    Ok(())
}
