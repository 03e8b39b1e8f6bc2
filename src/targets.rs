use std::fmt;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use crate::error::{CheckerError, CheckerResult};

/// A host/port pair read from the target list.
///
/// Neither part is validated; the prober is the one that finds out whether
/// the pair makes sense.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRecord {
    pub host: String,
    pub port: String,
}

impl AddressRecord {
    pub fn new(host: impl Into<String>, port: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: port.into(),
        }
    }

    /// String handed to the resolver when dialing.
    pub fn authority(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl fmt::Display for AddressRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.host, self.port)
    }
}

fn is_delimiter(c: char) -> bool {
    c == ':' || c.is_whitespace()
}

/// Parse one line of the target list.
///
/// Lines that do not split into exactly two tokens are skipped.
pub fn parse_line(line: &str) -> Option<AddressRecord> {
    let mut tokens = line.trim().split(is_delimiter).filter(|t| !t.is_empty());

    let host = tokens.next()?;
    let port = tokens.next()?;
    if tokens.next().is_some() {
        return None;
    }

    Some(AddressRecord::new(host, port))
}

pub fn parse_targets<R: BufRead>(reader: R) -> io::Result<Vec<AddressRecord>> {
    let mut targets = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line = line?;
        match parse_line(&line) {
            Some(record) => targets.push(record),
            None => tracing::trace!(line = index + 1, "skipping malformed target line"),
        }
    }

    Ok(targets)
}

/// Read every target from the file at `path`, in file order.
pub fn load_targets(path: &Path) -> CheckerResult<Vec<AddressRecord>> {
    let to_error = |source| CheckerError::FileAccess {
        path: path.to_path_buf(),
        source,
    };

    let file = File::open(path).map_err(to_error)?;
    let targets = parse_targets(BufReader::new(file)).map_err(to_error)?;

    tracing::debug!(count = targets.len(), path = %path.display(), "loaded targets");
    Ok(targets)
}
