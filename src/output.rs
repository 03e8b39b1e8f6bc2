use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::cli::ProxyType;
use crate::error::{CheckerError, CheckerResult};
use crate::targets::AddressRecord;

pub const DEFAULT_OUTPUT_FILE: &str = "working_proxies.txt";

/// Writes reachable targets as a proxychains `[ProxyList]` body.
pub struct ProxyListWriter {
    proxy_type: ProxyType,
    path: PathBuf,
}

impl ProxyListWriter {
    pub fn new(proxy_type: ProxyType, path: PathBuf) -> Self {
        Self { proxy_type, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create or truncate the file and write one line per proxy, in order.
    ///
    /// Lines already written stay on disk if a later write fails.
    pub fn write(&self, proxies: &[AddressRecord]) -> CheckerResult<()> {
        let to_error = |source| CheckerError::FileWrite {
            path: self.path.clone(),
            source,
        };

        let file = File::create(&self.path).map_err(to_error)?;
        let mut writer = BufWriter::new(file);
        self.write_to(&mut writer, proxies).map_err(to_error)?;
        writer.flush().map_err(to_error)?;

        tracing::info!(count = proxies.len(), path = %self.path.display(), "wrote proxy list");
        Ok(())
    }

    pub fn write_to<W: Write>(&self, out: &mut W, proxies: &[AddressRecord]) -> io::Result<()> {
        for proxy in proxies {
            out.write_all(self.format_line(proxy).as_bytes())?;
        }
        Ok(())
    }

    pub fn format_line(&self, proxy: &AddressRecord) -> String {
        format!("{} {} {}\n", self.proxy_type, proxy.host, proxy.port)
    }
}
