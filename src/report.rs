use std::io::{self, Write};

use colored::*;

use crate::targets::AddressRecord;

/// Sink for per-target results, called once per probe in input order.
pub trait Reporter {
    fn report(&mut self, target: &AddressRecord, reachable: bool) -> io::Result<()>;
}

fn marker(reachable: bool) -> &'static str {
    if reachable {
        "[+]"
    } else {
        "[-]"
    }
}

/// `[+]`/`[-]` marker in green/red, followed by `host:port`.
pub struct ColoredReporter<W: Write> {
    out: W,
}

impl<W: Write> ColoredReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for ColoredReporter<W> {
    fn report(&mut self, target: &AddressRecord, reachable: bool) -> io::Result<()> {
        let marker = if reachable {
            marker(true).green()
        } else {
            marker(false).red()
        };
        writeln!(self.out, "{} {}", marker, target)?;
        self.out.flush()
    }
}

pub struct PlainReporter<W: Write> {
    out: W,
}

impl<W: Write> PlainReporter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Reporter for PlainReporter<W> {
    fn report(&mut self, target: &AddressRecord, reachable: bool) -> io::Result<()> {
        writeln!(self.out, "{} {}", marker(reachable), target)?;
        self.out.flush()
    }
}

/// Reporter writing to stdout.
pub fn stdout_reporter(color: bool) -> Box<dyn Reporter> {
    if color {
        Box::new(ColoredReporter::new(io::stdout()))
    } else {
        Box::new(PlainReporter::new(io::stdout()))
    }
}
