use chrono::{DateTime, Utc};

use crate::prober::Prober;
use crate::report::Reporter;
use crate::targets::AddressRecord;

/// Outcome of a full pass over the target list.
#[derive(Debug, Clone)]
pub struct ScanSummary {
    pub total: usize,
    /// Reachable targets, in input order.
    pub reachable: Vec<AddressRecord>,
    pub started: DateTime<Utc>,
    pub finished: DateTime<Utc>,
}

impl ScanSummary {
    pub fn elapsed_secs(&self) -> f64 {
        (self.finished - self.started).num_milliseconds() as f64 / 1000.0
    }
}

/// Probes targets one at a time and reports each result before moving on.
pub struct Checker<'a> {
    prober: &'a dyn Prober,
    reporter: &'a mut dyn Reporter,
}

impl<'a> Checker<'a> {
    pub fn new(prober: &'a dyn Prober, reporter: &'a mut dyn Reporter) -> Self {
        Self { prober, reporter }
    }

    pub async fn check_all(&mut self, targets: &[AddressRecord]) -> ScanSummary {
        let started = Utc::now();
        let mut reachable = Vec::new();

        for target in targets {
            let is_reachable = self.prober.is_reachable(target).await;

            if let Err(e) = self.reporter.report(target, is_reachable) {
                tracing::warn!(error = %e, "failed to print result");
            }

            if is_reachable {
                reachable.push(target.clone());
            }
        }

        let summary = ScanSummary {
            total: targets.len(),
            reachable,
            started,
            finished: Utc::now(),
        };

        tracing::debug!(
            total = summary.total,
            reachable = summary.reachable.len(),
            elapsed = summary.elapsed_secs(),
            "scan finished"
        );
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prober::ProbeStatus;
    use crate::report::PlainReporter;
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    /// Answers from a fixed set of open ports and records the probe order.
    struct FakeProber {
        open: HashSet<String>,
        seen: Mutex<Vec<String>>,
    }

    impl FakeProber {
        fn new(open: &[&str]) -> Self {
            Self {
                open: open.iter().map(|s| s.to_string()).collect(),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Prober for FakeProber {
        async fn probe(&self, target: &AddressRecord) -> ProbeStatus {
            self.seen.lock().unwrap().push(target.to_string());
            if self.open.contains(&target.to_string()) {
                ProbeStatus::Open
            } else {
                ProbeStatus::Refused
            }
        }
    }

    fn targets() -> Vec<AddressRecord> {
        vec![
            AddressRecord::new("5.6.7.8", "9050"),
            AddressRecord::new("10.0.0.1", "3128"),
            AddressRecord::new("1.2.3.4", "1080"),
            AddressRecord::new("5.6.7.8", "9050"),
        ]
    }

    #[tokio::test]
    async fn test_order_is_preserved() {
        let prober = FakeProber::new(&["1.2.3.4:1080", "5.6.7.8:9050"]);
        let mut out = Vec::new();
        let mut reporter = PlainReporter::new(&mut out);

        let summary = Checker::new(&prober, &mut reporter)
            .check_all(&targets())
            .await;

        assert_eq!(summary.total, 4);
        assert_eq!(
            summary.reachable,
            vec![
                AddressRecord::new("5.6.7.8", "9050"),
                AddressRecord::new("1.2.3.4", "1080"),
                AddressRecord::new("5.6.7.8", "9050"),
            ]
        );
        assert_eq!(
            *prober.seen.lock().unwrap(),
            vec!["5.6.7.8:9050", "10.0.0.1:3128", "1.2.3.4:1080", "5.6.7.8:9050"]
        );

        drop(reporter);
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "[+] 5.6.7.8:9050\n[-] 10.0.0.1:3128\n[+] 1.2.3.4:1080\n[+] 5.6.7.8:9050\n"
        );
        assert!(summary.finished >= summary.started);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let prober = FakeProber::new(&[]);
        let mut reporter = PlainReporter::new(Vec::new());

        let summary = Checker::new(&prober, &mut reporter).check_all(&[]).await;

        assert_eq!(summary.total, 0);
        assert!(summary.reachable.is_empty());
    }

    #[tokio::test]
    async fn test_against_real_listener() {
        use crate::prober::TcpProber;
        use tokio::net::TcpListener;

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let open = listener.local_addr().unwrap().port().to_string();
        let closed = {
            let l = TcpListener::bind("127.0.0.1:0").await.unwrap();
            l.local_addr().unwrap().port().to_string()
        };

        let prober = TcpProber::default();
        let mut reporter = PlainReporter::new(Vec::new());
        let list = vec![
            AddressRecord::new("127.0.0.1", closed),
            AddressRecord::new("127.0.0.1", open.clone()),
        ];

        let summary = Checker::new(&prober, &mut reporter).check_all(&list).await;
        assert_eq!(summary.reachable, vec![AddressRecord::new("127.0.0.1", open)]);
    }
}
