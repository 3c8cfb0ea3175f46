//! The narrow interface every view talks to: scan, enrich, terminate, labels.
//!
//! Cloning is cheap (shared handles), so views can move a clone into a spawned poll.

use std::sync::Arc;

use futures::future::join_all;
use sysinfo::System;
use tokio::sync::Mutex;
use tracing::warn;

use crate::config::CoreConfig;
use crate::enrich::enrich_with;
use crate::error::{ScanError, TerminateError};
use crate::labels::LabelStore;
use crate::runner::{CommandRunner, SystemRunner};
use crate::scanner;
use crate::terminate;
use crate::types::{EnrichedPort, PortRecord, ResourceUsage, Snapshot};
use crate::usage::{self, SharedSystem, UsageSource};

#[derive(Clone)]
enum UsageBackend {
    Ps,
    Sysinfo(SharedSystem),
}

impl UsageBackend {
    fn new(source: UsageSource) -> Self {
        match source {
            UsageSource::Ps => UsageBackend::Ps,
            UsageSource::Sysinfo => UsageBackend::Sysinfo(Arc::new(Mutex::new(System::new()))),
        }
    }
}

pub struct PortPipeline<R = SystemRunner> {
    runner: Arc<R>,
    labels: Arc<LabelStore>,
    usage: UsageBackend,
}

impl<R> Clone for PortPipeline<R> {
    fn clone(&self) -> Self {
        Self {
            runner: Arc::clone(&self.runner),
            labels: Arc::clone(&self.labels),
            usage: self.usage.clone(),
        }
    }
}

impl PortPipeline<SystemRunner> {
    /// Real commands with the configured timeout and the label file at `labels_path`.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(
            SystemRunner::new(cfg.command_timeout),
            LabelStore::open(cfg.labels_path.clone()),
            cfg.usage_source,
        )
    }
}

impl<R: CommandRunner> PortPipeline<R> {
    pub fn new(runner: R, labels: LabelStore, source: UsageSource) -> Self {
        Self {
            runner: Arc::new(runner),
            labels: Arc::new(labels),
            usage: UsageBackend::new(source),
        }
    }

    pub fn labels(&self) -> &LabelStore {
        &self.labels
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub async fn try_scan(&self) -> Result<Vec<PortRecord>, ScanError> {
        scanner::try_scan(self.runner.as_ref()).await
    }

    /// Listening sockets; a failed scan reads as none.
    pub async fn scan(&self) -> Vec<PortRecord> {
        scanner::scan(self.runner.as_ref()).await
    }

    pub async fn usage(&self, pid: u32) -> ResourceUsage {
        match &self.usage {
            UsageBackend::Ps => usage::query_ps(self.runner.as_ref(), pid).await,
            UsageBackend::Sysinfo(sys) => usage::query_sysinfo(sys, pid).await,
        }
    }

    pub async fn enrich(&self, record: &PortRecord) -> EnrichedPort {
        let usage = self.usage(record.pid).await;
        enrich_with(record, usage, &self.labels)
    }

    /// Fan out one enrichment per record and wait for all; output keeps input order.
    pub async fn enrich_all(&self, records: &[PortRecord]) -> Vec<EnrichedPort> {
        join_all(records.iter().map(|r| self.enrich(r))).await
    }

    /// Scan and enrich everything; a scan failure is kept alongside the empty list.
    pub async fn snapshot(&self) -> Snapshot {
        match self.try_scan().await {
            Ok(records) => Snapshot {
                ports: self.enrich_all(&records).await,
                scan_error: None,
            },
            Err(e) => {
                warn!("{e}");
                Snapshot {
                    ports: Vec::new(),
                    scan_error: Some(e.to_string()),
                }
            }
        }
    }

    pub async fn terminate(&self, port: u16) -> Result<Vec<u32>, TerminateError> {
        terminate::terminate(self.runner.as_ref(), port).await
    }
}
