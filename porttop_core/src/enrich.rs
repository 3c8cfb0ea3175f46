//! Metadata enricher: classification + resource usage + label for one record.

use crate::classify::classify;
use crate::labels::LabelStore;
use crate::types::{EnrichedPort, PortRecord, ResourceUsage};

/// Combine a record with its measured usage. The label is read from the store on
/// every call, so a rename shows up on the next enrichment.
pub fn enrich_with(record: &PortRecord, usage: ResourceUsage, labels: &LabelStore) -> EnrichedPort {
    let kind = classify(record.port, &record.command);
    EnrichedPort {
        record: record.clone(),
        kind,
        service_type: kind.label(),
        icon: kind.icon(),
        uptime: usage.uptime,
        memory: usage.memory,
        cpu: usage.cpu,
        custom_name: labels.get(record.port),
    }
}
