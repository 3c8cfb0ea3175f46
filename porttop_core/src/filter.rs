//! Client-side filtering shared by every view.

use crate::classify::ServiceKind;
use crate::types::EnrichedPort;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PortFilter {
    /// Case-insensitive substring over port, type, command, user and label.
    pub text: String,
    /// Restrict to one service type.
    pub kind: Option<ServiceKind>,
}

impl PortFilter {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind: None,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.kind.is_none()
    }

    pub fn matches(&self, p: &EnrichedPort) -> bool {
        if self.kind.is_some_and(|k| k != p.kind) {
            return false;
        }
        let query = self.text.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        p.port().to_string().contains(&query)
            || p.service_type.to_lowercase().contains(&query)
            || p.record.command.to_lowercase().contains(&query)
            || p.record.user.to_lowercase().contains(&query)
            || p
                .custom_name
                .as_deref()
                .is_some_and(|n| n.to_lowercase().contains(&query))
    }

    /// Indices of matching entries, in input order.
    pub fn apply(&self, ports: &[EnrichedPort]) -> Vec<usize> {
        ports
            .iter()
            .enumerate()
            .filter(|(_, p)| self.matches(p))
            .map(|(i, _)| i)
            .collect()
    }
}

/// Each service type present with its count, in order of first appearance.
pub fn type_counts(ports: &[EnrichedPort]) -> Vec<(ServiceKind, usize)> {
    let mut counts: Vec<(ServiceKind, usize)> = Vec::new();
    for p in ports {
        match counts.iter_mut().find(|(k, _)| *k == p.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((p.kind, 1)),
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enrich::enrich_with;
    use crate::labels::LabelStore;
    use crate::types::{PortRecord, ResourceUsage};

    fn ports() -> Vec<EnrichedPort> {
        let labels = LabelStore::in_memory();
        labels.set(8080, "Billing API").unwrap();
        [
            (3000, "node", "alice"),
            (5432, "postgres", "postgres"),
            (8080, "java", "bob"),
            (9229, "node", "alice"),
        ]
        .into_iter()
        .enumerate()
        .map(|(i, (port, command, user))| {
            let r = PortRecord {
                port,
                pid: 100 + i as u32,
                user: user.into(),
                command: command.into(),
            };
            enrich_with(&r, ResourceUsage::unknown(), &labels)
        })
        .collect()
    }

    #[test]
    fn empty_filter_matches_all() {
        let ps = ports();
        assert_eq!(PortFilter::default().apply(&ps), vec![0, 1, 2, 3]);
    }

    #[test]
    fn text_matches_each_column() {
        let ps = ports();
        assert_eq!(PortFilter::text("543").apply(&ps), vec![1]);
        assert_eq!(PortFilter::text("POSTGRESQL").apply(&ps), vec![1]);
        assert_eq!(PortFilter::text("java").apply(&ps), vec![2]);
        assert_eq!(PortFilter::text("bob").apply(&ps), vec![2]);
        assert_eq!(PortFilter::text("billing").apply(&ps), vec![2]);
        assert!(PortFilter::text("nothing-here").apply(&ps).is_empty());
    }

    #[test]
    fn kind_filter_combines_with_text() {
        let ps = ports();
        let f = PortFilter {
            text: String::new(),
            kind: Some(ServiceKind::NodeJs),
        };
        // 3000 is classified by port, not by command
        assert_eq!(f.apply(&ps), vec![3]);
        let f = PortFilter {
            text: "alice".into(),
            kind: Some(ServiceKind::ReactNext),
        };
        assert_eq!(f.apply(&ps), vec![0]);
    }

    #[test]
    fn counts_in_first_seen_order() {
        let ps = ports();
        assert_eq!(
            type_counts(&ps),
            vec![
                (ServiceKind::ReactNext, 1),
                (ServiceKind::PostgreSql, 1),
                (ServiceKind::TomcatHttp, 1),
                (ServiceKind::NodeJs, 1),
            ]
        );
    }
}
