//! Validity gate between normalization and persistence.
//!
//! Every stored row must be chartable at fixed width, so a cycle with any
//! unmeasured field is dropped whole. A gap in the series is acceptable; a
//! partially null row is not.

use crate::sample::{GraphRow, GraphSample, StatRow, StatSnapshot};

/// Decision for one cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum Gate {
    /// Every field present; write both rows.
    Proceed(GraphRow, StatRow),
    /// At least one field unmeasured; write nothing.
    Skip {
        /// Column names of the unmeasured fields, series first.
        missing: Vec<&'static str>,
    },
}

/// Inspects both records and decides whether the cycle may be persisted.
pub fn validate(graph: &GraphSample, stat: &StatSnapshot) -> Gate {
    match (graph.to_row(), stat.to_row()) {
        (Some(graph_row), Some(stat_row)) => Gate::Proceed(graph_row, stat_row),
        _ => {
            let mut missing = graph.missing_fields();
            missing.extend(stat.missing_fields());
            Gate::Skip { missing }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::normalize::tests::complete_readings;

    #[test]
    fn test_complete_cycle_proceeds_unchanged() {
        let (graph, stat) = normalize(&complete_readings());

        match validate(&graph, &stat) {
            Gate::Proceed(graph_row, stat_row) => {
                assert_eq!(graph_row.ram_used, 4096);
                assert_eq!(graph_row.ram_used_percentage, 50.0);
                assert_eq!(graph_row.ping_discord, 22.0);
                assert_eq!(stat_row.ram_total, 8192);
                assert_eq!(stat_row.disk_size, 100.0);
                assert_eq!(stat_row.upload_total, 8);
            }
            other => panic!("expected Proceed, got {:?}", other),
        }
    }

    #[test]
    fn test_single_null_latency_skips() {
        let mut raw = complete_readings();
        raw.latency.cloudflare_ms = None;
        let (graph, stat) = normalize(&raw);

        assert_eq!(
            validate(&graph, &stat),
            Gate::Skip {
                missing: vec!["pingCloudflare"]
            }
        );
    }

    #[test]
    fn test_null_totals_field_skips() {
        let mut raw = complete_readings();
        raw.cpu.clock_ghz = None;
        let (graph, stat) = normalize(&raw);

        assert_eq!(
            validate(&graph, &stat),
            Gate::Skip {
                missing: vec!["cpuClock"]
            }
        );
    }

    #[test]
    fn test_first_cycle_without_rates_lists_all_rate_fields() {
        let mut raw = complete_readings();
        raw.disk.in_per_sec = None;
        raw.disk.out_per_sec = None;
        raw.network.in_per_sec = None;
        raw.network.out_per_sec = None;
        let (graph, stat) = normalize(&raw);

        let Gate::Skip { missing } = validate(&graph, &stat) else {
            panic!("expected Skip");
        };
        assert_eq!(
            missing,
            vec![
                "diskReadSpeed",
                "diskWriteSpeed",
                "downloadSpeed",
                "uploadSpeed"
            ]
        );
    }

    #[test]
    fn test_missing_from_both_records() {
        let mut raw = complete_readings();
        raw.memory.total = None;
        let (graph, stat) = normalize(&raw);

        let Gate::Skip { missing } = validate(&graph, &stat) else {
            panic!("expected Skip");
        };
        assert_eq!(missing, vec!["ramUsedPercentage", "ramTotal"]);
    }
}
