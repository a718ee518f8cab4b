use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::saver::state::RankedCheckpoint;

/// Sort direction of the ranked history, most-preferred first.
///
/// Selected once at construction and used uniformly for promotion,
/// eviction, and best-tracking decisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricOrdering {
    /// Lower metric is better; the ranked history is sorted lowest-first.
    Ascending,
    /// Higher metric is better; the ranked history is sorted highest-first.
    Descending,
}

impl MetricOrdering {
    /// Map the `decreasing` configuration flag onto an ordering.
    pub fn from_decreasing(decreasing: bool) -> Self {
        if decreasing {
            MetricOrdering::Ascending
        } else {
            MetricOrdering::Descending
        }
    }

    /// Whether metric `a` out-ranks metric `b`.
    pub fn better(self, a: f64, b: f64) -> bool {
        match self {
            MetricOrdering::Ascending => a < b,
            MetricOrdering::Descending => a > b,
        }
    }

    /// Whether a measured metric out-ranks a retained entry's metric.
    /// A measured snapshot always out-ranks an unmeasured entry.
    pub fn outranks(self, a: f64, b: Option<f64>) -> bool {
        match b {
            Some(b) => self.better(a, b),
            None => true,
        }
    }

    /// Stable sort keyed solely on the metric, most-preferred first.
    /// Unmeasured entries sort after every measured one; ties keep their
    /// relative order.
    pub fn sort(self, entries: &mut [RankedCheckpoint]) {
        entries.sort_by(|a, b| self.rank(a.metric, b.metric));
    }

    fn rank(self, a: Option<f64>, b: Option<f64>) -> Ordering {
        match (a, b) {
            (Some(a), Some(b)) => {
                let ord = a.partial_cmp(&b).unwrap_or(Ordering::Equal);
                match self {
                    MetricOrdering::Ascending => ord,
                    MetricOrdering::Descending => ord.reverse(),
                }
            }
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn entry(name: &str, metric: Option<f64>) -> RankedCheckpoint {
        RankedCheckpoint {
            path: PathBuf::from(name),
            metric,
        }
    }

    #[test]
    fn test_better_descending() {
        let ord = MetricOrdering::Descending;
        assert!(ord.better(0.7, 0.5));
        assert!(!ord.better(0.5, 0.7));
        assert!(!ord.better(0.5, 0.5));
    }

    #[test]
    fn test_better_ascending() {
        let ord = MetricOrdering::Ascending;
        assert!(ord.better(0.3, 0.5));
        assert!(!ord.better(0.5, 0.3));
    }

    #[test]
    fn test_from_decreasing() {
        assert_eq!(MetricOrdering::from_decreasing(true), MetricOrdering::Ascending);
        assert_eq!(MetricOrdering::from_decreasing(false), MetricOrdering::Descending);
    }

    #[test]
    fn test_sort_descending_most_preferred_first() {
        let mut entries = vec![
            entry("a", Some(0.5)),
            entry("b", Some(0.9)),
            entry("c", Some(0.7)),
        ];
        MetricOrdering::Descending.sort(&mut entries);
        let metrics: Vec<f64> = entries.iter().map(|e| e.metric.unwrap()).collect();
        assert_eq!(metrics, vec![0.9, 0.7, 0.5]);
    }

    #[test]
    fn test_sort_ascending_most_preferred_first() {
        let mut entries = vec![
            entry("a", Some(0.5)),
            entry("b", Some(0.3)),
            entry("c", Some(0.4)),
        ];
        MetricOrdering::Ascending.sort(&mut entries);
        let metrics: Vec<f64> = entries.iter().map(|e| e.metric.unwrap()).collect();
        assert_eq!(metrics, vec![0.3, 0.4, 0.5]);
    }

    #[test]
    fn test_sort_is_stable_on_ties() {
        let mut entries = vec![
            entry("first", Some(0.5)),
            entry("second", Some(0.5)),
            entry("third", Some(0.5)),
        ];
        MetricOrdering::Descending.sort(&mut entries);
        let names: Vec<&str> = entries.iter().map(|e| e.path.to_str().unwrap()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unmeasured_entries_sort_last() {
        for ord in [MetricOrdering::Ascending, MetricOrdering::Descending] {
            let mut entries = vec![
                entry("none", None),
                entry("measured", Some(0.5)),
            ];
            ord.sort(&mut entries);
            assert_eq!(entries[0].path, PathBuf::from("measured"));
            assert_eq!(entries[1].path, PathBuf::from("none"));
        }
    }

    #[test]
    fn test_measured_outranks_unmeasured() {
        assert!(MetricOrdering::Descending.outranks(0.1, None));
        assert!(MetricOrdering::Ascending.outranks(0.9, None));
        assert!(!MetricOrdering::Descending.outranks(0.1, Some(0.2)));
    }
}
