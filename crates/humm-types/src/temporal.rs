use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Hybrid Logical Clock timestamp attached to every committed record.
///
/// Combines a wall-clock component with a logical counter and the id of the
/// node that issued it, so timestamps from different peers are totally
/// ordered without synchronized clocks.
///
/// Ordering: `physical_ms` → `logical` → `node_id`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: u64,
    /// Logical counter for events at the same physical time.
    pub logical: u32,
    /// Node identifier to break ties between nodes.
    pub node_id: u16,
}

impl Timestamp {
    pub fn new(physical_ms: u64, logical: u32, node_id: u16) -> Self {
        Self {
            physical_ms,
            logical,
            node_id,
        }
    }

    /// Timestamp for the current wall-clock time.
    pub fn now(node_id: u16) -> Self {
        let physical_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self {
            physical_ms,
            logical: 0,
            node_id,
        }
    }

    /// The zero timestamp; sorts before every real one.
    pub const fn zero() -> Self {
        Self {
            physical_ms: 0,
            logical: 0,
            node_id: 0,
        }
    }

    /// Returns `true` if this timestamp lies in the half-open range
    /// `[start, end)`. Missing bounds are unbounded.
    pub fn within(&self, start: Option<&Self>, end: Option<&Self>) -> bool {
        start.map_or(true, |s| self >= s) && end.map_or(true, |e| self < e)
    }
}

impl PartialOrd for Timestamp {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Timestamp {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.physical_ms
            .cmp(&other.physical_ms)
            .then(self.logical.cmp(&other.logical))
            .then(self.node_id.cmp(&other.node_id))
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timestamp({}ms.{}.n{})",
            self.physical_ms, self.logical, self.node_id
        )
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.n{}", self.physical_ms, self.logical, self.node_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_physical_then_logical_then_node() {
        assert!(Timestamp::new(100, 5, 1) < Timestamp::new(200, 0, 0));
        assert!(Timestamp::new(100, 1, 9) < Timestamp::new(100, 2, 0));
        assert!(Timestamp::new(100, 1, 1) < Timestamp::new(100, 1, 2));
    }

    #[test]
    fn now_produces_reasonable_timestamp() {
        let ts = Timestamp::now(3);
        // After 2020-01-01.
        assert!(ts.physical_ms > 1_577_836_800_000);
        assert_eq!(ts.node_id, 3);
    }

    #[test]
    fn zero_is_smallest() {
        assert!(Timestamp::zero() < Timestamp::new(1, 0, 0));
    }

    #[test]
    fn within_is_half_open() {
        let start = Timestamp::new(100, 0, 0);
        let end = Timestamp::new(200, 0, 0);
        assert!(start.within(Some(&start), Some(&end)));
        assert!(!end.within(Some(&start), Some(&end)));
        assert!(Timestamp::new(150, 0, 0).within(Some(&start), None));
        assert!(Timestamp::new(50, 0, 0).within(None, Some(&end)));
        assert!(!Timestamp::new(50, 0, 0).within(Some(&start), None));
    }

    #[test]
    fn display_format() {
        assert_eq!(format!("{}", Timestamp::new(1000, 5, 3)), "1000.5.n3");
    }
}
