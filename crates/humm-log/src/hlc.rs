use std::sync::{Arc, Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};

use humm_types::Timestamp;

/// Source of wall-clock milliseconds.
pub type WallClock = Arc<dyn Fn() -> u64 + Send + Sync>;

struct HlcState {
    physical_ms: u64,
    logical: u32,
}

/// Hybrid Logical Clock that stamps every action an agent signs.
///
/// - **Local event**: `physical = max(wall, last)`; the logical counter resets
///   when physical advances and increments otherwise.
/// - **Receive**: `physical = max(wall, last, received)`, with the logical
///   counter pushed past both sides on a tie.
///
/// Timestamps from one clock are strictly increasing.
pub struct HybridLogicalClock {
    node_id: u16,
    wall: WallClock,
    state: Mutex<HlcState>,
}

impl HybridLogicalClock {
    pub fn new(node_id: u16) -> Self {
        Self::with_wall_clock(node_id, Arc::new(system_ms))
    }

    /// A clock reading physical time from `wall` instead of the system clock.
    pub fn with_wall_clock(node_id: u16, wall: WallClock) -> Self {
        Self {
            node_id,
            wall,
            state: Mutex::new(HlcState {
                physical_ms: 0,
                logical: 0,
            }),
        }
    }

    /// Timestamp for a local event.
    pub fn now(&self) -> Timestamp {
        let wall = (self.wall)();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let physical = wall.max(state.physical_ms);
        let (physical, logical) = if physical > state.physical_ms {
            (physical, 0)
        } else {
            carry(physical, state.logical.checked_add(1))
        };

        state.physical_ms = physical;
        state.logical = logical;
        Timestamp::new(physical, logical, self.node_id)
    }

    /// Merge a timestamp observed on a remote record.
    pub fn update(&self, received: &Timestamp) -> Timestamp {
        let wall = (self.wall)();
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let physical = wall.max(state.physical_ms).max(received.physical_ms);
        let (physical, logical) =
            if physical > state.physical_ms && physical > received.physical_ms {
                (physical, 0)
            } else if physical == state.physical_ms && physical == received.physical_ms {
                carry(physical, state.logical.max(received.logical).checked_add(1))
            } else if physical == state.physical_ms {
                carry(physical, state.logical.checked_add(1))
            } else {
                carry(physical, received.logical.checked_add(1))
            };

        state.physical_ms = physical;
        state.logical = logical;
        Timestamp::new(physical, logical, self.node_id)
    }

    pub fn node_id(&self) -> u16 {
        self.node_id
    }
}

/// A logical counter that ran out moves the clock one millisecond forward.
fn carry(physical: u64, logical: Option<u32>) -> (u64, u32) {
    match logical {
        Some(logical) => (physical, logical),
        None => (physical.saturating_add(1), 0),
    }
}

fn system_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
