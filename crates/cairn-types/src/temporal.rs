use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Logical timestamp: wall-clock milliseconds plus a tie-breaking counter.
///
/// Commits and stash entries carry a `Stamp`. Two events recorded within the
/// same millisecond still get distinct, ordered stamps through
/// [`Stamp::after`], which is what keeps stash entry ids unique.
///
/// Ordering: `physical_ms` then `logical`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Stamp {
    /// Wall-clock milliseconds since UNIX epoch.
    pub physical_ms: u64,
    /// Counter for events within the same millisecond.
    pub logical: u32,
}

impl Stamp {
    pub fn new(physical_ms: u64, logical: u32) -> Self {
        Self {
            physical_ms,
            logical,
        }
    }

    /// A stamp for the current wall-clock time.
    pub fn now() -> Self {
        Self {
            physical_ms: wall_clock_ms(),
            logical: 0,
        }
    }

    pub const fn zero() -> Self {
        Self {
            physical_ms: 0,
            logical: 0,
        }
    }

    /// The current time, or the successor of `previous` if the clock has not
    /// moved past it. The result is always strictly greater than `previous`.
    pub fn after(previous: &Self) -> Self {
        let now_ms = wall_clock_ms();
        if now_ms > previous.physical_ms {
            return Self::new(now_ms, 0);
        }
        match previous.logical.checked_add(1) {
            Some(logical) => Self::new(previous.physical_ms, logical),
            // Logical counter exhausted: borrow the next millisecond.
            None => Self::new(previous.physical_ms.saturating_add(1), 0),
        }
    }
}

fn wall_clock_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

impl fmt::Debug for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Stamp({}ms.{})", self.physical_ms, self.logical)
    }
}

impl fmt::Display for Stamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.physical_ms, self.logical)
    }
}
