//! Timestamp-based pairing of sensor streams.
//!
//! Depth frames, calibration records and color images arrive on independent
//! streams at independent rates. Registration needs one coherent set per
//! frame, so the synchronizers here buffer each stream and emit a tuple when
//! the head timestamps agree under the configured policy. Unmatched entries
//! are dropped once they can no longer match, never blocking the streams.

use std::collections::VecDeque;

use depth_types::{CameraInfo, ColorFrame, DepthFrame, IntensityFrame, TimeDelta, Timestamp};
use serde::{Deserialize, Serialize};

/// Policy for deciding whether two stamps belong to the same capture.
///
/// # Example
///
/// ```
/// use depth_register::SyncPolicy;
/// use depth_types::TimeDelta;
///
/// let policy = SyncPolicy::approximate(TimeDelta::from_millis(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SyncPolicy {
    /// Stamps must be nanosecond-identical.
    #[default]
    Exact,

    /// Stamps may differ by at most `tolerance`.
    Approximate {
        /// Maximum stamp difference for a match.
        tolerance: TimeDelta,
    },
}

impl SyncPolicy {
    /// Creates the exact-match policy.
    #[must_use]
    pub const fn exact() -> Self {
        Self::Exact
    }

    /// Creates an approximate policy with the given tolerance.
    #[must_use]
    pub const fn approximate(tolerance: TimeDelta) -> Self {
        Self::Approximate { tolerance }
    }

    /// Maximum stamp difference this policy accepts.
    #[must_use]
    pub const fn tolerance(self) -> TimeDelta {
        match self {
            Self::Exact => TimeDelta::zero(),
            Self::Approximate { tolerance } => tolerance,
        }
    }

    /// Returns true if two stamps belong together under this policy.
    #[must_use]
    pub fn matches(self, a: Timestamp, b: Timestamp) -> bool {
        a.abs_diff(b) <= self.tolerance()
    }
}

/// Anything carrying a capture timestamp.
pub trait Stamped {
    /// The capture time.
    fn stamp(&self) -> Timestamp;
}

impl Stamped for DepthFrame {
    fn stamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Stamped for CameraInfo {
    fn stamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Stamped for IntensityFrame {
    fn stamp(&self) -> Timestamp {
        self.timestamp
    }
}

impl Stamped for ColorFrame {
    fn stamp(&self) -> Timestamp {
        self.timestamp
    }
}

/// Pairs two streams by capture time.
///
/// Both buffers are bounded; when a stream outpaces its capacity the oldest
/// entry is evicted, so a stalled partner stream can never grow memory
/// without limit.
///
/// # Example
///
/// ```
/// use depth_register::{PairSynchronizer, SyncPolicy};
/// use depth_types::{CameraInfo, DepthFrame, Fixed16, FrameId, Timestamp};
///
/// let mut sync = PairSynchronizer::<DepthFrame, CameraInfo>::new(SyncPolicy::exact(), 8);
///
/// let depth = DepthFrame::new_invalid::<Fixed16>(
///     Timestamp::from_nanos(100),
///     FrameId::new("depth_optical"),
///     4,
///     4,
/// );
/// assert!(sync.push_a(depth).is_none());
///
/// let mut info = CameraInfo::ideal(100.0, 4, 4, FrameId::new("depth_optical"));
/// info.timestamp = Timestamp::from_nanos(100);
/// assert!(sync.push_b(info).is_some());
/// ```
#[derive(Debug)]
pub struct PairSynchronizer<A: Stamped, B: Stamped> {
    policy: SyncPolicy,
    capacity: usize,
    a: VecDeque<A>,
    b: VecDeque<B>,
}

impl<A: Stamped, B: Stamped> PairSynchronizer<A, B> {
    /// Creates a synchronizer holding at most `capacity` entries per stream.
    #[must_use]
    pub fn new(policy: SyncPolicy, capacity: usize) -> Self {
        Self {
            policy,
            capacity: capacity.max(1),
            a: VecDeque::new(),
            b: VecDeque::new(),
        }
    }

    /// Returns the matching policy.
    #[must_use]
    pub const fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Number of buffered entries on the first stream.
    #[must_use]
    pub fn pending_a(&self) -> usize {
        self.a.len()
    }

    /// Number of buffered entries on the second stream.
    #[must_use]
    pub fn pending_b(&self) -> usize {
        self.b.len()
    }

    /// Drops all buffered entries.
    pub fn clear(&mut self) {
        self.a.clear();
        self.b.clear();
    }

    /// Buffers an entry from the first stream and emits a pair if one
    /// completes.
    pub fn push_a(&mut self, entry: A) -> Option<(A, B)> {
        push_bounded(&mut self.a, entry, self.capacity);
        self.try_match()
    }

    /// Buffers an entry from the second stream and emits a pair if one
    /// completes.
    pub fn push_b(&mut self, entry: B) -> Option<(A, B)> {
        push_bounded(&mut self.b, entry, self.capacity);
        self.try_match()
    }

    fn try_match(&mut self) -> Option<(A, B)> {
        loop {
            let head = self.a.front()?;
            match best_candidate(&self.b, head.stamp(), self.policy) {
                Candidate::Found(index) => {
                    let matched_a = self.a.pop_front()?;
                    let matched_b = self.b.remove(index)?;
                    // Entries older than the match can no longer pair up.
                    discard_older(&mut self.b, matched_a.stamp(), self.policy);
                    return Some((matched_a, matched_b));
                }
                Candidate::HeadExpired => {
                    // A newer partner already passed this head by more than
                    // the tolerance; it will never match.
                    self.a.pop_front();
                }
                Candidate::AwaitingData => return None,
            }
        }
    }
}

/// Triple-stream variant used when registration also consumes the target
/// camera's calibration or a color image.
#[derive(Debug)]
pub struct FrameSynchronizer<A: Stamped, B: Stamped, C: Stamped> {
    policy: SyncPolicy,
    capacity: usize,
    a: VecDeque<A>,
    b: VecDeque<B>,
    c: VecDeque<C>,
}

impl<A: Stamped, B: Stamped, C: Stamped> FrameSynchronizer<A, B, C> {
    /// Creates a synchronizer holding at most `capacity` entries per stream.
    #[must_use]
    pub fn new(policy: SyncPolicy, capacity: usize) -> Self {
        Self {
            policy,
            capacity: capacity.max(1),
            a: VecDeque::new(),
            b: VecDeque::new(),
            c: VecDeque::new(),
        }
    }

    /// Returns the matching policy.
    #[must_use]
    pub const fn policy(&self) -> SyncPolicy {
        self.policy
    }

    /// Number of buffered entries per stream, in stream order.
    #[must_use]
    pub fn pending(&self) -> (usize, usize, usize) {
        (self.a.len(), self.b.len(), self.c.len())
    }

    /// Drops all buffered entries.
    pub fn clear(&mut self) {
        self.a.clear();
        self.b.clear();
        self.c.clear();
    }

    /// Buffers an entry from the first stream and emits a triple if one
    /// completes.
    pub fn push_a(&mut self, entry: A) -> Option<(A, B, C)> {
        push_bounded(&mut self.a, entry, self.capacity);
        self.try_match()
    }

    /// Buffers an entry from the second stream and emits a triple if one
    /// completes.
    pub fn push_b(&mut self, entry: B) -> Option<(A, B, C)> {
        push_bounded(&mut self.b, entry, self.capacity);
        self.try_match()
    }

    /// Buffers an entry from the third stream and emits a triple if one
    /// completes.
    pub fn push_c(&mut self, entry: C) -> Option<(A, B, C)> {
        push_bounded(&mut self.c, entry, self.capacity);
        self.try_match()
    }

    fn try_match(&mut self) -> Option<(A, B, C)> {
        loop {
            let stamp = self.a.front()?.stamp();
            let b_candidate = best_candidate(&self.b, stamp, self.policy);
            let c_candidate = best_candidate(&self.c, stamp, self.policy);
            match (b_candidate, c_candidate) {
                (Candidate::Found(b_index), Candidate::Found(c_index)) => {
                    let matched_a = self.a.pop_front()?;
                    let matched_b = self.b.remove(b_index)?;
                    let matched_c = self.c.remove(c_index)?;
                    discard_older(&mut self.b, stamp, self.policy);
                    discard_older(&mut self.c, stamp, self.policy);
                    return Some((matched_a, matched_b, matched_c));
                }
                (Candidate::HeadExpired, _) | (_, Candidate::HeadExpired) => {
                    self.a.pop_front();
                }
                _ => return None,
            }
        }
    }
}

fn push_bounded<T>(buffer: &mut VecDeque<T>, entry: T, capacity: usize) {
    if buffer.len() == capacity {
        buffer.pop_front();
    }
    buffer.push_back(entry);
}

enum Candidate {
    /// Index of the closest entry within tolerance.
    Found(usize),
    /// A partner newer than the query by more than the tolerance exists but
    /// nothing matches, so no later arrival can either.
    HeadExpired,
    /// Nothing matches yet and nothing rules a future match out.
    AwaitingData,
}

fn best_candidate<T: Stamped>(buffer: &VecDeque<T>, stamp: Timestamp, policy: SyncPolicy) -> Candidate {
    let mut best: Option<(usize, TimeDelta)> = None;
    let mut saw_newer = false;
    for (index, entry) in buffer.iter().enumerate() {
        let diff = entry.stamp().abs_diff(stamp);
        if policy.matches(entry.stamp(), stamp) {
            if best.is_none_or(|(_, best_diff)| diff < best_diff) {
                best = Some((index, diff));
            }
        } else if entry.stamp() > stamp {
            saw_newer = true;
        }
    }
    match best {
        Some((index, _)) => Candidate::Found(index),
        None if saw_newer => Candidate::HeadExpired,
        None => Candidate::AwaitingData,
    }
}

/// Drops entries strictly older than the matched stamp minus the tolerance.
fn discard_older<T: Stamped>(buffer: &mut VecDeque<T>, stamp: Timestamp, policy: SyncPolicy) {
    buffer.retain(|entry| entry.stamp() >= stamp || policy.matches(entry.stamp(), stamp));
}
