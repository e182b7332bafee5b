use serde::{Deserialize, Serialize};

/// Sequence number stamped on an entity by the last mutation that touched it.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Version(u64);

impl Version {
    /// Version of records loaded straight from the backend.
    pub const ZERO: Version = Version(0);

    pub fn new(seq: u64) -> Self {
        Self(seq)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

/// Hands out strictly increasing versions.
#[derive(Debug, Default)]
pub struct SequenceClock {
    last: u64,
}

impl SequenceClock {
    pub fn new() -> Self {
        Self { last: 0 }
    }

    /// Resume after `floor`, e.g. when restoring a cached snapshot.
    pub fn starting_after(floor: Version) -> Self {
        Self { last: floor.0 }
    }

    pub fn tick(&mut self) -> Version {
        self.last += 1;
        Version(self.last)
    }

    pub fn current(&self) -> Version {
        Version(self.last)
    }
}
