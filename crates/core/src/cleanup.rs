//! Duplicate character cleanup policy.
//!
//! Characters are duplicates when they share a natural key
//! (`name-server`). Each duplicate group keeps exactly one survivor:
//!
//! 1. a permanent entry beats a temporary one,
//! 2. between temporary entries the longer remaining lifetime wins,
//! 3. expired entries lose to everything.
//!
//! Two permanent entries are resolved by the configured
//! [`PermanentTieBreak`]. Pure planning only; deletion happens in the store
//! layer.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Lifetime
// ---------------------------------------------------------------------------

/// Remaining lifetime of a stored entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "seconds", rename_all = "snake_case")]
pub enum Lifetime {
    /// No expiration.
    Permanent,
    /// Seconds left before the store drops the entry.
    Remaining(u64),
    /// Missing or already gone.
    Expired,
}

impl Lifetime {
    /// Interpret a raw store TTL reply (`-1` = no expiry, `-2` = missing).
    pub fn from_ttl(raw: i64) -> Self {
        match raw {
            -1 => Self::Permanent,
            n if n > 0 => Self::Remaining(n as u64),
            _ => Self::Expired,
        }
    }

    pub fn is_permanent(self) -> bool {
        matches!(self, Self::Permanent)
    }

    fn rank(self) -> (u8, u64) {
        match self {
            Self::Permanent => (2, 0),
            Self::Remaining(n) => (1, n),
            Self::Expired => (0, 0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tie-break
// ---------------------------------------------------------------------------

/// How to pick between two permanent entries sharing a natural key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PermanentTieBreak {
    /// Keep whichever entry the scan returned first.
    KeepFirst,
    /// Keep the entry with the latest `updated_at`; falls back to the first
    /// encountered when timestamps are missing or equal.
    #[default]
    KeepMostRecentlyUpdated,
}

impl FromStr for PermanentTieBreak {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" | "keep_first" => Ok(Self::KeepFirst),
            "latest" | "keep_most_recently_updated" => Ok(Self::KeepMostRecentlyUpdated),
            other => Err(format!(
                "Invalid tie-break '{other}'. Must be one of: first, latest"
            )),
        }
    }
}

impl fmt::Display for PermanentTieBreak {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeepFirst => f.write_str("first"),
            Self::KeepMostRecentlyUpdated => f.write_str("latest"),
        }
    }
}

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// One stored character as seen by the cleanup planner.
#[derive(Debug, Clone)]
pub struct CleanupCandidate {
    /// Store key of the entry.
    pub key: String,
    pub natural_key: String,
    pub lifetime: Lifetime,
    pub updated_at: Option<Timestamp>,
}

/// Survivors and losers of a cleanup pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleanupPlan {
    pub keep: Vec<String>,
    pub delete: Vec<String>,
}

/// Decide which entries survive. Input order is the scan order.
pub fn plan_cleanup(candidates: &[CleanupCandidate], tie_break: PermanentTieBreak) -> CleanupPlan {
    let mut index: HashMap<&str, usize> = HashMap::new();
    let mut groups: Vec<Vec<&CleanupCandidate>> = Vec::new();

    for candidate in candidates {
        match index.get(candidate.natural_key.as_str()) {
            Some(&i) => groups[i].push(candidate),
            None => {
                index.insert(&candidate.natural_key, groups.len());
                groups.push(vec![candidate]);
            }
        }
    }

    let mut plan = CleanupPlan::default();
    for group in groups {
        let mut winner = 0;
        for i in 1..group.len() {
            if beats(group[i], group[winner], tie_break) {
                winner = i;
            }
        }
        for (i, candidate) in group.into_iter().enumerate() {
            if i == winner {
                plan.keep.push(candidate.key.clone());
            } else {
                plan.delete.push(candidate.key.clone());
            }
        }
    }
    plan
}

fn beats(challenger: &CleanupCandidate, incumbent: &CleanupCandidate, tie_break: PermanentTieBreak) -> bool {
    let (c, i) = (challenger.lifetime.rank(), incumbent.lifetime.rank());
    if c != i {
        return c > i;
    }
    challenger.lifetime.is_permanent()
        && tie_break == PermanentTieBreak::KeepMostRecentlyUpdated
        && challenger.updated_at > incumbent.updated_at
}
