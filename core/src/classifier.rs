//! Segment classifier: ordered rule table over (R, F, M, bins).
//!
//! RULE ORDER IS LOAD-BEARING. The predicates overlap; the first
//! match wins. A customer at the top of every scale satisfies VIP,
//! Loyal and Big Spender, and must come out as VIP.

use crate::{error::RfmError, types::Score};
use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// The closed set of lifecycle segments.
/// Declaration order matches rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Segment {
    #[serde(rename = "VIP")]
    Vip,
    Loyal,
    #[serde(rename = "Big Spender")]
    BigSpender,
    New,
    Promising,
    #[serde(rename = "At Risk")]
    AtRisk,
    Lapsed,
    Hibernating,
}

impl Segment {
    pub const ALL: [Segment; 8] = [
        Segment::Vip,
        Segment::Loyal,
        Segment::BigSpender,
        Segment::New,
        Segment::Promising,
        Segment::AtRisk,
        Segment::Lapsed,
        Segment::Hibernating,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::Vip         => "VIP",
            Self::Loyal       => "Loyal",
            Self::BigSpender  => "Big Spender",
            Self::New         => "New",
            Self::Promising   => "Promising",
            Self::AtRisk      => "At Risk",
            Self::Lapsed      => "Lapsed",
            Self::Hibernating => "Hibernating",
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Segment {
    type Err = RfmError;

    /// Exact display label. Case and spacing must match.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Segment::ALL
            .into_iter()
            .find(|seg| seg.label() == s)
            .ok_or_else(|| RfmError::UnknownSegment { label: s.to_string() })
    }
}

/// Assign a segment. Total: every input yields a segment.
pub fn classify(r: Score, f: Score, m: Score, bins: u8) -> Segment {
    let high = bins.saturating_sub(1).max(4);
    let top = bins;

    if r >= high && f >= high && m >= high {
        Segment::Vip
    } else if r >= high && f == top {
        Segment::Loyal
    } else if m == top && f >= high {
        Segment::BigSpender
    } else if r == top && f <= 2 {
        Segment::New
    } else if r >= high && f <= 2 {
        Segment::Promising
    } else if r <= 2 && f >= high {
        Segment::AtRisk
    } else if r == 1 {
        Segment::Lapsed
    } else {
        Segment::Hibernating
    }
}
