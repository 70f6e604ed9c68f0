//! Fixed pick-order templates
//!
//! A pattern lists which team picks at each draft step after both captains
//! are set. Captains are conceptually picks 0 for each side, so a lobby of
//! capacity `n` only uses the first `n - 2` entries.

use crate::types::Team;
use crate::types::Team::{Blue as B, Red as R};
use serde::{Deserialize, Serialize};

/// Number of entries in every template
pub const TEMPLATE_LEN: usize = 8;

const ALTERNATING: [Team; TEMPLATE_LEN] = [R, B, R, B, R, B, R, B];
const PAIRED: [Team; TEMPLATE_LEN] = [R, B, B, R, R, B, B, R];

/// The two supported draft alternation templates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PickPattern {
    /// `R,B,R,B,...`
    Alternating,
    /// `R,B,B,R,R,B,B,R`
    Paired,
}

impl PickPattern {
    /// Strict alternation for 2v2, paired alternation for everything larger
    pub fn for_capacity(capacity: usize) -> Self {
        if capacity == 4 {
            PickPattern::Alternating
        } else {
            PickPattern::Paired
        }
    }

    /// The full 8-slot template
    pub fn template(self) -> &'static [Team; TEMPLATE_LEN] {
        match self {
            PickPattern::Alternating => &ALTERNATING,
            PickPattern::Paired => &PAIRED,
        }
    }

    /// The meaningful prefix for a lobby of `capacity` players
    pub fn picks(self, capacity: usize) -> &'static [Team] {
        let len = capacity.saturating_sub(2).min(TEMPLATE_LEN);
        &self.template()[..len]
    }

    /// Team picking at zero-based step `index`, if the draft has that many picks
    pub fn team_at(self, capacity: usize, index: usize) -> Option<Team> {
        self.picks(capacity).get(index).copied()
    }

    /// The single team owning every pick from `index` onwards, if there is one.
    ///
    /// Returns `None` when the suffix is empty or mixes both teams.
    pub fn forced_team_from(self, capacity: usize, index: usize) -> Option<Team> {
        let remaining = self.picks(capacity).get(index..)?;
        let (first, rest) = remaining.split_first()?;
        rest.iter().all(|team| team == first).then_some(*first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pattern_selection_by_capacity() {
        assert_eq!(PickPattern::for_capacity(4), PickPattern::Alternating);
        for capacity in [6, 8, 10] {
            assert_eq!(PickPattern::for_capacity(capacity), PickPattern::Paired);
        }
    }

    #[test]
    fn test_picks_cover_capacity_minus_two() {
        for capacity in (4..=10).step_by(2) {
            let pattern = PickPattern::for_capacity(capacity);
            let picks = pattern.picks(capacity);
            assert_eq!(picks.len(), capacity - 2);
            assert_eq!(picks, &pattern.template()[..capacity - 2]);
        }
    }

    #[test]
    fn test_templates() {
        assert_eq!(PickPattern::Alternating.picks(4), &[R, B]);
        assert_eq!(PickPattern::Paired.picks(6), &[R, B, B, R]);
        assert_eq!(PickPattern::Paired.picks(10), &PAIRED);
        assert_eq!(PickPattern::Paired.team_at(6, 1), Some(B));
        assert_eq!(PickPattern::Paired.team_at(6, 4), None);
    }

    #[test]
    fn test_forced_team_from() {
        // 2v2: after red's pick only blue is left
        assert_eq!(PickPattern::Alternating.forced_team_from(4, 0), None);
        assert_eq!(PickPattern::Alternating.forced_team_from(4, 1), Some(B));
        assert_eq!(PickPattern::Alternating.forced_team_from(4, 2), None);

        // 3v3: R,B,B,R
        assert_eq!(PickPattern::Paired.forced_team_from(6, 1), None);
        assert_eq!(PickPattern::Paired.forced_team_from(6, 3), Some(R));

        // 4v4: R,B,B,R,R,B
        assert_eq!(PickPattern::Paired.forced_team_from(8, 4), None);
        assert_eq!(PickPattern::Paired.forced_team_from(8, 5), Some(B));
    }
}
