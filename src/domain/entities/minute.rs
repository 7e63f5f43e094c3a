use serde::{Deserialize, Serialize};

/// A queued speaking turn. Position is assigned as count+1 at enqueue time
/// and never reindexed on removal. The request with a non-null
/// `started_at` is the one currently running.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MinuteRequest {
    pub id: String,
    pub game_id: String,
    pub round: u32,
    pub player_id: String,
    pub position: u32,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_sec: Option<u32>,
    pub created_at: i64,
    pub updated_at: i64,
}

impl MinuteRequest {
    /// Remaining speaking time in whole seconds, floored at zero. None
    /// while the timer is not running. The server never ticks; this is
    /// computed lazily from stored state whenever queried or broadcast.
    pub fn remaining_sec(&self, now_ms: i64) -> Option<i64> {
        let started_at = self.started_at?;
        let duration = i64::from(self.duration_sec?);
        let elapsed = (now_ms - started_at) / 1000;
        Some((duration - elapsed).max(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(started_at: Option<i64>, duration_sec: Option<u32>) -> MinuteRequest {
        MinuteRequest {
            id: "m1".into(),
            game_id: "g1".into(),
            round: 1,
            player_id: "p1".into(),
            position: 1,
            approved: true,
            started_at,
            duration_sec,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn remaining_is_none_while_stopped() {
        assert_eq!(request(None, Some(60)).remaining_sec(10_000), None);
        assert_eq!(request(Some(0), None).remaining_sec(10_000), None);
    }

    #[test]
    fn remaining_counts_down_and_floors_at_zero() {
        let req = request(Some(1_000), Some(60));
        assert_eq!(req.remaining_sec(1_000), Some(60));
        assert_eq!(req.remaining_sec(16_000), Some(45));
        assert_eq!(req.remaining_sec(61_000), Some(0));
        assert_eq!(req.remaining_sec(500_000), Some(0));
    }

    #[test]
    fn remaining_is_monotonically_non_increasing() {
        let req = request(Some(0), Some(30));
        let mut last = i64::MAX;
        for now in (0..40_000).step_by(700) {
            let remaining = req.remaining_sec(now).unwrap();
            assert!(remaining <= last);
            last = remaining;
        }
    }
}
