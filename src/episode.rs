//! Episode recording.
//!
//! One [`EpisodeLog`] holds the ordered per-tick interaction records of a
//! single episode. Logs are created at reset and discarded once consumed;
//! nothing here persists across episodes.

use crate::env::Action;
use crate::{generate_id, Id};

/// One (observation, action, reward) interaction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TickRecord {
    pub tick: u32,
    pub observation: Vec<f64>,
    pub action: Action,
    pub reward: f64,
}

/// Ordered record of one episode.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EpisodeLog {
    /// Unique id for cross-referencing in external reports.
    pub id: Id,
    pub records: Vec<TickRecord>,
}

impl EpisodeLog {
    pub fn new() -> Self {
        Self {
            id: generate_id(),
            records: Vec::new(),
        }
    }

    /// Appends one interaction record.
    pub fn push(&mut self, tick: u32, observation: Vec<f64>, action: Action, reward: f64) {
        self.records.push(TickRecord {
            tick,
            observation,
            action,
            reward,
        });
    }

    /// Number of recorded ticks.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Sum of rewards over the episode.
    pub fn total_reward(&self) -> f64 {
        self.records.iter().map(|r| r.reward).sum()
    }

    /// Number of switch decisions taken.
    pub fn switch_count(&self) -> usize {
        self.records
            .iter()
            .filter(|r| r.action == Action::Switch)
            .count()
    }
}

impl Default for EpisodeLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_accumulate_in_order() {
        let mut log = EpisodeLog::new();
        log.push(1, vec![0.0; 5], Action::Hold, 0.5);
        log.push(2, vec![1.0; 5], Action::Switch, -0.2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.records[0].tick, 1);
        assert_eq!(log.records[1].tick, 2);
        assert!((log.total_reward() - 0.3).abs() < 1e-12);
        assert_eq!(log.switch_count(), 1);
    }

    #[test]
    fn fresh_logs_have_distinct_ids() {
        assert_ne!(EpisodeLog::new().id, EpisodeLog::new().id);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn log_serializes_to_json() {
        let mut log = EpisodeLog::new();
        log.push(1, vec![2.0, 0.0, 0.0, 0.0, 0.0], Action::Hold, 0.1);
        let json = serde_json::to_string(&log).unwrap();
        assert!(json.contains("\"records\""));
    }
}
