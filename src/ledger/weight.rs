use super::{
    day::Day,
    model::{ensure_positive, WeightHistory, WeightSample},
};
use crate::error::{LedgerError, LedgerResult};

/// Goal progress percentage and its change since the last stored value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GoalProgress {
    pub progress: i64,
    pub change: i64,
}

/// Percentage of `goal_kg` lost between the first and last sample, clamped to 0..=100.
pub fn compute_goal_progress(samples: &[WeightSample], goal_kg: f64, previous: i64) -> GoalProgress {
    let progress = match (samples.first(), samples.last()) {
        (Some(first), Some(last)) if samples.len() >= 2 && goal_kg > 0.0 => {
            let pct = ((first.weight - last.weight) / goal_kg * 100.0).round();
            pct.clamp(0.0, 100.0) as i64
        }
        _ => 0,
    };
    GoalProgress {
        progress,
        change: progress - previous,
    }
}

impl WeightHistory {
    /// Logs `weight` for `date`. A sample already on that date is replaced.
    pub fn add_sample(&mut self, date: Day, weight: f64) -> LedgerResult<()> {
        ensure_positive("Weight", weight)?;
        match self.samples.iter_mut().find(|s| s.date == date) {
            Some(existing) => existing.weight = weight,
            None => self.samples.push(WeightSample {
                date,
                weight,
                weight_change: 0.0,
            }),
        }
        self.recompute();
        self.samples_dirty = true;
        Ok(())
    }

    /// Drops every sample on `date`; returns how many were removed.
    pub fn remove_sample(&mut self, date: Day) -> usize {
        let before = self.samples.len();
        self.samples.retain(|s| s.date != date);
        let removed = before - self.samples.len();
        if removed > 0 {
            self.recompute();
            self.samples_dirty = true;
        }
        removed
    }

    pub fn sample(&self, date: Day) -> Option<&WeightSample> {
        self.samples.iter().find(|s| s.date == date)
    }

    /// Full pass: stable sort by date, then `change[i] = weight[i-1] - weight[i]`.
    pub fn recompute(&mut self) {
        self.samples.sort_by_key(|s| s.date);
        let mut previous: Option<f64> = None;
        for sample in &mut self.samples {
            sample.weight_change = previous.map_or(0.0, |p| p - sample.weight);
            previous = Some(sample.weight);
        }
    }

    pub fn refresh_progress(&mut self, goal_kg: f64) -> GoalProgress {
        let result = compute_goal_progress(&self.samples, goal_kg, self.goal_progress);
        self.goal_progress = result.progress;
        self.goal_progress_change = result.change;
        self.samples_dirty = false;
        result
    }

    /// Refreshes progress only when the samples were edited or the stored
    /// value no longer matches them. Other writes keep the last change.
    pub fn sync_progress(&mut self, goal_kg: f64) {
        let current = compute_goal_progress(&self.samples, goal_kg, self.goal_progress);
        if self.samples_dirty || current.progress != self.goal_progress {
            self.refresh_progress(goal_kg);
        }
    }

    pub fn weight_lost(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) if self.samples.len() >= 2 => first.weight - last.weight,
            _ => 0.0,
        }
    }

    pub(crate) fn check_consistency(&self) -> LedgerResult<()> {
        for (i, sample) in self.samples.iter().enumerate() {
            let expected = if i == 0 {
                0.0
            } else {
                let prev = &self.samples[i - 1];
                if prev.date >= sample.date {
                    return Err(LedgerError::validation(
                        "weight history must be sorted with unique dates",
                    ));
                }
                prev.weight - sample.weight
            };
            if (sample.weight_change - expected).abs() > 1e-9 {
                return Err(LedgerError::validation(format!(
                    "weight change for {} is stale",
                    sample.date
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(s: &str) -> Day {
        s.parse().unwrap()
    }

    fn sample(date: &str, weight: f64) -> WeightSample {
        WeightSample {
            date: day(date),
            weight,
            weight_change: 0.0,
        }
    }

    #[test]
    fn out_of_order_samples_are_sorted_with_deltas() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 80.0).unwrap();
        history.add_sample(day("2024-01-03"), 78.0).unwrap();
        history.add_sample(day("2024-01-02"), 79.0).unwrap();

        let got: Vec<(String, f64, f64)> = history
            .samples
            .iter()
            .map(|s| (s.date.to_string(), s.weight, s.weight_change))
            .collect();
        assert_eq!(
            got,
            vec![
                ("2024-01-01".to_string(), 80.0, 0.0),
                ("2024-01-02".to_string(), 79.0, 1.0),
                ("2024-01-03".to_string(), 78.0, 1.0),
            ]
        );
        assert!(history.check_consistency().is_ok());
    }

    #[test]
    fn first_sample_always_has_zero_change() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-02-01"), 70.0).unwrap();
        history.add_sample(day("2024-01-01"), 75.0).unwrap();
        assert_eq!(history.samples[0].weight_change, 0.0);
        assert_eq!(history.samples[1].weight_change, 5.0);
    }

    #[test]
    fn duplicate_date_replaces_weight() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 80.0).unwrap();
        history.add_sample(day("2024-01-02"), 79.0).unwrap();
        history.add_sample(day("2024-01-02"), 77.5).unwrap();

        assert_eq!(history.samples.len(), 2);
        assert_eq!(history.samples[1].weight, 77.5);
        assert_eq!(history.samples[1].weight_change, 2.5);
    }

    #[test]
    fn gaining_weight_gives_negative_change() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 70.0).unwrap();
        history.add_sample(day("2024-01-02"), 71.0).unwrap();
        assert_eq!(history.samples[1].weight_change, -1.0);
    }

    #[test]
    fn non_positive_weight_is_rejected() {
        let mut history = WeightHistory::default();
        assert!(matches!(
            history.add_sample(day("2024-01-01"), 0.0),
            Err(LedgerError::Validation(_))
        ));
        assert!(history.add_sample(day("2024-01-01"), f64::NAN).is_err());
        assert!(history.samples.is_empty());
    }

    #[test]
    fn remove_recomputes_and_ignores_unknown_dates() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 80.0).unwrap();
        history.add_sample(day("2024-01-02"), 79.0).unwrap();
        history.add_sample(day("2024-01-03"), 77.0).unwrap();

        assert_eq!(history.remove_sample(day("2024-01-02")), 1);
        assert_eq!(history.samples[1].weight_change, 3.0);

        let before = history.clone();
        assert_eq!(history.remove_sample(day("2030-01-01")), 0);
        assert_eq!(history, before);
    }

    #[test]
    fn remove_drops_every_sample_on_date() {
        let mut history = WeightHistory {
            samples: vec![sample("2024-01-01", 80.0), sample("2024-01-01", 81.0), sample("2024-01-02", 79.0)],
            ..WeightHistory::default()
        };
        assert_eq!(history.remove_sample(day("2024-01-01")), 2);
        assert_eq!(history.samples.len(), 1);
        assert_eq!(history.samples[0].weight_change, 0.0);
    }

    #[test]
    fn goal_progress_boundaries() {
        assert_eq!(compute_goal_progress(&[], 10.0, 0).progress, 0);
        assert_eq!(compute_goal_progress(&[sample("2024-01-01", 80.0)], 10.0, 0).progress, 0);

        let two = [sample("2024-01-01", 80.0), sample("2024-01-02", 75.0)];
        assert_eq!(compute_goal_progress(&two, 10.0, 0).progress, 50);
    }

    #[test]
    fn goal_progress_clamps_and_reports_change() {
        let lost_plenty = [sample("2024-01-01", 90.0), sample("2024-03-01", 70.0)];
        assert_eq!(
            compute_goal_progress(&lost_plenty, 10.0, 40),
            GoalProgress { progress: 100, change: 60 }
        );

        let gained = [sample("2024-01-01", 70.0), sample("2024-03-01", 75.0)];
        assert_eq!(
            compute_goal_progress(&gained, 10.0, 20),
            GoalProgress { progress: 0, change: -20 }
        );
    }

    #[test]
    fn refresh_progress_uses_custom_goal() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 80.0).unwrap();
        history.add_sample(day("2024-01-08"), 78.0).unwrap();
        let result = history.refresh_progress(4.0);
        assert_eq!(result.progress, 50);
        assert_eq!(history.goal_progress, 50);
        assert_eq!(history.goal_progress_change, 50);

        history.add_sample(day("2024-01-15"), 77.0).unwrap();
        history.refresh_progress(4.0);
        assert_eq!(history.goal_progress, 75);
        assert_eq!(history.goal_progress_change, 25);
    }

    #[test]
    fn sync_keeps_change_when_samples_are_untouched() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 80.0).unwrap();
        history.add_sample(day("2024-01-02"), 75.0).unwrap();
        history.sync_progress(10.0);
        assert_eq!((history.goal_progress, history.goal_progress_change), (50, 50));

        history.sync_progress(10.0);
        assert_eq!((history.goal_progress, history.goal_progress_change), (50, 50));

        // Same progress after an edit still reports no change.
        history.add_sample(day("2024-01-03"), 75.0).unwrap();
        history.sync_progress(10.0);
        assert_eq!((history.goal_progress, history.goal_progress_change), (50, 0));

        // A new goal size moves progress without touching samples.
        history.sync_progress(5.0);
        assert_eq!((history.goal_progress, history.goal_progress_change), (100, 50));
    }

    #[test]
    fn weight_lost_needs_two_samples() {
        let mut history = WeightHistory::default();
        history.add_sample(day("2024-01-01"), 80.0).unwrap();
        assert_eq!(history.weight_lost(), 0.0);
        history.add_sample(day("2024-01-05"), 78.5).unwrap();
        assert_eq!(history.weight_lost(), 1.5);
    }
}
