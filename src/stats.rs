//! Campus health score, derived from the live signal set on every request.
use crate::models::{RiskLevel, Signal, SignalStatus, Stats};

/// Sparkline history shown before the live score. Placeholder values; no
/// real time series is persisted behind them yet.
const TREND_HISTORY: [i64; 6] = [65, 70, 68, 75, 80, 85];

/// Score formula: start at 100, subtract 2 per unresolved signal and 3 per
/// critical signal, hard-clamped to `[0, 100]`.
pub fn compute(signals: &[Signal]) -> Stats {
    let active_signals = signals
        .iter()
        .filter(|signal| signal.status != SignalStatus::Resolved)
        .count();
    let critical_signals = signals
        .iter()
        .filter(|signal| signal.risk_level == RiskLevel::Critical)
        .count();

    let raw = 100 - 2 * active_signals as i64 - 3 * critical_signals as i64;
    let health_score = raw.clamp(0, 100);

    let mut trend = TREND_HISTORY.to_vec();
    trend.push(health_score);

    Stats {
        health_score,
        active_signals,
        trend,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_signal(status: SignalStatus, risk_level: RiskLevel) -> Signal {
        Signal {
            id: "s1".to_string(),
            title: "Water Leak".to_string(),
            category: "Facilities".to_string(),
            location: "B2".to_string(),
            timestamp: "Just now".to_string(),
            risk_level,
            description: "Leak near the stairwell".to_string(),
            status,
        }
    }

    #[test]
    fn empty_signal_set_scores_full_health() {
        let stats = compute(&[]);

        assert_eq!(stats.health_score, 100);
        assert_eq!(stats.active_signals, 0);
        assert_eq!(stats.trend, vec![65, 70, 68, 75, 80, 85, 100]);
    }

    #[test]
    fn active_and_critical_signals_subtract() {
        let signals = vec![
            sample_signal(SignalStatus::Open, RiskLevel::Critical),
            sample_signal(SignalStatus::Investigating, RiskLevel::Low),
        ];

        // 100 - 2*2 - 3*1
        let stats = compute(&signals);

        assert_eq!(stats.health_score, 93);
        assert_eq!(stats.active_signals, 2);
    }

    #[test]
    fn resolved_critical_signal_still_counts_as_critical() {
        let signals = vec![sample_signal(SignalStatus::Resolved, RiskLevel::Critical)];

        let stats = compute(&signals);

        assert_eq!(stats.active_signals, 0);
        assert_eq!(stats.health_score, 97);
    }

    #[test]
    fn score_clamps_at_zero() {
        let signals: Vec<Signal> = (0..60)
            .map(|_| sample_signal(SignalStatus::Open, RiskLevel::Low))
            .collect();

        // 100 - 120 = -20, floored at 0
        let stats = compute(&signals);

        assert_eq!(stats.health_score, 0);
        assert_eq!(stats.active_signals, 60);
    }

    #[test]
    fn trend_ends_with_current_score() {
        let signals = vec![sample_signal(SignalStatus::Open, RiskLevel::Moderate)];

        let stats = compute(&signals);

        assert_eq!(stats.trend.len(), 7);
        assert_eq!(*stats.trend.last().unwrap(), stats.health_score);
    }
}
