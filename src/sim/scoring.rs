//! Final score calculation

/// Score for a finished run.
///
/// Ten points per second survived, ten per coin, plus an efficiency bonus of
/// fifty per coin divided by the number of jumps taken.
pub fn calculate_score(coins: u32, time_survived: f64, jumps: u32) -> u64 {
    let base = (time_survived * 10.0).floor().max(0.0) as u64;
    let coin_bonus = coins as u64 * 10;
    let efficiency_bonus = (coins as u64 * 50) / jumps.max(1) as u64;
    base + coin_bonus + efficiency_bonus
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_example() {
        // 123 + 50 + 25
        assert_eq!(calculate_score(5, 12.3, 10), 198);
    }

    #[test]
    fn test_zero_jumps_treated_as_one() {
        assert_eq!(calculate_score(2, 0.0, 0), 20 + 100);
    }

    #[test]
    fn test_efficiency_bonus_floors() {
        // 3 * 50 / 7 = 21.43 -> 21
        assert_eq!(calculate_score(3, 1.05, 7), 10 + 30 + 21);
    }
}
