/// Linear pool-share accrual over one settlement window.
///
/// Formula: staked × elapsed × rate / total_staked
///
/// Example:
/// - staked: 100, total_staked: 1,000
/// - elapsed: 1,000 s, rate: 10,000
/// - reward: 100 × 1,000 × 10,000 / 1,000 = 1,000,000
pub fn accrued_reward(
    staked: i128,
    elapsed: u64,
    reward_rate: i128,
    total_staked: i128,
) -> Option<i128> {
    if staked <= 0 || total_staked <= 0 || elapsed == 0 || reward_rate == 0 {
        return Some(0);
    }

    staked
        .checked_mul(elapsed as i128)?
        .checked_mul(reward_rate)?
        .checked_div(total_staked)
}
