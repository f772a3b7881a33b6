use crate::transactions::ScoredTransaction;

/// Blocked transactions by amount, largest first, at most `n`.
/// The sort is stable, so equal amounts keep their input order.
pub fn top_blocked(transactions: &[ScoredTransaction], n: usize) -> Vec<ScoredTransaction> {
    let mut blocked: Vec<&ScoredTransaction> =
        transactions.iter().filter(|t| t.is_blocked()).collect();
    blocked.sort_by(|a, b| b.amount.total_cmp(&a.amount));
    blocked.into_iter().take(n).cloned().collect()
}
