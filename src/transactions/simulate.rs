//! Synthetic transactions for the live feed demo. Roughly a quarter look fraudulent:
//! large amounts, night hours, device churn, bursty logins.

use super::TransactionFeatures;
use crate::live::BatchSource;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Mock ids count up from here.
pub const FIRST_MOCK_ID: i64 = 10_000;

const OS_FAMILIES: [&str; 4] = ["iOS", "Android", "Windows", "macOS"];
const PHONE_BRANDS: [&str; 6] = ["Apple", "Samsung", "Xiaomi", "Huawei", "Google", "Unknown"];
const DIRECTION_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const DIRECTION_LEN: usize = 24;

pub struct MockTrafficSource {
    rng: StdRng,
    next_id: i64,
    max_batch: usize,
}

impl Default for MockTrafficSource {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTrafficSource {
    pub fn new() -> Self {
        Self::from_rng(StdRng::from_entropy())
    }

    /// Reproducible stream for tests and benches.
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(StdRng::seed_from_u64(seed))
    }

    fn from_rng(rng: StdRng) -> Self {
        Self {
            rng,
            next_id: FIRST_MOCK_ID,
            max_batch: 3,
        }
    }

    pub fn next_id(&self) -> i64 {
        self.next_id
    }

    pub fn transaction(&mut self) -> TransactionFeatures {
        let id = self.next_id;
        self.next_id += 1;
        let rng = &mut self.rng;

        let is_fraud = rng.gen::<f64>() > 0.75;
        let amount = if is_fraud {
            rng.gen_range(50_000..=550_000) as f64
        } else {
            rng.gen_range(1_000..=31_000) as f64
        };
        let hour_of_day: u8 = if is_fraud {
            if rng.gen_bool(0.5) {
                rng.gen_range(0..5)
            } else {
                rng.gen_range(0..24)
            }
        } else {
            rng.gen_range(8..22)
        };
        let day_of_week: u8 = rng.gen_range(0..7);
        let logins_last_7_days: u32 = if is_fraud {
            rng.gen_range(20..70)
        } else {
            rng.gen_range(1..16)
        };
        let logins_last_30_days = logins_last_7_days + rng.gen_range(0..50);
        let avg_login_interval_30d = rng.gen_range(10_000.0..110_000.0);

        TransactionFeatures {
            transaction_id: Some(id),
            amount,
            log_amount: (amount + 1.0).ln(),
            hour_of_day,
            day_of_week,
            is_night: u8::from(hour_of_day >= 22 || hour_of_day < 6),
            is_weekend: u8::from(day_of_week >= 5),
            is_month_end: u8::from(rng.gen::<f64>() > 0.85),
            is_month_start: u8::from(rng.gen::<f64>() > 0.9),
            monthly_os_changes: if is_fraud {
                rng.gen_range(2..8)
            } else {
                rng.gen_range(0..2)
            },
            monthly_phone_model_changes: if is_fraud { rng.gen_range(1..5) } else { 0 },
            logins_last_7_days,
            logins_last_30_days,
            login_frequency_7d: logins_last_7_days as f64 / 7.0,
            login_frequency_30d: logins_last_30_days as f64 / 30.0,
            freq_change_7d_vs_mean: if is_fraud {
                rng.gen_range(1.0..4.0)
            } else {
                rng.gen_range(0.0..0.5)
            },
            logins_7d_over_30d_ratio: if logins_last_30_days > 0 {
                logins_last_7_days as f64 / logins_last_30_days as f64
            } else {
                0.0
            },
            avg_login_interval_30d,
            std_login_interval_30d: rng.gen_range(0.0..150_000.0),
            ewm_login_interval_7d: avg_login_interval_30d * rng.gen_range(0.5..1.0),
            burstiness_login_interval: if is_fraud {
                rng.gen_range(0.5..1.0)
            } else {
                rng.gen_range(0.0..0.3)
            },
            zscore_avg_login_interval_7d: if is_fraud {
                rng.gen_range(1.0..5.0)
            } else {
                rng.gen_range(-0.5..0.5)
            },
            is_cold_start: u8::from(rng.gen::<f64>() > 0.92),
            os_family: OS_FAMILIES[rng.gen_range(0..OS_FAMILIES.len())].to_string(),
            phone_brand: PHONE_BRANDS[rng.gen_range(0..PHONE_BRANDS.len())].to_string(),
            direction: (0..DIRECTION_LEN)
                .map(|_| DIRECTION_ALPHABET[rng.gen_range(0..DIRECTION_ALPHABET.len())] as char)
                .collect(),
            is_fraud: None,
        }
    }
}

impl BatchSource for MockTrafficSource {
    /// 1 to 3 transactions per tick.
    fn next_batch(&mut self) -> Vec<TransactionFeatures> {
        let size = self.rng.gen_range(1..=self.max_batch);
        (0..size).map(|_| self.transaction()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_sequential_across_batches() {
        let mut src = MockTrafficSource::with_seed(7);
        let a = src.next_batch();
        let b = src.next_batch();
        let ids: Vec<i64> = a.iter().chain(b.iter()).filter_map(|t| t.transaction_id).collect();
        let expected: Vec<i64> = (FIRST_MOCK_ID..FIRST_MOCK_ID + ids.len() as i64).collect();
        assert_eq!(ids, expected);
        assert_eq!(src.next_id(), FIRST_MOCK_ID + ids.len() as i64);
    }

    #[test]
    fn batches_hold_one_to_three() {
        let mut src = MockTrafficSource::with_seed(42);
        for _ in 0..200 {
            let n = src.next_batch().len();
            assert!((1..=3).contains(&n));
        }
    }

    #[test]
    fn derived_fields_are_consistent() {
        let mut src = MockTrafficSource::with_seed(3);
        for _ in 0..500 {
            let t = src.transaction();
            assert!(t.amount >= 1_000.0 && t.amount <= 550_000.0);
            assert!((t.log_amount - (t.amount + 1.0).ln()).abs() < 1e-9);
            assert_eq!(t.is_night == 1, t.hour_of_day >= 22 || t.hour_of_day < 6);
            assert_eq!(t.is_weekend == 1, t.day_of_week >= 5);
            assert!(t.logins_last_30_days >= t.logins_last_7_days);
            assert_eq!(t.direction.len(), DIRECTION_LEN);
            assert!(t.is_fraud.is_none());
        }
    }
}
