use serde::{Deserialize, Serialize};

/// Aggregate order counts with derived rates.
///
/// Rates are percentages of the total order count, 0 when there are no
/// orders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderStatistics {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub confirmed_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,
    pub pending_cancellation_orders: u64,
    pub completion_rate: f64,
    pub cancellation_rate: f64,
}

impl OrderStatistics {
    pub fn new(
        total_orders: u64,
        pending_orders: u64,
        confirmed_orders: u64,
        delivered_orders: u64,
        cancelled_orders: u64,
        pending_cancellation_orders: u64,
    ) -> Self {
        let rate = |count: u64| {
            if total_orders == 0 {
                0.0
            } else {
                count as f64 / total_orders as f64 * 100.0
            }
        };
        Self {
            total_orders,
            pending_orders,
            confirmed_orders,
            delivered_orders,
            cancelled_orders,
            pending_cancellation_orders,
            completion_rate: rate(delivered_orders),
            cancellation_rate: rate(cancelled_orders),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rates_are_percentages_of_total() {
        let stats = OrderStatistics::new(10, 3, 2, 4, 1, 0);
        assert_eq!(stats.completion_rate, 40.0);
        assert_eq!(stats.cancellation_rate, 10.0);
    }

    #[test]
    fn rates_are_zero_without_orders() {
        let stats = OrderStatistics::new(0, 0, 0, 0, 0, 0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.cancellation_rate, 0.0);
    }
}
