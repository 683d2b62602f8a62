//! Global account lock order
//!
//! Any unit of work that updates two accounts updates the one with the
//! smaller ID first. With every transfer acquiring row locks in the same
//! order, two transfers on the same pair (in either direction) can never
//! hold one lock each while waiting for the other.
//!
//! ```text
//! A(1) -> B(2):  lock 1 (debit)  then lock 2 (credit)
//! B(2) -> A(1):  lock 1 (credit) then lock 2 (debit)
//! ```
//!
//! A self-transfer would lock the same row twice in one unit; callers must
//! reject it before opening the unit.

use rust_decimal::Decimal;

use crate::core_types::AccountId;

/// Balance change of one account within a transfer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leg {
    pub account_id: AccountId,
    pub delta: Decimal,
}

/// The two legs of a transfer in lock-acquisition order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LockOrder {
    first: Leg,
    second: Leg,
    source_first: bool,
}

impl LockOrder {
    /// Order the debit of `from` and the credit of `to` by account ID
    pub fn for_transfer(from: AccountId, to: AccountId, amount: Decimal) -> Self {
        let debit = Leg {
            account_id: from,
            delta: -amount,
        };
        let credit = Leg {
            account_id: to,
            delta: amount,
        };

        if from < to {
            Self {
                first: debit,
                second: credit,
                source_first: true,
            }
        } else {
            Self {
                first: credit,
                second: debit,
                source_first: false,
            }
        }
    }

    /// Leg to apply first (lower account ID)
    pub fn first(&self) -> Leg {
        self.first
    }

    /// Leg to apply second (higher account ID)
    pub fn second(&self) -> Leg {
        self.second
    }

    /// Map results produced in lock order back to `(from, to)`
    pub fn into_from_to<T>(&self, first: T, second: T) -> (T, T) {
        if self.source_first {
            (first, second)
        } else {
            (second, first)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lower_source_debits_first() {
        let order = LockOrder::for_transfer(1, 2, Decimal::from(10));

        assert_eq!(order.first().account_id, 1);
        assert_eq!(order.first().delta, Decimal::from(-10));
        assert_eq!(order.second().account_id, 2);
        assert_eq!(order.second().delta, Decimal::from(10));
    }

    #[test]
    fn test_higher_source_credits_first() {
        let order = LockOrder::for_transfer(2, 1, Decimal::from(10));

        assert_eq!(order.first().account_id, 1);
        assert_eq!(order.first().delta, Decimal::from(10));
        assert_eq!(order.second().account_id, 2);
        assert_eq!(order.second().delta, Decimal::from(-10));
    }

    #[test]
    fn test_both_directions_lock_same_sequence() {
        let ab = LockOrder::for_transfer(42, 7, Decimal::ONE);
        let ba = LockOrder::for_transfer(7, 42, Decimal::ONE);

        assert_eq!(ab.first().account_id, ba.first().account_id);
        assert_eq!(ab.second().account_id, ba.second().account_id);
    }

    #[test]
    fn test_into_from_to_restores_caller_direction() {
        let forward = LockOrder::for_transfer(1, 2, Decimal::ONE);
        assert_eq!(forward.into_from_to("one", "two"), ("one", "two"));

        let backward = LockOrder::for_transfer(2, 1, Decimal::ONE);
        // Locked 1 first, but the caller's "from" is account 2
        assert_eq!(backward.into_from_to("one", "two"), ("two", "one"));
    }

    #[test]
    fn test_deltas_net_to_zero() {
        let order = LockOrder::for_transfer(5, 3, Decimal::new(1234, 2));
        assert_eq!(order.first().delta + order.second().delta, Decimal::ZERO);
    }
}
