use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Unique identifier for an order aggregate.
///
/// Wraps a UUID to provide type safety and prevent mixing up
/// order IDs with other UUID-based identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(Uuid);

impl OrderId {
    /// Creates a new random order ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an order ID from an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The all-zero identifier, used as a placeholder where no real
    /// identity has been assigned yet.
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }

    /// Returns the underlying UUID.
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for OrderId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Uuid> for OrderId {
    fn from(uuid: Uuid) -> Self {
        Self(uuid)
    }
}

impl From<OrderId> for Uuid {
    fn from(id: OrderId) -> Self {
        id.0
    }
}

/// Error returned when a customer ID fails validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidCustomerId {
    /// Customer ID must not be empty.
    #[error("customer ID must not be empty")]
    Empty,

    /// Customer ID exceeds the 100 character limit.
    #[error("customer ID exceeds 100 characters (got {0})")]
    TooLong(usize),
}

/// Identifier for a customer, assigned by an external identity system.
///
/// Free-form, non-empty, at most 100 characters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CustomerId(String);

impl CustomerId {
    /// Maximum length of a customer ID in characters.
    pub const MAX_LEN: usize = 100;

    /// Creates a customer ID, validating length constraints.
    pub fn new(id: impl Into<String>) -> Result<Self, InvalidCustomerId> {
        let id = id.into();
        if id.is_empty() {
            return Err(InvalidCustomerId::Empty);
        }
        let len = id.chars().count();
        if len > Self::MAX_LEN {
            return Err(InvalidCustomerId::TooLong(len));
        }
        Ok(Self(id))
    }

    /// Returns the customer ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CustomerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for CustomerId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Identifier for a product in the remote catalog service.
///
/// Products belong to another service; this is a plain numeric reference
/// with no local foreign-key enforcement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(u64);

impl ProductId {
    /// Creates a product ID from a raw numeric value.
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw numeric value.
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ProductId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Money amount represented in cents to avoid floating point issues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Money {
    /// Amount in cents (e.g., 1000 = $10.00)
    cents: i64,
}

impl Money {
    /// The largest amount an order may carry: $999,999.99.
    pub const MAX: Money = Money { cents: 99_999_999 };

    /// Creates a new Money amount from cents.
    pub fn from_cents(cents: i64) -> Self {
        Self { cents }
    }

    /// Returns zero money.
    pub fn zero() -> Self {
        Self { cents: 0 }
    }

    /// Returns the amount in cents.
    pub fn cents(&self) -> i64 {
        self.cents
    }

    /// Returns the dollar portion (whole number).
    pub fn dollars(&self) -> i64 {
        self.cents / 100
    }

    /// Returns the cents portion (remainder after dollars).
    pub fn cents_part(&self) -> i64 {
        self.cents.abs() % 100
    }

    /// Returns true if the amount is positive.
    pub fn is_positive(&self) -> bool {
        self.cents > 0
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.cents == 0
    }

    /// Multiplies by a quantity, saturating at the numeric bounds.
    ///
    /// A saturated result always exceeds [`Money::MAX`] and fails the
    /// order cap check.
    pub fn multiply(&self, quantity: u32) -> Money {
        Money {
            cents: self.cents.saturating_mul(quantity as i64),
        }
    }
}

impl Default for Money {
    fn default() -> Self {
        Self::zero()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.cents < 0 {
            write!(f, "-${}.{:02}", self.dollars().abs(), self.cents_part())
        } else {
            write!(f, "${}.{:02}", self.dollars(), self.cents_part())
        }
    }
}

impl std::ops::Add for Money {
    type Output = Money;

    fn add(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_add(rhs.cents),
        }
    }
}

impl std::ops::Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Self) -> Self::Output {
        Money {
            cents: self.cents.saturating_sub(rhs.cents),
        }
    }
}

impl std::ops::AddAssign for Money {
    fn add_assign(&mut self, rhs: Self) {
        self.cents = self.cents.saturating_add(rhs.cents);
    }
}

/// Optimistic-concurrency counter for persisted aggregates.
///
/// Starts at 0 for an unsaved aggregate and is bumped by the repository
/// on every successful save. A save carrying a stale version is rejected.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct Version(i64);

impl Version {
    /// The version of an aggregate that has never been saved.
    pub fn initial() -> Self {
        Self(0)
    }

    /// Creates a version from a raw counter value.
    pub fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the version after one more save.
    pub fn next(&self) -> Self {
        Self(self.0 + 1)
    }

    /// Returns the raw counter value.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_id_new_creates_unique_ids() {
        let id1 = OrderId::new();
        let id2 = OrderId::new();
        assert_ne!(id1, id2);
    }

    #[test]
    fn order_id_from_uuid_preserves_value() {
        let uuid = Uuid::new_v4();
        let id = OrderId::from_uuid(uuid);
        assert_eq!(id.as_uuid(), uuid);
    }

    #[test]
    fn order_id_serialization_roundtrip() {
        let id = OrderId::new();
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: OrderId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);
    }

    #[test]
    fn customer_id_accepts_valid_strings() {
        let id = CustomerId::new("C1").unwrap();
        assert_eq!(id.as_str(), "C1");
    }

    #[test]
    fn customer_id_rejects_empty() {
        assert_eq!(CustomerId::new(""), Err(InvalidCustomerId::Empty));
    }

    #[test]
    fn customer_id_rejects_too_long() {
        let long = "x".repeat(101);
        assert_eq!(CustomerId::new(long), Err(InvalidCustomerId::TooLong(101)));
    }

    #[test]
    fn customer_id_accepts_exactly_max_length() {
        let id = CustomerId::new("x".repeat(100)).unwrap();
        assert_eq!(id.as_str().len(), 100);
    }

    #[test]
    fn product_id_value_roundtrip() {
        let id = ProductId::new(42);
        assert_eq!(id.value(), 42);
        assert_eq!(id.to_string(), "42");
    }

    #[test]
    fn money_from_cents() {
        let money = Money::from_cents(1234);
        assert_eq!(money.cents(), 1234);
        assert_eq!(money.dollars(), 12);
        assert_eq!(money.cents_part(), 34);
    }

    #[test]
    fn money_display() {
        assert_eq!(Money::from_cents(1234).to_string(), "$12.34");
        assert_eq!(Money::from_cents(100).to_string(), "$1.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(-1234).to_string(), "-$12.34");
    }

    #[test]
    fn money_arithmetic() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!(a.multiply(3).cents(), 3000);
    }

    #[test]
    fn money_arithmetic_saturates_at_bounds() {
        let extreme = Money::from_cents(i64::MAX / 10);
        assert_eq!(extreme.multiply(1000).cents(), i64::MAX);
        assert_eq!((extreme.multiply(1000) + extreme).cents(), i64::MAX);

        let mut sum = extreme.multiply(1000);
        sum += extreme;
        assert_eq!(sum.cents(), i64::MAX);
    }

    #[test]
    fn money_max_is_bounded() {
        assert_eq!(Money::MAX.cents(), 99_999_999);
        assert!(Money::from_cents(99_999_999) <= Money::MAX);
        assert!(Money::from_cents(100_000_000) > Money::MAX);
    }

    #[test]
    fn version_next_increments() {
        let v = Version::initial();
        assert_eq!(v.as_i64(), 0);
        assert_eq!(v.next().as_i64(), 1);
        assert_eq!(v.next().next().as_i64(), 2);
    }
}
