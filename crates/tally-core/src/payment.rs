//! # Payment
//!
//! A payment towards a sale. Immutable once constructed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreResult;
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation::validate_payment_amount;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    method: PaymentMethod,
    amount: Money,
    timestamp: DateTime<Utc>,
}

impl Payment {
    /// Creates a payment stamped with the current time.
    ///
    /// ## Errors
    /// `Validation(MustBePositive)` when `amount <= 0`.
    pub fn new(method: PaymentMethod, amount: Money) -> CoreResult<Self> {
        Self::with_timestamp(method, amount, Utc::now())
    }

    /// Creates a payment with an explicit timestamp (imports, tests).
    pub fn with_timestamp(
        method: PaymentMethod,
        amount: Money,
        timestamp: DateTime<Utc>,
    ) -> CoreResult<Self> {
        validate_payment_amount(amount)?;
        Ok(Payment {
            method,
            amount,
            timestamp,
        })
    }

    #[inline]
    pub fn method(&self) -> PaymentMethod {
        self.method
    }

    #[inline]
    pub fn amount(&self) -> Money {
        self.amount
    }

    #[inline]
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }
}
