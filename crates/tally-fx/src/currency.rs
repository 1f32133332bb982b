//! # Currencies and Rate Tables
//!
//! Rates are quoted against the euro: `rate` is how many units of the
//! currency one EUR buys. EUR itself is always present with rate 1.
//!
//! ## Conversion
//! ```text
//! value (source) ──÷ source.rate──► EUR ──× target.rate──► value (target)
//!                   10 decimal places,
//!                   rounded toward +∞
//! ```

use chrono::NaiveDate;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tally_core::Money;

use crate::error::{FxError, FxResult};

/// Decimal places kept for the intermediate EUR amount.
const EUR_SCALE: u32 = 10;

// =============================================================================
// Currency Code
// =============================================================================

/// The currencies published in the ECB reference rate feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CurrencyCode {
    Aud,
    Bgn,
    Brl,
    Cad,
    Chf,
    Cny,
    Czk,
    Dkk,
    Eur,
    Gbp,
    Hkd,
    Hrk,
    Huf,
    Idr,
    Ils,
    Inr,
    Jpy,
    Krw,
    Mxn,
    Myr,
    Nok,
    Nzd,
    Php,
    Pln,
    Ron,
    Rub,
    Sek,
    Sgd,
    Thb,
    Try,
    Usd,
    Zar,
}

impl CurrencyCode {
    pub const ALL: [CurrencyCode; 32] = [
        CurrencyCode::Aud,
        CurrencyCode::Bgn,
        CurrencyCode::Brl,
        CurrencyCode::Cad,
        CurrencyCode::Chf,
        CurrencyCode::Cny,
        CurrencyCode::Czk,
        CurrencyCode::Dkk,
        CurrencyCode::Eur,
        CurrencyCode::Gbp,
        CurrencyCode::Hkd,
        CurrencyCode::Hrk,
        CurrencyCode::Huf,
        CurrencyCode::Idr,
        CurrencyCode::Ils,
        CurrencyCode::Inr,
        CurrencyCode::Jpy,
        CurrencyCode::Krw,
        CurrencyCode::Mxn,
        CurrencyCode::Myr,
        CurrencyCode::Nok,
        CurrencyCode::Nzd,
        CurrencyCode::Php,
        CurrencyCode::Pln,
        CurrencyCode::Ron,
        CurrencyCode::Rub,
        CurrencyCode::Sek,
        CurrencyCode::Sgd,
        CurrencyCode::Thb,
        CurrencyCode::Try,
        CurrencyCode::Usd,
        CurrencyCode::Zar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CurrencyCode::Aud => "AUD",
            CurrencyCode::Bgn => "BGN",
            CurrencyCode::Brl => "BRL",
            CurrencyCode::Cad => "CAD",
            CurrencyCode::Chf => "CHF",
            CurrencyCode::Cny => "CNY",
            CurrencyCode::Czk => "CZK",
            CurrencyCode::Dkk => "DKK",
            CurrencyCode::Eur => "EUR",
            CurrencyCode::Gbp => "GBP",
            CurrencyCode::Hkd => "HKD",
            CurrencyCode::Hrk => "HRK",
            CurrencyCode::Huf => "HUF",
            CurrencyCode::Idr => "IDR",
            CurrencyCode::Ils => "ILS",
            CurrencyCode::Inr => "INR",
            CurrencyCode::Jpy => "JPY",
            CurrencyCode::Krw => "KRW",
            CurrencyCode::Mxn => "MXN",
            CurrencyCode::Myr => "MYR",
            CurrencyCode::Nok => "NOK",
            CurrencyCode::Nzd => "NZD",
            CurrencyCode::Php => "PHP",
            CurrencyCode::Pln => "PLN",
            CurrencyCode::Ron => "RON",
            CurrencyCode::Rub => "RUB",
            CurrencyCode::Sek => "SEK",
            CurrencyCode::Sgd => "SGD",
            CurrencyCode::Thb => "THB",
            CurrencyCode::Try => "TRY",
            CurrencyCode::Usd => "USD",
            CurrencyCode::Zar => "ZAR",
        }
    }
}

impl fmt::Display for CurrencyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CurrencyCode {
    type Err = FxError;

    /// Case-insensitive: `"usd"`, `"Usd"` and `"USD"` all parse.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        CurrencyCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FxError::UnknownCurrency(s.to_string()))
    }
}

// =============================================================================
// Currency
// =============================================================================

/// A currency and its rate against EUR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    name: String,
    rate: Decimal,
}

impl Currency {
    /// ## Errors
    /// `InvalidRate` unless `rate > 0`.
    pub fn new(name: impl Into<String>, rate: Decimal) -> FxResult<Self> {
        let name = name.into();
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate {
                currency: name,
                rate: rate.to_string(),
            });
        }
        Ok(Currency { name, rate })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn rate(&self) -> Decimal {
        self.rate
    }

    /// The matching ISO code, if the currency is one we know.
    pub fn code(&self) -> Option<CurrencyCode> {
        self.name.parse().ok()
    }
}

// =============================================================================
// Rate Table
// =============================================================================

/// A dated set of EUR-relative rates, sorted by currency name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateTable {
    date: Option<NaiveDate>,
    currencies: Vec<Currency>,
}

impl RateTable {
    pub fn new() -> Self {
        RateTable::default()
    }

    pub fn with_date(date: NaiveDate) -> Self {
        RateTable {
            date: Some(date),
            currencies: Vec::new(),
        }
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn set_date(&mut self, date: NaiveDate) {
        self.date = Some(date);
    }

    /// Inserts a currency, keeping the table sorted case-insensitively.
    ///
    /// ## Errors
    /// `DuplicateCurrency` when a currency with the same name (ignoring
    /// case) is present.
    pub fn add(&mut self, currency: Currency) -> FxResult<()> {
        if self.get_by_name(currency.name()).is_some() {
            return Err(FxError::DuplicateCurrency(currency.name));
        }

        let key = currency.name.to_lowercase();
        let index = self
            .currencies
            .partition_point(|c| c.name.to_lowercase() < key);
        self.currencies.insert(index, currency);
        Ok(())
    }

    pub fn get(&self, code: CurrencyCode) -> Option<&Currency> {
        self.get_by_name(code.as_str())
    }

    pub fn get_by_name(&self, name: &str) -> Option<&Currency> {
        self.currencies
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    pub fn currencies(&self) -> &[Currency] {
        &self.currencies
    }

    pub fn len(&self) -> usize {
        self.currencies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.currencies.is_empty()
    }

    fn rate_of(&self, code: CurrencyCode) -> FxResult<Decimal> {
        self.get(code)
            .map(Currency::rate)
            .ok_or_else(|| FxError::UnknownCurrency(code.to_string()))
    }

    /// Converts `value` from `source` to `target`.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use tally_fx::{Currency, CurrencyCode, RateTable};
    ///
    /// let mut table = RateTable::new();
    /// table.add(Currency::new("EUR", Decimal::ONE).unwrap()).unwrap();
    /// table.add(Currency::new("USD", Decimal::new(125, 2)).unwrap()).unwrap();
    ///
    /// let usd = table.convert(Decimal::from(10), CurrencyCode::Eur, CurrencyCode::Usd).unwrap();
    /// assert_eq!(usd, Decimal::new(125, 1));
    /// ```
    ///
    /// ## Errors
    /// - `UnknownCurrency` when either code is missing from the table
    /// - `Overflow` when the result does not fit a `Decimal`
    pub fn convert(
        &self,
        value: Decimal,
        source: CurrencyCode,
        target: CurrencyCode,
    ) -> FxResult<Decimal> {
        let source_rate = self.rate_of(source)?;
        let target_rate = self.rate_of(target)?;

        let overflow = || FxError::Overflow {
            value: value.to_string(),
            source_code: source.to_string(),
            target_code: target.to_string(),
        };

        let in_eur = value
            .checked_div(source_rate)
            .ok_or_else(overflow)?
            .round_dp_with_strategy(EUR_SCALE, RoundingStrategy::ToPositiveInfinity);

        in_eur.checked_mul(target_rate).ok_or_else(overflow)
    }

    /// Converts a cent amount, rounding the result to cents (banker's rounding).
    pub fn convert_money(
        &self,
        amount: Money,
        source: CurrencyCode,
        target: CurrencyCode,
    ) -> FxResult<Money> {
        let converted = self.convert(amount.to_decimal(), source, target)?;
        Money::from_decimal(converted).ok_or_else(|| FxError::Overflow {
            value: amount.to_string(),
            source_code: source.to_string(),
            target_code: target.to_string(),
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> RateTable {
        let mut table = RateTable::with_date(NaiveDate::from_ymd_opt(2024, 5, 17).unwrap());
        table.add(Currency::new("USD", Decimal::new(10867, 4)).unwrap()).unwrap();
        table.add(Currency::new("EUR", Decimal::ONE).unwrap()).unwrap();
        table.add(Currency::new("JPY", Decimal::new(16923, 2)).unwrap()).unwrap();
        table.add(Currency::new("gbp", Decimal::new(85553, 5)).unwrap()).unwrap();
        table
    }

    #[test]
    fn test_code_parsing_is_case_insensitive() {
        assert_eq!("usd".parse::<CurrencyCode>().unwrap(), CurrencyCode::Usd);
        assert_eq!(" Eur ".parse::<CurrencyCode>().unwrap(), CurrencyCode::Eur);
        assert!(matches!(
            "XYZ".parse::<CurrencyCode>(),
            Err(FxError::UnknownCurrency(_))
        ));
    }

    #[test]
    fn test_every_code_round_trips_through_display() {
        for code in CurrencyCode::ALL {
            assert_eq!(code.to_string().parse::<CurrencyCode>().unwrap(), code);
        }
    }

    #[test]
    fn test_rate_must_be_positive() {
        assert!(Currency::new("USD", Decimal::ZERO).is_err());
        assert!(Currency::new("USD", Decimal::new(-1, 0)).is_err());
    }

    #[test]
    fn test_table_is_sorted_ignoring_case() {
        let table = table();
        let names: Vec<&str> = table.currencies().iter().map(Currency::name).collect();
        assert_eq!(names, ["EUR", "gbp", "JPY", "USD"]);
    }

    #[test]
    fn test_duplicate_currency_rejected() {
        let mut table = table();
        let err = table
            .add(Currency::new("usd", Decimal::ONE).unwrap())
            .unwrap_err();
        assert!(matches!(err, FxError::DuplicateCurrency(_)));
        assert_eq!(table.len(), 4);
    }

    #[test]
    fn test_lookup() {
        let table = table();
        assert_eq!(table.get(CurrencyCode::Gbp).unwrap().name(), "gbp");
        assert_eq!(table.get_by_name("Jpy").unwrap().code(), Some(CurrencyCode::Jpy));
        assert!(table.get(CurrencyCode::Chf).is_none());
    }

    #[test]
    fn test_convert_from_eur() {
        let usd = table()
            .convert(Decimal::from(100), CurrencyCode::Eur, CurrencyCode::Usd)
            .unwrap();
        assert_eq!(usd, Decimal::new(10867, 2));
    }

    #[test]
    fn test_convert_rounds_eur_leg_up() {
        // 1 / 1.0867 = 0.920217171252...; the tenth decimal rounds up
        let eur = table()
            .convert(Decimal::ONE, CurrencyCode::Usd, CurrencyCode::Eur)
            .unwrap();
        assert_eq!(eur, Decimal::new(9202171713, 10));
    }

    #[test]
    fn test_round_trip_stays_close() {
        let table = table();
        for code in [CurrencyCode::Usd, CurrencyCode::Jpy, CurrencyCode::Gbp] {
            let out = table.convert(Decimal::from(250), CurrencyCode::Eur, code).unwrap();
            let back = table.convert(out, code, CurrencyCode::Eur).unwrap();
            assert!((back - Decimal::from(250)).abs() < Decimal::new(1, 6));
        }
    }

    #[test]
    fn test_unknown_currency() {
        let err = table()
            .convert(Decimal::ONE, CurrencyCode::Chf, CurrencyCode::Eur)
            .unwrap_err();
        assert!(matches!(err, FxError::UnknownCurrency(code) if code == "CHF"));
    }

    #[test]
    fn test_convert_money() {
        let yen = table()
            .convert_money(Money::from_cents(1000), CurrencyCode::Eur, CurrencyCode::Jpy)
            .unwrap();
        assert_eq!(yen, Money::from_cents(169230));
    }
}
