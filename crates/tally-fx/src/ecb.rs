//! # ECB Reference Rate Document
//!
//! Parses the European Central Bank's daily `eurofxref` XML.
//!
//! ```text
//! <gesmes:Envelope ...>
//!   <Cube>
//!     <Cube time="2024-05-17">
//!       <Cube currency="USD" rate="1.0867"/>
//!       <Cube currency="JPY" rate="169.23"/>
//!       ...
//!     </Cube>
//!   </Cube>
//! </gesmes:Envelope>
//! ```
//!
//! Every `Cube` carrying both `currency` and `rate` becomes a table entry.
//! The feed does not list EUR; it is added with rate 1.

use chrono::NaiveDate;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use rust_decimal::Decimal;
use std::str::FromStr;
use tracing::debug;

use crate::currency::{Currency, RateTable};
use crate::error::{FxError, FxResult};

/// Where the daily reference rates are published.
pub const ECB_DAILY_URL: &str = "https://www.ecb.europa.eu/stats/eurofxref/eurofxref-daily.xml";

const CUBE: &[u8] = b"Cube";

#[derive(Default)]
struct CubeAttrs {
    time: Option<String>,
    currency: Option<String>,
    rate: Option<String>,
}

fn cube_attrs(element: &BytesStart<'_>) -> FxResult<CubeAttrs> {
    let mut attrs = CubeAttrs::default();
    for attr in element.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.into_owned();
        match attr.key.local_name().as_ref() {
            b"time" => attrs.time = Some(value),
            b"currency" => attrs.currency = Some(value),
            b"rate" => attrs.rate = Some(value),
            _ => {}
        }
    }
    Ok(attrs)
}

/// Builds a [`RateTable`] from an ECB daily document.
///
/// ## Errors
/// - `Xml` for malformed XML or an unparseable date
/// - `InvalidRate` for a rate that is not a positive decimal
/// - `DuplicateCurrency` when the document lists a currency twice
pub fn parse_daily(xml: &str) -> FxResult<RateTable> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut table = RateTable::new();

    loop {
        match reader.read_event()? {
            Event::Start(element) | Event::Empty(element)
                if element.local_name().as_ref() == CUBE =>
            {
                let attrs = cube_attrs(&element)?;

                if let Some(time) = attrs.time {
                    let date = NaiveDate::parse_from_str(&time, "%Y-%m-%d")
                        .map_err(|e| FxError::Xml(format!("bad date {:?}: {}", time, e)))?;
                    table.set_date(date);
                }

                if let (Some(currency), Some(rate)) = (attrs.currency, attrs.rate) {
                    let parsed = Decimal::from_str(&rate).map_err(|_| FxError::InvalidRate {
                        currency: currency.clone(),
                        rate: rate.clone(),
                    })?;
                    table.add(Currency::new(currency, parsed)?)?;
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if table.get_by_name("EUR").is_none() {
        table.add(Currency::new("EUR", Decimal::ONE)?)?;
    }

    debug!(date = ?table.date(), currencies = table.len(), "Parsed ECB rate document");
    Ok(table)
}
