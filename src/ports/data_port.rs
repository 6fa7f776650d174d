//! Price data access port trait.

use chrono::NaiveDate;

use crate::domain::error::CrosstraderError;
use crate::domain::series::PriceSeries;

pub trait DataPort {
    /// Load the closing-price series, optionally restricted to an inclusive
    /// date range. The returned series satisfies the `PriceSeries`
    /// invariants: strictly increasing dates, positive finite closes.
    fn fetch_prices(
        &self,
        start_date: Option<NaiveDate>,
        end_date: Option<NaiveDate>,
    ) -> Result<PriceSeries, CrosstraderError>;

    /// First date, last date and observation count of the full data set,
    /// or None when it is empty.
    fn data_range(&self) -> Result<Option<(NaiveDate, NaiveDate, usize)>, CrosstraderError>;
}
