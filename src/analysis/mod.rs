/// Analysis: aggregation, trend regression, and forecasting.

pub mod forecast;
pub mod groupings;
pub mod regression;
