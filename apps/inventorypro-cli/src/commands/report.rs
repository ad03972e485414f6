//! Dashboard and sales report commands.
//!
//! Both read one consistent snapshot and aggregate it with the pure
//! functions in `inventorypro_core::report`.

use crate::error::ApiError;
use inventorypro_core::{DashboardSummary, SalesReport};
use inventorypro_db::Database;

/// Headline numbers for the home screen.
pub async fn dashboard(db: &Database) -> Result<DashboardSummary, ApiError> {
    let state = db.snapshot().await?;
    Ok(DashboardSummary::build(&state.inventory, &state.sales))
}

/// Revenue, profit, top products and the low-stock list.
pub async fn sales_report(db: &Database) -> Result<SalesReport, ApiError> {
    let state = db.snapshot().await?;
    Ok(SalesReport::build(&state.inventory, &state.sales))
}
