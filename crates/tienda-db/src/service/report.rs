//! Sales reports: read the ledger, hand it to the analytics engine.

use chrono::NaiveDate;
use tracing::debug;

use super::error::{ServiceError, ServiceResult};
use crate::repository::sale::SaleRepository;
use tienda_core::analytics::SalesReport;
use tienda_core::{Clock, ValidationError};

#[derive(Debug, Clone)]
pub struct ReportService {
    sales: SaleRepository,
}

impl ReportService {
    pub fn new(sales: SaleRepository) -> Self {
        ReportService { sales }
    }

    /// Builds the full report for `[from, to]`.
    ///
    /// The whole ledger is loaded so today / this-month totals are correct
    /// even when the range doesn't cover them.
    pub async fn sales_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        top_limit: i64,
        clock: &impl Clock,
    ) -> ServiceResult<SalesReport> {
        if from > to {
            return Err(ServiceError::Validation(ValidationError::InvalidFormat {
                field: "from".to_string(),
                reason: format!("{from} is after {to}"),
            }));
        }

        let details = self.sales.list_details().await?;
        debug!(sales = details.len(), %from, %to, "Building sales report");

        Ok(SalesReport::build(&details, from, to, top_limit, clock))
    }
}
