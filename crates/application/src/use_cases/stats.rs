use crate::ports::ThreatTable;
use std::sync::Arc;
use warden_dns_domain::{DomainError, TableStats};

/// Threat-table statistics for the external management collaborator.
pub struct GetTableStatsUseCase {
    table: Arc<dyn ThreatTable>,
}

impl GetTableStatsUseCase {
    pub fn new(table: Arc<dyn ThreatTable>) -> Self {
        Self { table }
    }

    pub async fn execute(&self) -> Result<TableStats, DomainError> {
        self.table.stats().await
    }
}
