mod parser;

use std::io::Read;
use std::path::Path;

use crate::workflows::scoring::domain::{AttributeId, DealId, ScoreSubmission};
use crate::workflows::scoring::repository::{ApprovalPublisher, DealRepository};
use crate::workflows::scoring::service::{DealScoringError, DealScoringService};

#[derive(Debug)]
pub enum CrmScoreImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    Scoring(DealScoringError),
}

impl std::fmt::Display for CrmScoreImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CrmScoreImportError::Io(err) => write!(f, "failed to read CRM export: {}", err),
            CrmScoreImportError::Csv(err) => write!(f, "invalid CRM CSV data: {}", err),
            CrmScoreImportError::Scoring(err) => {
                write!(f, "could not apply CRM scores to the deal: {}", err)
            }
        }
    }
}

impl std::error::Error for CrmScoreImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CrmScoreImportError::Io(err) => Some(err),
            CrmScoreImportError::Csv(err) => Some(err),
            CrmScoreImportError::Scoring(err) => Some(err),
        }
    }
}

impl From<std::io::Error> for CrmScoreImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for CrmScoreImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Outcome of an import pass: how many rows were applied and which attribute keys
/// the catalog did not recognize.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSummary {
    pub applied: usize,
    pub skipped: Vec<String>,
}

/// Applies a CRM scorecard export (CSV) to one deal through the service facade.
pub struct CrmScoreImporter;

impl CrmScoreImporter {
    pub fn from_path<Pt, R, A>(
        path: Pt,
        service: &DealScoringService<R, A>,
        deal_id: &DealId,
    ) -> Result<ImportSummary, CrmScoreImportError>
    where
        Pt: AsRef<Path>,
        R: DealRepository + 'static,
        A: ApprovalPublisher + 'static,
    {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, service, deal_id)
    }

    pub fn from_reader<Rd, R, A>(
        reader: Rd,
        service: &DealScoringService<R, A>,
        deal_id: &DealId,
    ) -> Result<ImportSummary, CrmScoreImportError>
    where
        Rd: Read,
        R: DealRepository + 'static,
        A: ApprovalPublisher + 'static,
    {
        let mut applied = 0;
        let mut skipped = Vec::new();

        for row in parser::parse_rows(reader)? {
            let submission = ScoreSubmission {
                attribute_id: AttributeId(row.attribute_key),
                raw_value: row.raw_value,
                scored_by: row.scored_by,
            };

            match service.submit_score(deal_id, submission) {
                Ok(_) => applied += 1,
                Err(DealScoringError::UnknownAttribute(key)) => skipped.push(key),
                Err(other) => return Err(CrmScoreImportError::Scoring(other)),
            }
        }

        Ok(ImportSummary { applied, skipped })
    }
}
