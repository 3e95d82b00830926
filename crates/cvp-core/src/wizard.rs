//! Import wizard as an explicit finite state machine.
//!
//! The legacy UI drove the import flow through component state; here the
//! sequencing lives in a transition table independent of any presentation
//! layer.

use cvp_ingest::RawTable;
use cvp_map::ColumnMapping;
use cvp_model::DepartmentId;

use crate::error::{CoreError, Result};
use crate::import::ImportSummary;

/// Steps of the import flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardStep {
    Upload,
    Mapping,
    DepartmentSelect,
    Processing,
    Summary,
}

impl WizardStep {
    fn name(&self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Mapping => "mapping",
            Self::DepartmentSelect => "department_select",
            Self::Processing => "processing",
            Self::Summary => "summary",
        }
    }

    /// The transition table: forward moves plus backtracking to any
    /// earlier pre-processing step.
    fn can_move_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Upload, Self::Mapping)
                | (Self::Mapping, Self::DepartmentSelect)
                | (Self::Mapping, Self::Upload)
                | (Self::DepartmentSelect, Self::Processing)
                | (Self::DepartmentSelect, Self::Mapping)
                | (Self::Processing, Self::Summary)
        )
    }
}

/// State of one import flow.
#[derive(Debug)]
pub struct ImportWizard {
    step: WizardStep,
    table: Option<RawTable>,
    mapping: ColumnMapping,
    department_id: Option<DepartmentId>,
    summary: Option<ImportSummary>,
}

impl ImportWizard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            step: WizardStep::Upload,
            table: None,
            mapping: ColumnMapping::new(),
            department_id: None,
            summary: None,
        }
    }

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn table(&self) -> Option<&RawTable> {
        self.table.as_ref()
    }

    #[must_use]
    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    #[must_use]
    pub fn department_id(&self) -> Option<DepartmentId> {
        self.department_id
    }

    #[must_use]
    pub fn summary(&self) -> Option<ImportSummary> {
        self.summary
    }

    /// Accepts an ingested table and moves to the mapping step.
    pub fn upload(&mut self, table: RawTable) -> Result<()> {
        self.transition(WizardStep::Mapping)?;
        self.table = Some(table);
        Ok(())
    }

    /// Re-selects the header row of the uploaded table while mapping.
    pub fn select_header_row(&mut self, index: usize) -> Result<()> {
        self.expect_step(WizardStep::Mapping)?;
        let table = self.table.as_mut().ok_or(CoreError::NotFound {
            entity: "wizard table",
            id: String::new(),
        })?;
        table.select_header_row(index).map_err(CoreError::from)
    }

    /// Confirms the column mapping and moves to department selection.
    ///
    /// The mapping must cover the required fields (cnpj, razao_social,
    /// value_total).
    pub fn confirm_mapping(&mut self, mapping: ColumnMapping) -> Result<()> {
        self.expect_step(WizardStep::Mapping)?;
        if !mapping.covers_required() {
            return Err(CoreError::Validation { field: "mapping" });
        }
        self.transition(WizardStep::DepartmentSelect)?;
        self.mapping = mapping;
        Ok(())
    }

    /// Chooses the target department and moves to processing.
    pub fn choose_department(&mut self, department_id: DepartmentId) -> Result<()> {
        self.transition(WizardStep::Processing)?;
        self.department_id = Some(department_id);
        Ok(())
    }

    /// Records the processed batch summary and finishes the flow.
    pub fn record_summary(&mut self, summary: ImportSummary) -> Result<()> {
        self.transition(WizardStep::Summary)?;
        self.summary = Some(summary);
        Ok(())
    }

    /// Steps back to an earlier pre-processing step.
    pub fn back_to(&mut self, step: WizardStep) -> Result<()> {
        self.transition(step)
    }

    fn transition(&mut self, next: WizardStep) -> Result<()> {
        if !self.step.can_move_to(next) {
            return Err(CoreError::InvalidStateTransition {
                entity: "import wizard",
                id: String::new(),
                from: self.step.name().to_string(),
                attempted: next.name().to_string(),
            });
        }
        self.step = next;
        Ok(())
    }

    fn expect_step(&self, step: WizardStep) -> Result<()> {
        if self.step != step {
            return Err(CoreError::InvalidStateTransition {
                entity: "import wizard",
                id: String::new(),
                from: self.step.name().to_string(),
                attempted: step.name().to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ImportWizard {
    fn default() -> Self {
        Self::new()
    }
}
