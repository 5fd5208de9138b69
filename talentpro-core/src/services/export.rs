//! Export service - roster CSV in the talent-profile import layout
//!
//! The header row uses the first accepted label of each profile field, so
//! an exported file can be fed straight back into `tp import talent-profile`.

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};

use crate::domain::{ImportKind, Talent};
use crate::import::{Field, ImportLayout};
use crate::ports::TalentStore;

/// Cell text for one profile field
fn talent_cell(talent: &Talent, field: Field) -> String {
    let text = match field {
        Field::Name => &talent.name,
        Field::Status => return talent.status.as_str().to_string(),
        Field::Gender => &talent.gender,
        Field::Email => &talent.email,
        Field::BirthDate => &talent.birth_date,
        Field::ContractDate => &talent.contract_date,
        Field::ContractEndDate => &talent.contract_end_date,
        Field::Rating => return talent.rating.to_string(),
        Field::EvaluationNote => &talent.evaluation_note,
        Field::TotalSales => return talent.sales.to_string(),
        Field::Height => &talent.height,
        Field::Weight => &talent.weight,
        Field::Bust => &talent.bust,
        Field::Waist => &talent.waist,
        Field::Hip => &talent.hip,
        Field::ShoeSize => &talent.shoe_size,
        Field::Specialty => &talent.specialty,
        Field::Hobby => &talent.hobby,
        Field::BankName => &talent.bank_name,
        Field::BranchName => &talent.branch_name,
        Field::AccountType => &talent.account_type,
        Field::AccountNumber => &talent.account_number,
        Field::AccountHolder => &talent.account_holder,
        Field::RowLabel | Field::Age | Field::Month(_) => return String::new(),
    };
    text.clone()
}

pub struct ExportService {
    store: Arc<dyn TalentStore>,
}

impl ExportService {
    pub fn new(store: Arc<dyn TalentStore>) -> Self {
        Self { store }
    }

    /// Write the roster as CSV, returning the number of talents written
    pub fn write_roster<W: Write>(&self, writer: W) -> Result<usize> {
        let talents = self.store.load_talents()?;
        let layout = ImportLayout::for_kind(ImportKind::TalentProfile);

        let mut csv = csv::Writer::from_writer(writer);
        csv.write_record(layout.fields.iter().map(|spec| spec.labels[0]))?;
        for talent in &talents {
            csv.write_record(layout.fields.iter().map(|spec| talent_cell(talent, spec.field)))?;
        }
        csv.flush()?;
        Ok(talents.len())
    }

    /// Write the roster CSV to a file
    pub fn export_roster(&self, path: &Path) -> Result<usize> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        self.write_roster(file)
    }
}
