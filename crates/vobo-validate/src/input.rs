use vobo_extract::{ContractFacts, MappingFacts};

/// What a rule sees: the contract sheet, plus one mapping sheet when the
/// rule runs per mapping sheet.
#[derive(Clone, Copy, Debug)]
pub struct ValidateInput<'a> {
    pub contract: Option<&'a ContractFacts>,
    pub mapping: Option<&'a MappingFacts>,
}

impl<'a> ValidateInput<'a> {
    pub fn contract(contract: &'a ContractFacts) -> Self {
        Self {
            contract: Some(contract),
            mapping: None,
        }
    }

    pub fn mapping(mapping: &'a MappingFacts, contract: Option<&'a ContractFacts>) -> Self {
        Self {
            contract,
            mapping: Some(mapping),
        }
    }

    /// The contract sheet when it is the sheet under validation.
    pub fn contract_sheet(&self) -> Option<&'a ContractFacts> {
        match self.mapping {
            Some(_) => None,
            None => self.contract,
        }
    }
}
