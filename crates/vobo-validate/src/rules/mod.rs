mod contract;
mod mapping;
mod sql;
mod status;

pub use contract::{ContractDefinitionRule, DuplicateAttributeRule};
pub use mapping::{ArraySyntaxRule, HeadersRule, TypeFamilyRule};
pub use sql::SqlConsistencyRule;
pub use status::StatusCodeRule;
