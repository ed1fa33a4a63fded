//! `SeaORM` active enums and their mapping to domain enums.
//!
//! Stored as short strings guarded by `CHECK` constraints, so tenant schemas
//! need no per-schema enum types.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use tally_core::accounts::AccountType as DomainAccountType;
use tally_core::journal::EntryStatus as DomainEntryStatus;
use tally_core::tenancy::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum EntryStatus {
    #[sea_orm(string_value = "draft")]
    Draft,
    #[sea_orm(string_value = "posted")]
    Posted,
    #[sea_orm(string_value = "void")]
    Void,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum MemberRole {
    #[sea_orm(string_value = "owner")]
    Owner,
    #[sea_orm(string_value = "admin")]
    Admin,
    #[sea_orm(string_value = "accountant")]
    Accountant,
    #[sea_orm(string_value = "viewer")]
    Viewer,
}

impl From<AccountType> for DomainAccountType {
    fn from(value: AccountType) -> Self {
        match value {
            AccountType::Asset => Self::Asset,
            AccountType::Liability => Self::Liability,
            AccountType::Equity => Self::Equity,
            AccountType::Revenue => Self::Revenue,
            AccountType::Expense => Self::Expense,
        }
    }
}

impl From<DomainAccountType> for AccountType {
    fn from(value: DomainAccountType) -> Self {
        match value {
            DomainAccountType::Asset => Self::Asset,
            DomainAccountType::Liability => Self::Liability,
            DomainAccountType::Equity => Self::Equity,
            DomainAccountType::Revenue => Self::Revenue,
            DomainAccountType::Expense => Self::Expense,
        }
    }
}

impl From<EntryStatus> for DomainEntryStatus {
    fn from(value: EntryStatus) -> Self {
        match value {
            EntryStatus::Draft => Self::Draft,
            EntryStatus::Posted => Self::Posted,
            EntryStatus::Void => Self::Void,
        }
    }
}

impl From<DomainEntryStatus> for EntryStatus {
    fn from(value: DomainEntryStatus) -> Self {
        match value {
            DomainEntryStatus::Draft => Self::Draft,
            DomainEntryStatus::Posted => Self::Posted,
            DomainEntryStatus::Void => Self::Void,
        }
    }
}

impl From<MemberRole> for Role {
    fn from(value: MemberRole) -> Self {
        match value {
            MemberRole::Owner => Self::Owner,
            MemberRole::Admin => Self::Admin,
            MemberRole::Accountant => Self::Accountant,
            MemberRole::Viewer => Self::Viewer,
        }
    }
}

impl From<Role> for MemberRole {
    fn from(value: Role) -> Self {
        match value {
            Role::Owner => Self::Owner,
            Role::Admin => Self::Admin,
            Role::Accountant => Self::Accountant,
            Role::Viewer => Self::Viewer,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveEnum;

    #[test]
    fn test_stored_values_match_domain_names() {
        for t in DomainAccountType::ALL {
            assert_eq!(AccountType::from(t).to_value(), t.as_str());
        }
        for s in [DomainEntryStatus::Draft, DomainEntryStatus::Posted, DomainEntryStatus::Void] {
            assert_eq!(EntryStatus::from(s).to_value(), s.as_str());
        }
        for r in [Role::Owner, Role::Admin, Role::Accountant, Role::Viewer] {
            assert_eq!(MemberRole::from(r).to_value(), r.as_str());
        }
    }
}
