use super::*;
use std::str::FromStr;
use uuid::Uuid;

#[test]
fn test_new_ids_are_unique() {
    assert_ne!(TenantId::new(), TenantId::new());
}

#[test]
fn test_from_uuid_roundtrip() {
    let uuid = Uuid::new_v4();
    let id = AccountId::from_uuid(uuid);
    assert_eq!(id.into_inner(), uuid);
    assert_eq!(Uuid::from(id), uuid);
}

#[test]
fn test_display_matches_uuid() {
    let uuid = Uuid::new_v4();
    assert_eq!(JournalEntryId::from_uuid(uuid).to_string(), uuid.to_string());
}

#[test]
fn test_from_str() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_str(&uuid.to_string()).unwrap();
    assert_eq!(id.into_inner(), uuid);
}

#[test]
fn test_from_str_error() {
    assert!(JournalLineId::from_str("invalid").is_err());
}

#[test]
fn test_serializes_transparently() {
    let uuid = Uuid::new_v4();
    let json = serde_json::to_string(&TenantId::from_uuid(uuid)).unwrap();
    assert_eq!(json, format!("\"{uuid}\""));
}
