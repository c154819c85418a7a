//! Domain Record Scenarios
//!
//! Full schemas for the three record kinds the engine was built for:
//! - station: field constraints only
//! - contact: field constraints plus conditional cross-field rules
//! - mission: nested crew list with aggregate and uniform invariants

use serde_json::{json, Value};
use strictrec::schema::{FieldSpec, FieldType, RecordSchema};
use strictrec::validate::rules::{
    AggregateThreshold, Conditional, IdPrefix, Threshold, UniformProperty,
};
use strictrec::validate::ViolationKind;

// =============================================================================
// Schemas
// =============================================================================

fn station_schema() -> RecordSchema {
    RecordSchema::new(
        "station",
        vec![
            FieldSpec::required("station_id", FieldType::string(3, 10)),
            FieldSpec::required("name", FieldType::string(1, 50)),
            FieldSpec::required("crew_size", FieldType::int(1, 20)),
            FieldSpec::required("power_level", FieldType::float(0.0, 100.0)),
            FieldSpec::required("oxygen_level", FieldType::float(0.0, 100.0)),
            FieldSpec::required("last_maintenance", FieldType::Timestamp),
            FieldSpec::required("is_operational", FieldType::Bool),
            FieldSpec::optional("notes", FieldType::string_max(200)),
        ],
    )
}

fn contact_schema() -> RecordSchema {
    RecordSchema::new(
        "contact",
        vec![
            FieldSpec::required("contact_id", FieldType::string(5, 15)),
            FieldSpec::required("timestamp", FieldType::Timestamp),
            FieldSpec::required("location", FieldType::string(3, 100)),
            FieldSpec::required(
                "contact_type",
                FieldType::enumeration(&["radio", "visual", "physical", "telepathic"]),
            ),
            FieldSpec::required("signal_strength", FieldType::float(0.0, 10.0)),
            FieldSpec::required("duration_minutes", FieldType::int(1, 1440)),
            FieldSpec::required("witness_count", FieldType::int(1, 100)),
            FieldSpec::optional("message_received", FieldType::string_max(500)),
            FieldSpec::required("is_verified", FieldType::Bool),
        ],
    )
    .with_invariant(IdPrefix::new("contact_id_prefix", "contact_id", "AC"))
    .with_invariant(Conditional::new(
        "physical_contact_verified",
        |r| r.enum_field("contact_type") == Some("physical"),
        |r| r.bool_field("is_verified") == Some(true),
        "physical contact reports must be verified",
    ))
    .with_invariant(Conditional::new(
        "telepathic_witnesses",
        |r| r.enum_field("contact_type") == Some("telepathic"),
        |r| r.int_field("witness_count").is_some_and(|w| w >= 3),
        "telepathic contact requires at least 3 witnesses",
    ))
    .with_invariant(Conditional::new(
        "strong_signal_has_message",
        |r| r.float_field("signal_strength").is_some_and(|s| s > 7.0),
        |r| r.str_field("message_received").is_some_and(|m| !m.is_empty()),
        "strong signals (> 7.0) should include received messages",
    ))
}

fn crew_member_schema() -> RecordSchema {
    RecordSchema::new(
        "crew_member",
        vec![
            FieldSpec::required("member_id", FieldType::string(3, 10)),
            FieldSpec::required("name", FieldType::string(2, 50)),
            FieldSpec::required(
                "rank",
                FieldType::enumeration(&["cadet", "officer", "lieutenant", "captain", "commander"]),
            ),
            FieldSpec::required("age", FieldType::int(18, 80)),
            FieldSpec::required("specialization", FieldType::string(3, 30)),
            FieldSpec::required("years_experience", FieldType::int(0, 50)),
            FieldSpec::required("is_active", FieldType::Bool),
        ],
    )
}

fn mission_schema() -> RecordSchema {
    RecordSchema::new(
        "mission",
        vec![
            FieldSpec::required("mission_id", FieldType::string(5, 15)),
            FieldSpec::required("mission_name", FieldType::string(3, 100)),
            FieldSpec::required("destination", FieldType::string(3, 50)),
            FieldSpec::required("launch_date", FieldType::Timestamp),
            FieldSpec::required("duration_days", FieldType::int(1, 3650)),
            FieldSpec::required("crew", FieldType::list(crew_member_schema(), 1, 12)),
            FieldSpec::required(
                "mission_status",
                FieldType::enumeration(&["planned", "active", "completed", "aborted"]),
            ),
            FieldSpec::required("budget_millions", FieldType::float(1.0, 10000.0)),
        ],
    )
    .with_invariant(IdPrefix::new("mission_id_prefix", "mission_id", "M"))
    .with_invariant(UniformProperty::new(
        "all_crew_active",
        "crew",
        |m| m.bool_field("is_active") == Some(true),
        "all crew members must be active",
    ))
    .with_invariant(AggregateThreshold::new(
        "has_senior_officer",
        "crew",
        |m| matches!(m.enum_field("rank"), Some("captain" | "commander")),
        Threshold::Count(1),
        "must have at least one commander or captain",
    ))
    .with_invariant(AggregateThreshold::new(
        "experienced_crew_ratio",
        "crew",
        |m| m.int_field("years_experience").is_some_and(|y| y >= 5),
        Threshold::Ratio(0.5),
        "at least half the crew needs 5+ years of experience",
    ))
}

// =============================================================================
// Fixtures
// =============================================================================

fn valid_station() -> Value {
    json!({
        "station_id": "ISS001",
        "name": "International Space Station",
        "crew_size": 6,
        "power_level": 85.5,
        "oxygen_level": 92.3,
        "last_maintenance": "2024-03-01T12:00:00Z",
        "is_operational": true
    })
}

fn valid_contact() -> Value {
    json!({
        "contact_id": "AC_2024_001",
        "timestamp": "2024-06-14T03:12:00Z",
        "location": "Area 51, Nevada",
        "contact_type": "radio",
        "signal_strength": 8.5,
        "duration_minutes": 45,
        "witness_count": 5,
        "message_received": "Greetings from Zeta Reticuli",
        "is_verified": true
    })
}

fn crew_member(id: &str, name: &str, rank: &str, years: i64, active: bool) -> Value {
    json!({
        "member_id": id,
        "name": name,
        "rank": rank,
        "age": 40,
        "specialization": "Navigation",
        "years_experience": years,
        "is_active": active
    })
}

fn mission_with_crew(crew: Vec<Value>) -> Value {
    json!({
        "mission_id": "M2024_MARS",
        "mission_name": "Mars Colony Establishment",
        "destination": "Mars",
        "launch_date": "2024-09-01T00:00:00Z",
        "duration_days": 900,
        "crew": crew,
        "mission_status": "planned",
        "budget_millions": 2500.0
    })
}

// =============================================================================
// Scenario A: station field constraints
// =============================================================================

/// A well-formed station is accepted with its fields echoed unchanged.
#[test]
fn test_station_accepted() {
    let record = station_schema().validate(&valid_station()).unwrap();
    assert_eq!(record.str_field("station_id"), Some("ISS001"));
    assert_eq!(record.int_field("crew_size"), Some(6));
    assert_eq!(record.float_field("power_level"), Some(85.5));
    assert_eq!(record.float_field("oxygen_level"), Some(92.3));
    assert_eq!(record.bool_field("is_operational"), Some(true));
    assert!(record.timestamp_field("last_maintenance").is_some());
    assert!(!record.contains("notes"));
}

/// Crew size 100 exceeds the declared max of 20.
#[test]
fn test_station_crew_size_out_of_range() {
    let mut candidate = valid_station();
    candidate["crew_size"] = json!(100);

    let err = station_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.first().kind, ViolationKind::OutOfRange);
    assert_eq!(err.first().field, "crew_size");
}

// =============================================================================
// Scenario B: contact invariants
// =============================================================================

#[test]
fn test_contact_accepted() {
    assert!(contact_schema().validate(&valid_contact()).is_ok());
}

/// Identifier prefix breach is an invariant violation even though every
/// field constraint passes.
#[test]
fn test_contact_bad_prefix() {
    let mut candidate = valid_contact();
    candidate["contact_id"] = json!("XC_2024_001");

    let err = contact_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.first().kind, ViolationKind::InvariantViolation);
    assert_eq!(err.first().rule, "contact_id_prefix");
}

#[test]
fn test_contact_unverified_physical() {
    let mut candidate = valid_contact();
    candidate["contact_type"] = json!("physical");
    candidate["is_verified"] = json!(false);

    let err = contact_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.first().rule, "physical_contact_verified");
}

#[test]
fn test_contact_telepathic_needs_witnesses() {
    let mut candidate = valid_contact();
    candidate["contact_type"] = json!("telepathic");
    candidate["witness_count"] = json!(2);
    candidate["signal_strength"] = json!(2.0);

    let err = contact_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.first().rule, "telepathic_witnesses");
}

#[test]
fn test_contact_strong_signal_without_message() {
    let mut candidate = valid_contact();
    candidate["message_received"] = json!(null);

    let err = contact_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.first().rule, "strong_signal_has_message");
}

/// Unknown contact modality is caught at the field stage, never by rules.
#[test]
fn test_contact_unknown_modality() {
    let mut candidate = valid_contact();
    candidate["contact_type"] = json!("smoke_signal");

    let err = contact_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.first().kind, ViolationKind::InvalidEnumValue);
}

// =============================================================================
// Scenario C: mission crew invariants and their ordering
// =============================================================================

#[test]
fn test_mission_accepted() {
    let candidate = mission_with_crew(vec![
        crew_member("MBR_00", "Sarah Connor", "commander", 20, true),
        crew_member("MBR_01", "John Smith", "lieutenant", 4, true),
        crew_member("MBR_02", "Alice Johnson", "officer", 8, true),
    ]);
    let record = mission_schema().validate(&candidate).unwrap();
    assert_eq!(record.list_field("crew").unwrap().len(), 3);
}

/// Zero commander/captain crew breaches the senior-rank rule.
#[test]
fn test_mission_no_senior_officer() {
    let candidate = mission_with_crew(vec![
        crew_member("MBR_00", "Sarah Connor", "cadet", 20, true),
        crew_member("MBR_01", "John Smith", "cadet", 4, true),
        crew_member("MBR_02", "Alice Johnson", "cadet", 8, true),
    ]);
    let err = mission_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.first().rule, "has_senior_officer");
}

/// With a commander present but too few experienced members, the
/// experience-ratio rule rejects instead: invariant ordering is observable.
#[test]
fn test_mission_invariant_ordering() {
    let candidate = mission_with_crew(vec![
        crew_member("MBR_00", "Sarah Connor", "commander", 20, true),
        crew_member("MBR_01", "John Smith", "cadet", 1, true),
        crew_member("MBR_02", "Alice Johnson", "cadet", 2, true),
    ]);
    let err = mission_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.first().rule, "experienced_crew_ratio");
}

/// The uniform-property rule reports the first inactive member by path.
#[test]
fn test_mission_inactive_member_reported_by_path() {
    let candidate = mission_with_crew(vec![
        crew_member("MBR_00", "Sarah Connor", "commander", 20, true),
        crew_member("MBR_01", "John Smith", "lieutenant", 6, false),
        crew_member("MBR_02", "Alice Johnson", "officer", 8, false),
    ]);
    let err = mission_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.first().rule, "all_crew_active");
    assert_eq!(err.first().field, "crew[1]");
}

/// A defective nested crew member is reported with its indexed path, and
/// the mission's own invariants never run.
#[test]
fn test_mission_nested_field_error() {
    let mut bad_member = crew_member("MBR_01", "John Smith", "cadet", 4, true);
    bad_member["age"] = json!(400);

    let candidate = mission_with_crew(vec![
        crew_member("MBR_00", "Sarah Connor", "cadet", 20, true),
        bad_member,
    ]);
    // Crew has no commander, which would breach has_senior_officer if the
    // invariant phase ran; the nested field error must win instead.
    let err = mission_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.len(), 1);
    assert_eq!(err.first().field, "crew[1].age");
    assert_eq!(err.first().kind, ViolationKind::OutOfRange);
}

/// Nested crew members run their own full pipeline: multiple defective
/// elements all report, across elements.
#[test]
fn test_mission_multiple_nested_errors_accumulate() {
    let mut first = crew_member("MBR_00", "Sarah Connor", "commander", 20, true);
    first["age"] = json!(10);
    let mut second = crew_member("MBR_01", "John Smith", "officer", 6, true);
    second["name"] = json!("J");

    let candidate = mission_with_crew(vec![first, second]);
    let err = mission_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.len(), 2);
    assert_eq!(err.violations()[0].field, "crew[0].age");
    assert_eq!(err.violations()[1].field, "crew[1].name");
}

/// An empty crew list violates the declared list size bounds at the field
/// stage, before any aggregate rule could divide by its length.
#[test]
fn test_mission_empty_crew() {
    let candidate = mission_with_crew(vec![]);
    let err = mission_schema().validate(&candidate).unwrap_err();
    assert_eq!(err.first().kind, ViolationKind::LengthViolation);
    assert_eq!(err.first().field, "crew");
}
