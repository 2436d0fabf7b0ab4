//! TypeScript Generation Tests
//!
//! Validates that front-end facing types can be exported to TypeScript
//! when the tauri feature is enabled.

#[cfg(feature = "tauri")]
#[test]
fn test_core_types_implement_specta_type() {
    use specta::Type;

    // If this compiles, all types are properly configured for TypeScript export.
    fn assert_type<T: Type>() {}

    assert_type::<regatta_clock::SessionSnapshot>();
    assert_type::<regatta_clock::SessionCommand>();
    assert_type::<regatta_clock::CommandOutcome>();
    assert_type::<regatta_clock::RefereeSheet>();
    assert_type::<regatta_clock::RegattaData>();
    assert_type::<regatta_clock::UpdateRate>();
    assert_type::<regatta_clock::PlaceStatus>();
}

#[cfg(not(feature = "tauri"))]
#[test]
fn test_tauri_feature_disabled() {
    // Types still compile without specta::Type
    let _ = regatta_clock::UpdateRate::Native;
}
