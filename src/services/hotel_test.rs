use super::*;
use crate::error::ErrorCode;
#[cfg(feature = "live-db-tests")]
use crate::db::live;

fn complete_input() -> HotelInput {
    HotelInput {
        name: "  Casa Azul ".into(),
        description: "Seaside rooms".into(),
        email: "Front@CasaAzul.test".into(),
        phone: "+34 600 000 000".into(),
        address: "Calle Mar 1".into(),
        city: "Valencia".into(),
        country: "Spain".into(),
        postal_code: "46001".into(),
        latitude: 39.47,
        longitude: -0.37,
        ..HotelInput::default()
    }
}

// =============================================================================
// HotelInput::normalize
// =============================================================================

#[test]
fn normalize_trims_and_lowercases_email() {
    let input = complete_input().normalize(Strictness::Profile).unwrap();
    assert_eq!(input.name, "Casa Azul");
    assert_eq!(input.email, "front@casaazul.test");
}

#[test]
fn normalize_drops_blank_amenities_and_incomplete_services() {
    let input = HotelInput {
        amenities: vec!["WiFi".into(), "  ".into(), " Pool ".into()],
        features: vec![String::new()],
        services: vec![
            HotelService { name: "Spa".into(), description: "Full service".into() },
            HotelService { name: "Shuttle".into(), description: " ".into() },
            HotelService { name: String::new(), description: "Orphan".into() },
        ],
        ..complete_input()
    }
    .normalize(Strictness::Profile)
    .unwrap();

    assert_eq!(input.amenities, vec!["WiFi".to_owned(), "Pool".to_owned()]);
    assert!(input.features.is_empty());
    assert_eq!(input.services.len(), 1);
    assert_eq!(input.services[0].name, "Spa");
}

#[test]
fn normalize_requires_name_even_when_onboarding() {
    let err = HotelInput::default().normalize(Strictness::Onboarding).unwrap_err();
    assert_eq!(err.to_string(), "name is required");
}

#[test]
fn onboarding_accepts_name_only() {
    let input = HotelInput { name: "Casa".into(), ..HotelInput::default() };
    assert!(input.normalize(Strictness::Onboarding).is_ok());
}

#[test]
fn profile_reports_first_missing_field() {
    let input = HotelInput { city: "  ".into(), ..complete_input() };
    let err = input.normalize(Strictness::Profile).unwrap_err();
    assert_eq!(err.to_string(), "city is required");
}

#[test]
fn normalize_rejects_bad_email_and_coordinates() {
    let bad_email = HotelInput { email: "nope".into(), ..complete_input() };
    assert!(matches!(bad_email.normalize(Strictness::Profile), Err(HotelError::Validation(_))));

    let bad_lat = HotelInput { latitude: 91.0, ..complete_input() };
    assert!(matches!(bad_lat.normalize(Strictness::Profile), Err(HotelError::Validation(_))));
}

#[test]
fn normalize_checks_clock_times() {
    let ok = HotelInput { check_in_time: Some("14:30".into()), ..complete_input() };
    assert_eq!(ok.normalize(Strictness::Profile).unwrap().check_in_time.as_deref(), Some("14:30"));

    let bad = HotelInput { check_out_time: Some("25:00".into()), ..complete_input() };
    assert!(bad.normalize(Strictness::Profile).is_err());
}

#[test]
fn blank_clock_time_is_left_unchanged() {
    let input = HotelInput { check_in_time: Some(" ".into()), ..complete_input() };
    assert_eq!(input.normalize(Strictness::Profile).unwrap().check_in_time, None);
}

// =============================================================================
// HotelError
// =============================================================================

#[test]
fn hotel_error_statuses() {
    assert_eq!(HotelError::NoHotel.status(), StatusCode::NOT_FOUND);
    assert_eq!(HotelError::NoHotel.to_string(), "no hotel associated with this user");
    assert_eq!(HotelError::AlreadyExists.status(), StatusCode::CONFLICT);
    assert_eq!(HotelError::Validation("x".into()).status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(HotelError::NotFound(Uuid::nil()).error_code(), "E_HOTEL_NOT_FOUND");
}

// =============================================================================
// live database
// =============================================================================

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn create_then_update_hotel() {
    let pool = live::integration_pool().await;
    let user_id = live::seed_profile(&pool, "Owner").await;

    let created = create_hotel(&pool, user_id, HotelInput { name: "Casa".into(), ..HotelInput::default() })
        .await
        .expect("create_hotel should succeed");
    assert_eq!(created.check_in_time, "15:00");
    assert!(!created.public_profile);

    let again = create_hotel(&pool, user_id, HotelInput { name: "Other".into(), ..HotelInput::default() }).await;
    assert!(matches!(again, Err(HotelError::AlreadyExists)));

    let updated = update_hotel(&pool, created.id, complete_input())
        .await
        .expect("update_hotel should succeed");
    assert_eq!(updated.name, "Casa Azul");
    assert_eq!(updated.city, "Valencia");

    let (owned_id, _) = owned_hotel(&pool, user_id).await.expect("owner resolves");
    assert_eq!(owned_id, created.id);

    let hidden = get_public_hotel(&pool, created.id).await;
    assert!(matches!(hidden, Err(HotelError::NotFound(_))));
}

#[cfg(feature = "live-db-tests")]
#[tokio::test]
#[ignore = "requires TEST_DATABASE_URL/live Postgres"]
async fn set_media_keeps_unspecified_field() {
    let pool = live::integration_pool().await;
    let (_, hotel_id) = live::seed_hotel(&pool, "Media Hotel").await;

    set_media(&pool, hotel_id, Some("https://img.test/logo.png".into()), None).await.unwrap();
    let hotel = set_media(&pool, hotel_id, None, Some("https://img.test/cover.png".into())).await.unwrap();
    assert_eq!(hotel.logo_url.as_deref(), Some("https://img.test/logo.png"));
    assert_eq!(hotel.cover_url.as_deref(), Some("https://img.test/cover.png"));
}
