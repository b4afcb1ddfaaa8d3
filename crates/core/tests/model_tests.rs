// ═══════════════════════════════════════════════════════════════════
// Model Tests: Money, FurnitureCategory, wire shapes, form validation
// ═══════════════════════════════════════════════════════════════════

use std::str::FromStr;

use serde_json::json;

use rental_furnish_core::errors::CoreError;
use rental_furnish_core::models::category::FurnitureCategory;
use rental_furnish_core::models::checkout::{PaymentReceipt, PaymentRequest};
use rental_furnish_core::models::furniture::Furniture;
use rental_furnish_core::models::money::Money;
use rental_furnish_core::models::preferences::{ApartmentSize, ProfilePreferences};
use rental_furnish_core::models::recommendation::{PhotoDataUri, RecommendationRequest};
use rental_furnish_core::models::transaction::Transaction;
use rental_furnish_core::models::user::{Credentials, Session};

// ═══════════════════════════════════════════════════════════════════
// Money
// ═══════════════════════════════════════════════════════════════════

mod money {
    use super::*;

    #[test]
    fn test_decodes_floats_to_cents() {
        let m: Money = serde_json::from_value(json!(19.99)).unwrap();
        assert_eq!(m.cents(), 1999);
        let m: Money = serde_json::from_value(json!(250)).unwrap();
        assert_eq!(m, Money::from_units(250));
        // 0.1 + 0.2 rounds to 30 cents, not 30.000000000000004
        let drifted = 0.1_f64 + 0.2_f64;
        let m: Money = serde_json::from_value(json!(drifted)).unwrap();
        assert_eq!(m.cents(), 30);
    }

    #[test]
    fn test_rejects_negative() {
        assert!(serde_json::from_value::<Money>(json!(-1.0)).is_err());
        assert!(Money::try_from(f64::NAN).is_err());
    }

    #[test]
    fn test_rejects_amounts_above_max() {
        let top: Money = serde_json::from_value(json!(Money::MAX.as_f64())).unwrap();
        assert_eq!(top, Money::MAX);
        for amount in [6e16, 1e15, Money::MAX.as_f64() + 1.0] {
            let err = serde_json::from_value::<Money>(json!(amount)).unwrap_err();
            assert!(err.to_string().contains("exceeds the maximum"), "{amount}: {err}");
        }
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::ZERO.to_string(), "$0.00");
        assert_eq!(Money::from_cents(5).to_string(), "$0.05");
        assert_eq!(Money::from_cents(123_456).to_string(), "$1,234.56");
        assert_eq!(Money::from_units(1_000_000).to_string(), "$1,000,000.00");
    }

    #[test]
    fn test_display_negative_sign_leads() {
        assert_eq!(Money::from_cents(-5).to_string(), "-$0.05");
        assert_eq!(Money::from_cents(-123_456).to_string(), "-$1,234.56");
        assert_eq!(
            Money::from_cents(i64::MIN).to_string(),
            "-$92,233,720,368,547,758.08"
        );
    }

    #[test]
    fn test_arithmetic() {
        let unit = Money::from_cents(1_250);
        assert_eq!(unit * 3, Money::from_cents(3_750));
        assert_eq!(unit + unit, Money::from_units(25));
        let total: Money = [unit, unit, Money::from_cents(1)].iter().sum();
        assert_eq!(total.cents(), 2_501);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let ceiling = Money::from_cents(i64::MAX);
        assert_eq!(Money::MAX * u32::MAX, ceiling);
        assert_eq!(ceiling + Money::from_cents(1), ceiling);
        let mut acc = ceiling;
        acc += Money::MAX;
        assert_eq!(acc, ceiling);
        assert_eq!(Money::from_units(i64::MAX), ceiling);
    }

    #[test]
    fn test_serializes_as_number() {
        assert_eq!(serde_json::to_value(Money::from_cents(1999)).unwrap(), json!(19.99));
    }
}

// ═══════════════════════════════════════════════════════════════════
// FurnitureCategory
// ═══════════════════════════════════════════════════════════════════

mod category {
    use super::*;

    #[test]
    fn test_known_values_round_trip_through_wire() {
        for c in FurnitureCategory::KNOWN {
            let value = serde_json::to_value(&c).unwrap();
            let back: FurnitureCategory = serde_json::from_value(value).unwrap();
            assert_eq!(back, c);
            assert!(back.is_known());
        }
    }

    #[test]
    fn test_unknown_is_kept_verbatim() {
        let c: FurnitureCategory = serde_json::from_value(json!("kids_room")).unwrap();
        assert_eq!(c, FurnitureCategory::Unknown("kids_room".into()));
        assert_eq!(c.label(), "Kids Room");
        assert_eq!(serde_json::to_value(&c).unwrap(), json!("kids_room"));
    }

    #[test]
    fn test_user_filter_parsing() {
        assert_eq!(
            FurnitureCategory::from_str("Living Room").unwrap(),
            FurnitureCategory::LivingRoom
        );
        assert_eq!(
            FurnitureCategory::from_str("dining_room").unwrap(),
            FurnitureCategory::DiningRoom
        );
        let err = FurnitureCategory::from_str("garage").unwrap_err();
        assert!(err.contains("living-room"));
    }

    #[test]
    fn test_labels() {
        assert_eq!(FurnitureCategory::LivingRoom.label(), "Living Room");
        assert_eq!(FurnitureCategory::Office.to_string(), "office");
    }
}

// ═══════════════════════════════════════════════════════════════════
// Wire shapes
// ═══════════════════════════════════════════════════════════════════

mod wire {
    use super::*;

    #[test]
    fn test_furniture_from_catalog_json() {
        let f: Furniture = serde_json::from_value(json!({
            "_id": "65f1",
            "name": "Oak Desk",
            "description": "Solid oak",
            "category": "office",
            "price": 49.5,
            "quantity": 3,
            "imageUrl": "https://img.example/desk.png"
        }))
        .unwrap();
        assert_eq!(f.id, "65f1");
        assert_eq!(f.price, Money::from_cents(4_950));
        assert_eq!(f.category, FurnitureCategory::Office);
        assert!(f.in_stock());
    }

    #[test]
    fn test_furniture_optional_fields() {
        let f: Furniture = serde_json::from_value(json!({
            "_id": "1",
            "name": "Stool",
            "category": "decor",
            "price": 10
        }))
        .unwrap();
        assert_eq!(f.description, "");
        assert_eq!(f.quantity, 0);
        assert!(!f.in_stock());
        assert!(f.image_url.is_none());
    }

    #[test]
    fn test_transaction_from_history_json() {
        let t: Transaction = serde_json::from_value(json!({
            "_id": "tx1",
            "email": "a@b.co",
            "amount": 120.0,
            "paymentMethod": "credit_card",
            "createdAt": "2024-03-15T10:30:00.000Z",
            "items": [
                {
                    "furnitureId": { "_id": "f1", "name": "Sofa", "category": "living-room" },
                    "quantity": 2,
                    "priceAtTime": 60
                }
            ]
        }))
        .unwrap();
        assert_eq!(t.item_count(), 2);
        assert_eq!(t.items[0].furniture.category, FurnitureCategory::LivingRoom);
        assert!(t.reconciles());
        assert_eq!(t.item_names(), "Sofa");
    }

    #[test]
    fn test_payment_request_shape() {
        let req = PaymentRequest::single("a@b.co", "f1", 2);
        assert_eq!(
            serde_json::to_value(&req).unwrap(),
            json!({
                "email": "a@b.co",
                "items": [{ "furnitureId": "f1", "quantity": 2 }],
                "paymentMethod": "credit_card"
            })
        );
    }

    #[test]
    fn test_preferences_shape_is_snake_case() {
        let prefs = ProfilePreferences::new("Mid-century, walnut", 300.0, ApartmentSize::Medium);
        assert_eq!(
            serde_json::to_value(&prefs).unwrap(),
            json!({
                "preferences": "Mid-century, walnut",
                "monthly_budget": 300.0,
                "apartment_size": "medium"
            })
        );
    }

    #[test]
    fn test_receipt_message() {
        let r = PaymentReceipt(json!({ "message": "Payment successful" }));
        assert_eq!(r.message(), Some("Payment successful"));
        assert_eq!(PaymentReceipt(serde_json::Value::Null).message(), None);
    }
}

// ═══════════════════════════════════════════════════════════════════
// Validation
// ═══════════════════════════════════════════════════════════════════

mod validation {
    use super::*;

    fn message(err: CoreError) -> String {
        match err {
            CoreError::Validation(msg) => msg,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_credentials() {
        assert!(Credentials::new(" a@b.co ", "secret").validate().is_ok());
        let msg = message(Credentials::new("not-an-email", "").validate().unwrap_err());
        assert!(msg.contains("email"));
        assert!(msg.contains("password"));
    }

    #[test]
    fn test_preferences_length_bounds() {
        let short = ProfilePreferences::new("too short", 100.0, ApartmentSize::Small);
        assert!(message(short.validate().unwrap_err()).contains("at least 10 characters"));

        let exact = ProfilePreferences::new("ten chars!", 100.0, ApartmentSize::Small);
        assert!(exact.validate().is_ok());

        let long = ProfilePreferences::new("x".repeat(501), 100.0, ApartmentSize::Large);
        assert!(message(long.validate().unwrap_err()).contains("500"));
    }

    #[test]
    fn test_budget_must_be_positive() {
        let prefs = ProfilePreferences::new("Cozy and warm colors", 0.0, ApartmentSize::Small);
        assert!(message(prefs.validate().unwrap_err()).contains("monthly_budget"));
    }

    #[test]
    fn test_recommendation_request() {
        let bad = RecommendationRequest {
            rental_preferences: "short".into(),
            budget: -5.0,
            apartment_size: ApartmentSize::Small,
            photo_data_uri: None,
        };
        let msg = message(bad.validate().unwrap_err());
        assert!(msg.contains("rentalPreferences"));
        assert!(msg.contains("budget"));
    }

    #[test]
    fn test_payment_request() {
        assert!(PaymentRequest::single("a@b.co", "f1", 1).validate().is_ok());
        assert!(PaymentRequest::single("a@b.co", "f1", 0).validate().is_err());
        assert!(PaymentRequest::single("a@b.co", "", 1).validate().is_err());
    }

    #[test]
    fn test_apartment_size_parsing() {
        assert_eq!(ApartmentSize::from_str("Large").unwrap(), ApartmentSize::Large);
        assert!(ApartmentSize::from_str("huge").is_err());
    }
}

// ═══════════════════════════════════════════════════════════════════
// Photo data URI & secrets in Debug
// ═══════════════════════════════════════════════════════════════════

mod misc {
    use super::*;

    #[test]
    fn test_photo_data_uri() {
        let uri: PhotoDataUri = "data:image/jpeg;base64,/9j/4AAQ".parse().unwrap();
        assert_eq!(uri.mime_type(), "image/jpeg");
        assert_eq!(uri.data(), "/9j/4AAQ");
        assert_eq!(uri.to_string(), "data:image/jpeg;base64,/9j/4AAQ");

        for bad in [
            "image/jpeg;base64,abc",
            "data:text/plain;base64,abc",
            "data:image/png,abc",
            "data:image/png;base64,",
            "data:image/png;base64,ab c",
            "data:image/png;base64,=",
            "data:image/png;base64,ab=c-+_/",
            "data:image/png;base64,A",
            "data:image/png;base64,iVBORw",
        ] {
            assert!(
                matches!(bad.parse::<PhotoDataUri>(), Err(CoreError::InvalidDataUri(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn test_secrets_are_not_printed() {
        let creds = Credentials::new("a@b.co", "hunter2");
        assert!(!format!("{creds:?}").contains("hunter2"));

        let session = Session::new("a@b.co", "tok-abc");
        assert!(!format!("{session:?}").contains("tok-abc"));
        assert!(!format!("{:?}", session.context()).contains("tok-abc"));
        assert_eq!(session.context().bearer_token(), Some("tok-abc"));
    }
}
