//! End-to-end autofill behaviour over in-memory stores.

use std::sync::Arc;

use autofill_db::MemoryRecordStore;
use autofill_match::{
    AutofillConfig, AutofillService, Error, IdentityQuery, Provenance, RawVehicleFields,
};

struct Fixture {
    live: MemoryRecordStore,
    legacy: MemoryRecordStore,
}

impl Fixture {
    fn new() -> Self {
        Self {
            live: MemoryRecordStore::new(Provenance::Live),
            legacy: MemoryRecordStore::new(Provenance::Legacy),
        }
    }

    fn service(&self) -> AutofillService {
        self.service_with(AutofillConfig::default())
    }

    fn service_with(&self, config: AutofillConfig) -> AutofillService {
        AutofillService::new(
            Arc::new(self.live.clone()),
            Arc::new(self.legacy.clone()),
            config,
        )
    }
}

fn owner(name: &str) -> RawVehicleFields {
    RawVehicleFields {
        owner_name: Some(name.to_string()),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_raw_chassis_match_autofills() {
    let fx = Fixture::new();
    fx.legacy
        .insert(RawVehicleFields {
            chassis_number: Some("ABC-123".to_string()),
            brand: Some("Hyundai".to_string()),
            year: Some("2010".to_string()),
            ..Default::default()
        })
        .await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            chassis_number: Some("ABC-123".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    let patch = response.matched.expect("chassis match autofills");
    assert_eq!(patch.brand, "Hyundai");
    assert_eq!(patch.year, "2010");
    assert_eq!(patch.owner_name, "");
    assert_eq!(response.candidates.len(), 1);
    assert!(response.candidates[0].score >= 100);
    assert_eq!(response.candidates[0].from, Provenance::Legacy);
}

#[tokio::test]
async fn test_owner_name_only_lists_candidates_without_match() {
    let fx = Fixture::new();
    fx.legacy.insert(owner("أحمد")).await;
    fx.legacy.insert(owner("احمد")).await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            owner_name: Some("أحمد".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.matched.is_none());
    assert_eq!(response.candidates.len(), 2);
    assert!(response.candidates.iter().all(|c| c.score == 20));
    // ties keep legacy insertion order
    assert_eq!(response.candidates[0].preview.owner_name.as_deref(), Some("أحمد"));
    assert_eq!(response.candidates[1].preview.owner_name.as_deref(), Some("احمد"));
}

#[tokio::test]
async fn test_plate_and_country_match_scores_seventy() {
    let fx = Fixture::new();
    fx.live
        .insert(RawVehicleFields {
            plate_number: Some("12345".to_string()),
            plate_country: Some("SY".to_string()),
            model: Some("Rio".to_string()),
            ..Default::default()
        })
        .await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            plate_number: Some("12345".to_string()),
            plate_country: Some("SY".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.candidates.len(), 1);
    assert_eq!(response.candidates[0].score, 70);
    assert_eq!(response.candidates[0].from, Provenance::Live);
    assert_eq!(response.matched.unwrap().model, "Rio");
}

#[tokio::test]
async fn test_placeholder_input_queries_no_store() {
    let fx = Fixture::new();
    fx.live.insert(owner("لا يوجد")).await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            owner_name: Some("لا يوجد".to_string()),
            national_id: Some(" لايوجد ".to_string()),
            chassis_number: Some("   ".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.matched.is_none());
    assert!(response.candidates.is_empty());
    assert_eq!(fx.live.lookup_count(), 0);
    assert_eq!(fx.legacy.lookup_count(), 0);
}

#[tokio::test]
async fn test_unmatched_national_id_with_matching_name() {
    let fx = Fixture::new();
    fx.live.insert(owner("X")).await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            national_id: Some("12345678901".to_string()),
            owner_name: Some("X".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(response.matched.is_none());
    assert_eq!(response.candidates.len(), 1);
    assert_eq!(response.candidates[0].score, 20);
}

#[tokio::test]
async fn test_excluded_live_record_never_returned() {
    let fx = Fixture::new();
    let raw = RawVehicleFields {
        chassis_number: Some("EDIT-1".to_string()),
        ..Default::default()
    };
    let edited = fx.live.insert(raw.clone()).await;
    fx.legacy.insert(raw).await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            chassis_number: Some("EDIT-1".to_string()),
            exclude_id: Some(edited.to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.candidates.len(), 1);
    assert_eq!(response.candidates[0].from, Provenance::Legacy);
}

#[tokio::test]
async fn test_live_wins_ties_over_legacy() {
    let fx = Fixture::new();
    let raw = |brand: &str| RawVehicleFields {
        chassis_number: Some("TIE-9".to_string()),
        brand: Some(brand.to_string()),
        ..Default::default()
    };
    fx.legacy.insert(raw("legacy")).await;
    fx.live.insert(raw("live")).await;

    let response = fx
        .service()
        .autofill(&IdentityQuery {
            chassis_number: Some("tie9".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.candidates.len(), 2);
    assert_eq!(response.candidates[0].from, Provenance::Live);
    assert_eq!(response.matched.unwrap().brand, "live");
}

#[tokio::test]
async fn test_per_source_cap_and_top_n() {
    let fx = Fixture::new();
    for _ in 0..12 {
        fx.live.insert(owner("سامر 0")).await;
        fx.legacy.insert(owner("سامر 0")).await;
    }

    let service = fx.service_with(AutofillConfig {
        per_source_limit: 3,
        max_candidates: 4,
        ..Default::default()
    });
    let response = service
        .autofill(&IdentityQuery {
            owner_name: Some("سامر 0".to_string()),
            ..Default::default()
        })
        .await
        .unwrap();

    assert_eq!(response.candidates.len(), 4);
    let live = response
        .candidates
        .iter()
        .filter(|c| c.from == Provenance::Live)
        .count();
    assert_eq!(live, 3);
}

#[tokio::test]
async fn test_store_failure_is_not_an_empty_result() {
    let live = MemoryRecordStore::new(Provenance::Live);
    live.insert(owner("X")).await;
    let service = AutofillService::new(
        Arc::new(live),
        Arc::new(MemoryRecordStore::failing(Provenance::Legacy, "connection reset")),
        AutofillConfig::default(),
    );

    let result = service
        .autofill(&IdentityQuery {
            owner_name: Some("X".to_string()),
            ..Default::default()
        })
        .await;

    match result {
        Err(err) => assert!(err.is_store_failure()),
        Ok(response) => panic!("expected failure, got {:?}", response),
    }
}

#[tokio::test]
async fn test_patch_for_selected_candidate() {
    let fx = Fixture::new();
    let id = fx
        .legacy
        .insert(RawVehicleFields {
            color: Some("أبيض".to_string()),
            ..Default::default()
        })
        .await;
    let service = fx.service();

    let patch = service.patch_for(Provenance::Legacy, id).await.unwrap();
    assert_eq!(patch.unwrap().color, "أبيض");
    assert!(service
        .patch_for(Provenance::Live, id)
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
async fn test_health_prefers_legacy_sample() {
    let fx = Fixture::new();
    fx.live.insert(owner("L")).await;
    let legacy_id = fx.legacy.insert(owner("G")).await;
    fx.legacy.insert(owner("H")).await;

    let health = fx.service().health().await.unwrap();
    assert!(health.success);
    assert_eq!(health.database, "memory");
    assert_eq!(health.live_count, 1);
    assert_eq!(health.legacy_count, 2);
    assert_eq!(health.sample.unwrap().id, legacy_id);
}

#[tokio::test]
async fn test_health_propagates_store_failure() {
    let service = AutofillService::new(
        Arc::new(MemoryRecordStore::failing(Provenance::Live, "down")),
        Arc::new(MemoryRecordStore::new(Provenance::Legacy)),
        AutofillConfig::default(),
    );
    assert!(matches!(service.health().await, Err(Error::Store(_))));
}
