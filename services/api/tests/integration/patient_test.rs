use chrono::{Duration, Utc};
use uuid::Uuid;

use dietcare_api::error::ApiError;
use dietcare_api::usecase::patient::{
    CreatePatientInput, CreatePatientUseCase, GetPatientUseCase, PatientCodeUseCase,
    UpdatePatientInput, UpdatePatientUseCase,
};
use dietcare_api::usecase::session::ValidatePatientCodeUseCase;
use dietcare_api::usecase::weight::{RecordWeightInput, RecordWeightUseCase};
use dietcare_domain::access_code::is_well_formed;
use dietcare_domain::id::{PatientId, ProfessionalId};

use crate::helpers::{MemoryDb, MemorySessions, TTL_SECS, test_patient, test_professional};

fn create_input(diet_level: i64, weight: f64, target: Option<f64>) -> CreatePatientInput {
    CreatePatientInput {
        first_name: Some("Maria".into()),
        last_name: Some("Lima".into()),
        email: Some("maria@example.com".into()),
        diet_level: Some(diet_level),
        weight: Some(weight),
        target_weight: target,
    }
}

fn validator(
    db: &MemoryDb,
    sessions: &MemorySessions,
) -> ValidatePatientCodeUseCase<MemoryDb, MemorySessions> {
    ValidatePatientCodeUseCase {
        patients: db.clone(),
        sessions: sessions.clone(),
        session_ttl_secs: TTL_SECS,
    }
}

#[tokio::test]
async fn should_issue_code_validate_and_rotate_on_weight() {
    let db = MemoryDb::new();
    let sessions = MemorySessions::new();
    let pro = test_professional("PRO00001");
    db.insert_professional(pro.clone());

    let created = CreatePatientUseCase {
        patients: db.clone(),
    }
    .execute(pro.id, create_input(2, 80.0, Some(70.0)))
    .await
    .unwrap();

    assert_eq!(created.access_code.len(), 8);
    assert!(is_well_formed(&created.access_code));
    let expected_expiry = Utc::now() + Duration::days(30);
    assert!((created.code_expiry - expected_expiry).num_seconds().abs() < 60);
    assert_eq!(created.current_weight, 80.0);
    assert_eq!(created.initial_weight, 80.0);
    assert_eq!(db.weight_count(created.id), 1, "initial weight record written");

    let validated = validator(&db, &sessions)
        .execute(&created.access_code, None)
        .await
        .unwrap();
    assert_eq!(validated.subject.diet_level.get(), 2);

    let recorded = RecordWeightUseCase {
        patients: db.clone(),
        weights: db.clone(),
        rotate_code: true,
    }
    .execute(
        pro.id,
        created.id,
        RecordWeightInput {
            weight: Some(78.0),
            note: None,
        },
    )
    .await
    .unwrap();

    assert_ne!(recorded.patient.access_code, created.access_code);
    assert!(is_well_formed(&recorded.patient.access_code));
    assert_eq!(db.patient(created.id).current_weight, 78.0);

    let old = validator(&db, &sessions)
        .execute(&created.access_code, None)
        .await;
    assert!(
        matches!(old, Err(ApiError::CodeNotFound)),
        "previous code must stop validating, got {:?}",
        old.err()
    );
    let new = validator(&db, &sessions)
        .execute(&recorded.patient.access_code, None)
        .await;
    assert!(new.is_ok());
}

#[tokio::test]
async fn should_retry_code_issuance_on_conflict() {
    let db = MemoryDb::new();
    let pro = test_professional("PRO00001");
    db.force_conflicts(3);

    let created = CreatePatientUseCase {
        patients: db.clone(),
    }
    .execute(pro.id, create_input(1, 95.0, None))
    .await
    .unwrap();

    assert!(is_well_formed(&created.access_code));
    assert_eq!(*db.forced_conflicts.lock().unwrap(), 0);
}

#[tokio::test]
async fn should_fail_after_five_conflicts() {
    let db = MemoryDb::new();
    let pro = test_professional("PRO00001");
    db.force_conflicts(5);

    let result = CreatePatientUseCase {
        patients: db.clone(),
    }
    .execute(pro.id, create_input(1, 95.0, None))
    .await;

    assert!(matches!(result, Err(ApiError::CodeConflict)));
    assert!(db.tables.lock().unwrap().patients.is_empty());
}

#[tokio::test]
async fn should_validate_patient_creation_input() {
    let db = MemoryDb::new();
    let pro = test_professional("PRO00001");
    let uc = CreatePatientUseCase {
        patients: db.clone(),
    };

    let bad_level = uc.execute(pro.id, create_input(6, 80.0, None)).await;
    assert!(matches!(bad_level, Err(ApiError::InvalidDietLevel(_))));

    let bad_weight = uc.execute(pro.id, create_input(2, 5.0, None)).await;
    assert!(matches!(bad_weight, Err(ApiError::InvalidWeight)));

    let bad_target = uc.execute(pro.id, create_input(2, 80.0, Some(-1.0))).await;
    assert!(matches!(bad_target, Err(ApiError::InvalidWeight)));

    let mut nameless = create_input(2, 80.0, None);
    nameless.first_name = Some("  ".into());
    let missing = uc.execute(pro.id, nameless).await;
    assert!(matches!(missing, Err(ApiError::MissingData("firstName"))));

    assert!(db.tables.lock().unwrap().patients.is_empty());
}

#[tokio::test]
async fn should_hide_other_professionals_patients() {
    let db = MemoryDb::new();
    let owner = test_professional("PRO00001");
    let other = ProfessionalId(Uuid::new_v4());
    let patient = test_patient(owner.id, "AB12CD34");
    db.insert_patient(patient.clone());

    let get = GetPatientUseCase {
        patients: db.clone(),
    };
    assert!(get.owned(owner.id, patient.id).await.is_ok());
    assert!(matches!(
        get.owned(other, patient.id).await,
        Err(ApiError::PatientNotFound)
    ));
    assert!(matches!(
        get.owned(owner.id, PatientId(Uuid::new_v4())).await,
        Err(ApiError::PatientNotFound)
    ));

    let revoke = PatientCodeUseCase {
        patients: db.clone(),
    }
    .revoke(other, patient.id)
    .await;
    assert!(matches!(revoke, Err(ApiError::PatientNotFound)));
    assert_eq!(db.patient(patient.id).access_code, "AB12CD34");
}

#[tokio::test]
async fn should_list_only_active_patients_by_default() {
    let db = MemoryDb::new();
    let pro = test_professional("PRO00001");
    let active = test_patient(pro.id, "AAAA1111");
    let mut inactive = test_patient(pro.id, "BBBB2222");
    inactive.is_active = false;
    db.insert_patient(active.clone());
    db.insert_patient(inactive);
    db.insert_patient(test_patient(ProfessionalId(Uuid::new_v4()), "CCCC3333"));

    let get = GetPatientUseCase {
        patients: db.clone(),
    };
    let listed = get.list(pro.id, false).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, active.id);
    assert_eq!(get.list(pro.id, true).await.unwrap().len(), 2);
}

#[tokio::test]
async fn should_update_diet_level_and_reject_empty_update() {
    let db = MemoryDb::new();
    let pro = test_professional("PRO00001");
    let patient = test_patient(pro.id, "AB12CD34");
    db.insert_patient(patient.clone());
    let uc = UpdatePatientUseCase {
        patients: db.clone(),
    };

    let updated = uc
        .execute(
            pro.id,
            patient.id,
            UpdatePatientInput {
                diet_level: Some(5),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.diet_level.get(), 5);
    assert_eq!(db.patient(patient.id).diet_level.get(), 5);

    let empty = uc
        .execute(pro.id, patient.id, UpdatePatientInput::default())
        .await;
    assert!(matches!(empty, Err(ApiError::MissingData(_))));

    let invalid = uc
        .execute(
            pro.id,
            patient.id,
            UpdatePatientInput {
                diet_level: Some(0),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(invalid, Err(ApiError::InvalidDietLevel(_))));
}

#[tokio::test]
async fn should_stop_validating_deactivated_patient() {
    let db = MemoryDb::new();
    let sessions = MemorySessions::new();
    let pro = test_professional("PRO00001");
    let patient = test_patient(pro.id, "AB12CD34");
    db.insert_patient(patient.clone());

    UpdatePatientUseCase {
        patients: db.clone(),
    }
    .deactivate(pro.id, patient.id)
    .await
    .unwrap();

    assert!(!db.patient(patient.id).is_active);
    let result = validator(&db, &sessions).execute("AB12CD34", None).await;
    assert!(matches!(result, Err(ApiError::CodeNotFound)));
}

#[tokio::test]
async fn should_fail_validation_immediately_after_revocation() {
    let db = MemoryDb::new();
    let sessions = MemorySessions::new();
    let pro = test_professional("PRO00001");
    let patient = test_patient(pro.id, "AB12CD34");
    db.insert_patient(patient.clone());

    PatientCodeUseCase {
        patients: db.clone(),
    }
    .revoke(pro.id, patient.id)
    .await
    .unwrap();

    let stored = db.patient(patient.id);
    assert!(stored.is_active, "revocation leaves the active flag alone");
    assert!(stored.code_expiry < Utc::now());
    assert!(!is_well_formed(&stored.access_code));

    let result = validator(&db, &sessions).execute("AB12CD34", None).await;
    assert!(result.is_err(), "revoked code must not validate");
}

#[tokio::test]
async fn should_rotate_code_on_demand() {
    let db = MemoryDb::new();
    let sessions = MemorySessions::new();
    let pro = test_professional("PRO00001");
    let mut patient = test_patient(pro.id, "AB12CD34");
    patient.code_expiry = Utc::now() - Duration::days(1);
    db.insert_patient(patient.clone());

    let rotated = PatientCodeUseCase {
        patients: db.clone(),
    }
    .rotate(pro.id, patient.id)
    .await
    .unwrap();

    assert_ne!(rotated.access_code, "AB12CD34");
    assert!(rotated.code_expiry > Utc::now() + Duration::days(29));
    assert!(
        validator(&db, &sessions)
            .execute(&rotated.access_code, None)
            .await
            .is_ok()
    );
}
