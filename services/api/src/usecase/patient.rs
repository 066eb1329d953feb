use chrono::{Duration, Utc};
use tracing::info;
use uuid::Uuid;

use dietcare_domain::access_code::REVOKED_CODE_PREFIX;
use dietcare_domain::diet_level::DietLevel;
use dietcare_domain::id::{PatientId, ProfessionalId};
use dietcare_domain::measure::is_valid_weight;

use crate::domain::repository::PatientRepository;
use crate::domain::types::{Patient, PatientUpdate, WeightRecord};
use crate::error::ApiError;
use crate::usecase::access_code::{code_expiry, with_fresh_code};

/// Load a patient the professional owns. Someone else's patient is reported as
/// missing so ids of other practices are not disclosed.
pub async fn owned_patient<P: PatientRepository>(
    patients: &P,
    professional_id: ProfessionalId,
    patient_id: PatientId,
) -> Result<Patient, ApiError> {
    patients
        .find_by_id(patient_id)
        .await?
        .filter(|p| p.is_owned_by(professional_id))
        .ok_or(ApiError::PatientNotFound)
}

fn required(value: Option<String>, field: &'static str) -> Result<String, ApiError> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
        .ok_or(ApiError::MissingData(field))
}

fn optional_trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}

// ── Create ───────────────────────────────────────────────────────────────────

pub struct CreatePatientInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub diet_level: Option<i64>,
    pub weight: Option<f64>,
    pub target_weight: Option<f64>,
}

pub struct CreatePatientUseCase<P>
where
    P: PatientRepository,
{
    pub patients: P,
}

impl<P> CreatePatientUseCase<P>
where
    P: PatientRepository,
{
    /// Create a patient with a fresh access code and its first weight record.
    pub async fn execute(
        &self,
        professional_id: ProfessionalId,
        input: CreatePatientInput,
    ) -> Result<Patient, ApiError> {
        let first_name = required(input.first_name, "firstName")?;
        let last_name = required(input.last_name, "lastName")?;
        let diet_level = DietLevel::new(input.diet_level.ok_or(ApiError::MissingData("dietLevel"))?)?;
        let weight = input.weight.ok_or(ApiError::MissingData("weight"))?;
        if !is_valid_weight(weight) {
            return Err(ApiError::InvalidWeight);
        }
        if input.target_weight.is_some_and(|t| !is_valid_weight(t)) {
            return Err(ApiError::InvalidWeight);
        }

        let now = Utc::now();
        let template = Patient {
            id: PatientId(Uuid::now_v7()),
            user_id: None,
            professional_id,
            first_name,
            last_name,
            email: optional_trimmed(input.email),
            diet_level,
            initial_weight: weight,
            current_weight: weight,
            target_weight: input.target_weight,
            access_code: String::new(),
            code_expiry: code_expiry(now),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let initial = WeightRecord {
            id: Uuid::now_v7(),
            patient_id: template.id,
            weight,
            note: None,
            recorded_by: Some(professional_id),
            recorded_at: now,
        };

        let patient = with_fresh_code(|code| {
            let patient = Patient {
                access_code: code,
                ..template.clone()
            };
            let initial = initial.clone();
            async move {
                self.patients.create_with_weight(&patient, &initial).await?;
                Ok(patient)
            }
        })
        .await?;

        info!(patient_id = %patient.id, professional_id = %professional_id, "patient created");
        Ok(patient)
    }
}

// ── Read ─────────────────────────────────────────────────────────────────────

pub struct GetPatientUseCase<P>
where
    P: PatientRepository,
{
    pub patients: P,
}

impl<P> GetPatientUseCase<P>
where
    P: PatientRepository,
{
    /// Fresh read for the signed-in patient.
    pub async fn current(&self, patient_id: PatientId) -> Result<Patient, ApiError> {
        self.patients
            .find_by_id(patient_id)
            .await?
            .ok_or(ApiError::PatientNotFound)
    }

    pub async fn owned(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
    ) -> Result<Patient, ApiError> {
        owned_patient(&self.patients, professional_id, patient_id).await
    }

    pub async fn list(
        &self,
        professional_id: ProfessionalId,
        include_inactive: bool,
    ) -> Result<Vec<Patient>, ApiError> {
        self.patients
            .list_by_professional(professional_id, include_inactive)
            .await
    }
}

// ── Update / deactivate ──────────────────────────────────────────────────────

#[derive(Default)]
pub struct UpdatePatientInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub diet_level: Option<i64>,
    pub target_weight: Option<f64>,
    pub is_active: Option<bool>,
}

pub struct UpdatePatientUseCase<P>
where
    P: PatientRepository,
{
    pub patients: P,
}

impl<P> UpdatePatientUseCase<P>
where
    P: PatientRepository,
{
    pub async fn execute(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
        input: UpdatePatientInput,
    ) -> Result<Patient, ApiError> {
        let update = PatientUpdate {
            first_name: optional_trimmed(input.first_name),
            last_name: optional_trimmed(input.last_name),
            email: optional_trimmed(input.email),
            diet_level: input.diet_level.map(DietLevel::new).transpose()?,
            target_weight: input.target_weight,
            is_active: input.is_active,
        };
        if update.is_empty() {
            return Err(ApiError::MissingData("update"));
        }
        if update.target_weight.is_some_and(|t| !is_valid_weight(t)) {
            return Err(ApiError::InvalidWeight);
        }

        let mut patient = owned_patient(&self.patients, professional_id, patient_id).await?;
        self.patients.update(patient_id, &update).await?;
        update.apply(&mut patient);
        patient.updated_at = Utc::now();
        if let Some(level) = update.diet_level {
            info!(patient_id = %patient_id, diet_level = level.get(), "diet level assigned");
        }
        Ok(patient)
    }

    /// Soft delete. The patient's code stops authorizing immediately.
    pub async fn deactivate(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
    ) -> Result<(), ApiError> {
        owned_patient(&self.patients, professional_id, patient_id).await?;
        let update = PatientUpdate {
            is_active: Some(false),
            ..Default::default()
        };
        self.patients.update(patient_id, &update).await?;
        info!(patient_id = %patient_id, "patient deactivated");
        Ok(())
    }
}

// ── Access code rotation / revocation ───────────────────────────────────────

pub struct PatientCodeUseCase<P>
where
    P: PatientRepository,
{
    pub patients: P,
}

impl<P> PatientCodeUseCase<P>
where
    P: PatientRepository,
{
    /// Issue a new code and expiry on demand.
    pub async fn rotate(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
    ) -> Result<Patient, ApiError> {
        let mut patient = owned_patient(&self.patients, professional_id, patient_id).await?;
        let expiry = code_expiry(Utc::now());
        let code = with_fresh_code(|code| async move {
            self.patients
                .set_access_code(patient_id, &code, expiry)
                .await?;
            Ok(code)
        })
        .await?;
        patient.access_code = code;
        patient.code_expiry = expiry;
        info!(patient_id = %patient_id, "patient access code rotated");
        Ok(patient)
    }

    /// Replace the code with a sentinel that can never be entered and expire it.
    pub async fn revoke(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
    ) -> Result<(), ApiError> {
        owned_patient(&self.patients, professional_id, patient_id).await?;
        let sentinel = format!("{REVOKED_CODE_PREFIX}{patient_id}");
        let expiry = Utc::now() - Duration::seconds(1);
        self.patients
            .set_access_code(patient_id, &sentinel, expiry)
            .await?;
        info!(patient_id = %patient_id, "patient access code revoked");
        Ok(())
    }
}
