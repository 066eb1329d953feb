use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use dietcare_domain::id::{PatientId, ProfessionalId};
use dietcare_domain::measure::is_valid_weight;
use dietcare_domain::pagination::{PageRequest, Sort};

use crate::domain::repository::{PatientRepository, WeightRepository};
use crate::domain::types::{CodeRotation, MAX_NOTE_LEN, Patient, WeightRecord};
use crate::error::ApiError;
use crate::usecase::access_code::{code_expiry, with_fresh_code};
use crate::usecase::patient::owned_patient;

pub struct RecordWeightInput {
    pub weight: Option<f64>,
    pub note: Option<String>,
}

pub struct RecordedWeight {
    pub record: WeightRecord,
    /// Patient as stored after the append (new current weight, possibly new code).
    pub patient: Patient,
    pub code_rotated: bool,
}

pub struct RecordWeightUseCase<P, W>
where
    P: PatientRepository,
    W: WeightRepository,
{
    pub patients: P,
    pub weights: W,
    /// Issue a new access code with every measurement.
    pub rotate_code: bool,
}

impl<P, W> RecordWeightUseCase<P, W>
where
    P: PatientRepository,
    W: WeightRepository,
{
    pub async fn execute(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
        input: RecordWeightInput,
    ) -> Result<RecordedWeight, ApiError> {
        let weight = input.weight.ok_or(ApiError::MissingData("weight"))?;
        if !is_valid_weight(weight) {
            return Err(ApiError::InvalidWeight);
        }
        let note = input
            .note
            .map(|n| n.trim().chars().take(MAX_NOTE_LEN).collect::<String>())
            .filter(|n| !n.is_empty());

        let mut patient = owned_patient(&self.patients, professional_id, patient_id).await?;
        if !patient.is_active {
            return Err(ApiError::PatientNotFound);
        }

        let now = Utc::now();
        let record = WeightRecord {
            id: Uuid::now_v7(),
            patient_id,
            weight,
            note,
            recorded_by: Some(professional_id),
            recorded_at: now,
        };

        if self.rotate_code {
            let expiry = code_expiry(now);
            let rotation = with_fresh_code(|code| {
                let rotation = CodeRotation { code, expiry };
                let record = &record;
                async move {
                    self.weights.append(record, Some(&rotation)).await?;
                    Ok(rotation)
                }
            })
            .await?;
            patient.access_code = rotation.code;
            patient.code_expiry = rotation.expiry;
            info!(patient_id = %patient_id, "patient access code rotated by weight record");
        } else {
            self.weights.append(&record, None).await?;
        }

        patient.current_weight = weight;
        patient.updated_at = now;
        Ok(RecordedWeight {
            record,
            patient,
            code_rotated: self.rotate_code,
        })
    }
}

pub struct ListWeightUseCase<P, W>
where
    P: PatientRepository,
    W: WeightRepository,
{
    pub patients: P,
    pub weights: W,
}

impl<P, W> ListWeightUseCase<P, W>
where
    P: PatientRepository,
    W: WeightRepository,
{
    /// History of the signed-in patient.
    pub async fn own(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<WeightRecord>, ApiError> {
        self.weights.list(patient_id, sort, page.clamped()).await
    }

    /// History of a patient the professional owns.
    pub async fn owned(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<WeightRecord>, ApiError> {
        owned_patient(&self.patients, professional_id, patient_id).await?;
        self.weights.list(patient_id, sort, page.clamped()).await
    }
}
