use chrono::Utc;
use uuid::Uuid;

use dietcare_domain::id::{PatientId, ProfessionalId};
use dietcare_domain::measure::{is_valid_scale, normalize_tags};
use dietcare_domain::pagination::{PageRequest, Sort};

use crate::domain::repository::{MoodRepository, PatientRepository};
use crate::domain::types::{MAX_NOTE_LEN, MoodEntry};
use crate::error::ApiError;
use crate::usecase::patient::owned_patient;

pub struct CreateMoodInput {
    pub mood: Option<i16>,
    pub energy: Option<i16>,
    pub motivation: Option<i16>,
    pub note: Option<String>,
    pub tags: Vec<String>,
}

pub struct CreateMoodEntryUseCase<M>
where
    M: MoodRepository,
{
    pub moods: M,
}

impl<M> CreateMoodEntryUseCase<M>
where
    M: MoodRepository,
{
    pub async fn execute(
        &self,
        patient_id: PatientId,
        input: CreateMoodInput,
    ) -> Result<MoodEntry, ApiError> {
        let mood = input.mood.ok_or(ApiError::MissingData("mood"))?;
        let energy = input.energy.ok_or(ApiError::MissingData("energy"))?;
        let motivation = input.motivation.ok_or(ApiError::MissingData("motivation"))?;
        if ![mood, energy, motivation].into_iter().all(is_valid_scale) {
            return Err(ApiError::InvalidMood);
        }
        let tags = normalize_tags(&input.tags).ok_or(ApiError::InvalidMood)?;
        let note = input
            .note
            .map(|n| n.trim().to_owned())
            .filter(|n| !n.is_empty());
        if note.as_ref().is_some_and(|n| n.chars().count() > MAX_NOTE_LEN) {
            return Err(ApiError::InvalidMood);
        }

        let entry = MoodEntry {
            id: Uuid::now_v7(),
            patient_id,
            mood,
            energy,
            motivation,
            note,
            tags,
            created_at: Utc::now(),
        };
        self.moods.create(&entry).await?;
        Ok(entry)
    }
}

pub struct ListMoodUseCase<P, M>
where
    P: PatientRepository,
    M: MoodRepository,
{
    pub patients: P,
    pub moods: M,
}

impl<P, M> ListMoodUseCase<P, M>
where
    P: PatientRepository,
    M: MoodRepository,
{
    pub async fn own(
        &self,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<MoodEntry>, ApiError> {
        self.moods.list(patient_id, sort, page.clamped()).await
    }

    pub async fn owned(
        &self,
        professional_id: ProfessionalId,
        patient_id: PatientId,
        sort: Sort,
        page: PageRequest,
    ) -> Result<Vec<MoodEntry>, ApiError> {
        owned_patient(&self.patients, professional_id, patient_id).await?;
        self.moods.list(patient_id, sort, page.clamped()).await
    }
}
