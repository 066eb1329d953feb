use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use dietcare_auth_types::token::OAuthIdentity;
use dietcare_domain::id::ProfessionalId;

use crate::domain::repository::{ProfessionalRepository, UserRepository};
use crate::domain::types::{Professional, UserAccount};
use crate::error::ApiError;
use crate::usecase::access_code::with_fresh_code;

pub struct RegisterProfessionalInput {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub specialty: Option<String>,
}

pub struct RegisterProfessionalUseCase<R, U>
where
    R: ProfessionalRepository,
    U: UserRepository,
{
    pub professionals: R,
    pub users: U,
}

impl<R, U> RegisterProfessionalUseCase<R, U>
where
    R: ProfessionalRepository,
    U: UserRepository,
{
    /// Link a new professional profile to an OAuth account and issue its code.
    pub async fn execute(
        &self,
        identity: &OAuthIdentity,
        input: RegisterProfessionalInput,
    ) -> Result<Professional, ApiError> {
        let first_name = trimmed(input.first_name).ok_or(ApiError::MissingData("firstName"))?;
        let last_name = trimmed(input.last_name).ok_or(ApiError::MissingData("lastName"))?;
        let email = trimmed(input.email).or_else(|| identity.email.clone());

        if self
            .professionals
            .find_by_user(identity.user_id)
            .await?
            .is_some()
        {
            return Err(ApiError::ProfessionalAlreadyRegistered);
        }

        self.users
            .upsert(&UserAccount {
                id: identity.user_id,
                email: identity.email.clone(),
                first_name: Some(first_name.clone()),
                last_name: Some(last_name.clone()),
                profile_image_url: None,
            })
            .await?;

        let now = Utc::now();
        let template = Professional {
            id: ProfessionalId(Uuid::now_v7()),
            user_id: Some(identity.user_id),
            first_name,
            last_name,
            email,
            specialty: trimmed(input.specialty),
            access_code: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        };
        let professional = with_fresh_code(|code| {
            let professional = Professional {
                access_code: code,
                ..template.clone()
            };
            async move {
                self.professionals.create(&professional).await?;
                Ok(professional)
            }
        })
        .await?;

        info!(professional_id = %professional.id, user_id = %identity.user_id, "professional registered");
        Ok(professional)
    }
}

pub struct ProfessionalProfileUseCase<R>
where
    R: ProfessionalRepository,
{
    pub professionals: R,
}

impl<R> ProfessionalProfileUseCase<R>
where
    R: ProfessionalRepository,
{
    pub async fn get(&self, id: ProfessionalId) -> Result<Professional, ApiError> {
        self.professionals
            .find_by_id(id)
            .await?
            .ok_or(ApiError::ProfessionalNotFound)
    }

    /// Issue a new professional code. Existing professional sessions end with it.
    pub async fn rotate_code(&self, id: ProfessionalId) -> Result<Professional, ApiError> {
        let mut professional = self.get(id).await?;
        let code = with_fresh_code(|code| async move {
            self.professionals.set_access_code(id, &code).await?;
            Ok(code)
        })
        .await?;
        professional.access_code = code;
        professional.updated_at = Utc::now();
        info!(professional_id = %id, "professional access code rotated");
        Ok(professional)
    }
}

fn trimmed(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_owned())
        .filter(|v| !v.is_empty())
}
