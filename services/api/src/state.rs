use deadpool_redis::Pool as RedisPool;
use sea_orm::DatabaseConnection;

use crate::infra::cache::RedisSessionStore;
use crate::infra::db::{
    DbDietContentRepository, DbMoodRepository, DbPatientRepository, DbProfessionalRepository,
    DbUserRepository, DbWeightRepository,
};

/// Shared application state passed to every handler via axum `State`.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub redis: RedisPool,
    pub jwt_secret: String,
    pub session_ttl_secs: u64,
    pub cookie_secure: bool,
    pub rotate_code_on_weight: bool,
}

impl AppState {
    pub fn user_repo(&self) -> DbUserRepository {
        DbUserRepository {
            db: self.db.clone(),
        }
    }

    pub fn professional_repo(&self) -> DbProfessionalRepository {
        DbProfessionalRepository {
            db: self.db.clone(),
        }
    }

    pub fn patient_repo(&self) -> DbPatientRepository {
        DbPatientRepository {
            db: self.db.clone(),
        }
    }

    pub fn weight_repo(&self) -> DbWeightRepository {
        DbWeightRepository {
            db: self.db.clone(),
        }
    }

    pub fn mood_repo(&self) -> DbMoodRepository {
        DbMoodRepository {
            db: self.db.clone(),
        }
    }

    pub fn diet_repo(&self) -> DbDietContentRepository {
        DbDietContentRepository {
            db: self.db.clone(),
        }
    }

    pub fn session_store(&self) -> RedisSessionStore {
        RedisSessionStore {
            pool: self.redis.clone(),
        }
    }
}
