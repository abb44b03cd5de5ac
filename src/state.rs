use std::{path::PathBuf, sync::Arc};

use sea_orm::DatabaseConnection;

use crate::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub orm: DatabaseConnection,
    pub jwt: Arc<JwtSettings>,
    /// Directory served under `/images`.
    pub images_dir: PathBuf,
}

#[derive(Debug)]
pub struct JwtSettings {
    pub secret: String,
    pub ttl_hours: i64,
}

impl AppState {
    pub fn new(orm: DatabaseConnection, jwt_secret: impl Into<String>, jwt_ttl_hours: i64) -> Self {
        Self {
            orm,
            jwt: Arc::new(JwtSettings {
                secret: jwt_secret.into(),
                ttl_hours: jwt_ttl_hours,
            }),
            images_dir: PathBuf::from("assets/images"),
        }
    }

    pub fn with_images_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images_dir = dir.into();
        self
    }

    pub fn from_config(orm: DatabaseConnection, config: &AppConfig) -> Self {
        Self::new(orm, config.jwt_secret.clone(), config.jwt_ttl_hours)
            .with_images_dir(&config.images_dir)
    }
}
