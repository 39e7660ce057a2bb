//! Thin HTTP clients over the backend's REST resources. One request per
//! operation; no retries, no caching. Every non-success status is mapped
//! to a domain error before it reaches the services.

use async_trait::async_trait;
use reqwest::{Client, Response, StatusCode};

use crate::error::AppError;
use crate::models::{Program, ProgramPayload, School};

#[async_trait]
pub trait SchoolGateway: Send + Sync {
    async fn school_by_user(&self, user_id: i64) -> Result<School, AppError>;
}

#[async_trait]
pub trait ProgramGateway: Send + Sync {
    async fn list(&self) -> Result<Vec<Program>, AppError>;
    async fn get(&self, id: i64) -> Result<Program, AppError>;
    async fn create(&self, payload: &ProgramPayload) -> Result<Program, AppError>;
    async fn update(&self, id: i64, payload: &ProgramPayload) -> Result<Program, AppError>;
    async fn delete(&self, id: i64) -> Result<(), AppError>;
}

async fn fail_for_status(response: Response) -> Result<Response, AppError> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(AppError::RequestFailed { status, body })
}

pub struct HttpSchoolGateway {
    client: Client,
    base_url: String,
}

impl HttpSchoolGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl SchoolGateway for HttpSchoolGateway {
    async fn school_by_user(&self, user_id: i64) -> Result<School, AppError> {
        let url = format!("{}/escolas/usuario/{}", self.base_url, user_id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!(
                "no school linked to user {user_id}"
            )));
        }
        let response = fail_for_status(response).await?;
        Ok(response.json::<School>().await?)
    }
}

pub struct HttpProgramGateway {
    client: Client,
    base_url: String,
}

impl HttpProgramGateway {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProgramGateway for HttpProgramGateway {
    async fn list(&self) -> Result<Vec<Program>, AppError> {
        let url = format!("{}/programas", self.base_url);
        let response = fail_for_status(self.client.get(&url).send().await?).await?;
        Ok(response.json::<Vec<Program>>().await?)
    }

    async fn get(&self, id: i64) -> Result<Program, AppError> {
        let url = format!("{}/programas/{}", self.base_url, id);
        let response = self.client.get(&url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound(format!("program {id} does not exist")));
        }
        let response = fail_for_status(response).await?;
        Ok(response.json::<Program>().await?)
    }

    async fn create(&self, payload: &ProgramPayload) -> Result<Program, AppError> {
        let url = format!("{}/programas", self.base_url);
        let response = self.client.post(&url).json(payload).send().await?;
        let response = fail_for_status(response).await?;
        Ok(response.json::<Program>().await?)
    }

    async fn update(&self, id: i64, payload: &ProgramPayload) -> Result<Program, AppError> {
        let url = format!("{}/programas/{}", self.base_url, id);
        let response = self.client.put(&url).json(payload).send().await?;
        let response = fail_for_status(response).await?;
        Ok(response.json::<Program>().await?)
    }

    async fn delete(&self, id: i64) -> Result<(), AppError> {
        let url = format!("{}/programas/{}", self.base_url, id);
        let response = self.client.delete(&url).send().await?;
        fail_for_status(response).await?;
        Ok(())
    }
}
