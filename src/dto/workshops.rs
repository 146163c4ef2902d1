use serde::Serialize;
use utoipa::ToSchema;

use crate::models::{Workshop, WorkshopRegistration};

#[derive(Debug, Serialize, ToSchema)]
pub struct WorkshopList {
    pub items: Vec<Workshop>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RegistrationResponse {
    pub registration: WorkshopRegistration,
}
