//! Reservation DTOs

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use crate::domain::reservation::{Reservation, ReservationDraft, ReservationSearchFilter};
use crate::domain::{DomainError, DomainResult};

/// Rejects dates before today (server local calendar).
fn today_or_later(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date < chrono::Local::now().date_naive() {
        let mut err = ValidationError::new("future_or_present");
        err.message = Some("must be today or later".into());
        return Err(err);
    }
    Ok(())
}

/// Body of create and update requests
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationRequest {
    /// Must be absent; ids are assigned by the server
    pub id: Option<i64>,
    pub user_id: i64,
    pub room_id: i64,
    #[validate(custom(function = "today_or_later"))]
    #[schema(value_type = String, format = Date, example = "2030-06-10")]
    pub start_date: NaiveDate,
    #[validate(custom(function = "today_or_later"))]
    #[schema(value_type = String, format = Date, example = "2030-06-15")]
    pub end_date: NaiveDate,
    /// Must be absent on create; ignored on update
    pub status: Option<String>,
}

impl ReservationRequest {
    pub fn into_draft(self) -> DomainResult<ReservationDraft> {
        if self.id.is_some() {
            return Err(DomainError::Validation("Id should be empty".into()));
        }
        let status = self.status.as_deref().map(str::parse).transpose()?;
        Ok(ReservationDraft {
            user_id: self.user_id,
            room_id: self.room_id,
            start_date: self.start_date,
            end_date: self.end_date,
            status,
        })
    }
}

/// Reservation as returned by the API
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: Option<i64>,
    pub user_id: i64,
    pub room_id: i64,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    /// PENDING, APPROVED or CANCELLED
    pub status: String,
}

impl From<Reservation> for ReservationDto {
    fn from(r: Reservation) -> Self {
        Self {
            id: r.id,
            user_id: r.user_id,
            room_id: r.room_id,
            start_date: r.start_date,
            end_date: r.end_date,
            status: r.status.as_str().to_string(),
        }
    }
}

/// Query parameters for the reservation list
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SearchParams {
    pub room_id: Option<i64>,
    pub user_id: Option<i64>,
    /// Page size, default 10
    pub page_size: Option<u64>,
    /// 0-based page index, default 0
    pub page_number: Option<u64>,
}

impl From<SearchParams> for ReservationSearchFilter {
    fn from(p: SearchParams) -> Self {
        Self {
            room_id: p.room_id,
            user_id: p.user_id,
            page_size: p.page_size,
            page_number: p.page_number,
        }
    }
}

/// Query parameters for the availability check
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct AvailabilityParams {
    #[param(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[param(value_type = String, format = Date)]
    pub end_date: NaiveDate,
}

/// Result of an availability check
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailabilityResponse {
    pub room_id: i64,
    #[schema(value_type = String, format = Date)]
    pub start_date: NaiveDate,
    #[schema(value_type = String, format = Date)]
    pub end_date: NaiveDate,
    /// `true` when no approved reservation overlaps the range
    pub available: bool,
}
