//! Location DTOs.

use questlog_core::types::DbId;
use serde::Deserialize;
use validator::Validate;

pub use questlog_core::location::{AreaType, Location};

/// DTO for creating a new location.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateLocation {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub area_type: AreaType,
    pub parent_location_id: Option<DbId>,
}

/// DTO for partially updating a location. Re-parenting goes through
/// `LocationRepo::set_parent`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateLocation {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub area_type: Option<AreaType>,
}
