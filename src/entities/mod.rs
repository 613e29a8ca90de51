pub mod prelude;

pub mod application_cities;
pub mod application_statuses;
pub mod applications;
pub mod attachments;
pub mod advantages;
pub mod cities;
pub mod confirmation_codes;
pub mod education_levels;
pub mod health_statuses;
pub mod military_branches;
pub mod ranks;
pub mod revoked_tokens;
pub mod service_type_advantages;
pub mod service_types;
pub mod specializations;
pub mod users;
