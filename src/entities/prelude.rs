pub use super::advantages::Entity as Advantages;
pub use super::application_cities::Entity as ApplicationCities;
pub use super::application_statuses::Entity as ApplicationStatuses;
pub use super::applications::Entity as Applications;
pub use super::attachments::Entity as Attachments;
pub use super::cities::Entity as Cities;
pub use super::confirmation_codes::Entity as ConfirmationCodes;
pub use super::education_levels::Entity as EducationLevels;
pub use super::health_statuses::Entity as HealthStatuses;
pub use super::military_branches::Entity as MilitaryBranches;
pub use super::ranks::Entity as Ranks;
pub use super::revoked_tokens::Entity as RevokedTokens;
pub use super::service_type_advantages::Entity as ServiceTypeAdvantages;
pub use super::service_types::Entity as ServiceTypes;
pub use super::specializations::Entity as Specializations;
pub use super::users::Entity as Users;
