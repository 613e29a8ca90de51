use crate::entities::prelude::*;
use crate::entities::{application_cities, application_statuses, service_type_advantages, service_types, users};
use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::Schema;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Hash the default admin password using Argon2id
fn hash_default_password() -> String {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let password = b"password";
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    argon2
        .hash_password(password, &salt)
        .expect("Failed to hash default password")
        .to_string()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();
        let schema = Schema::new(backend);

        manager
            .create_table(schema.create_table_from_entity(Cities).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Users).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(ConfirmationCodes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(RevokedTokens)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(ServiceTypes)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Advantages)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(ServiceTypeAdvantages)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(ApplicationStatuses)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(EducationLevels)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Specializations)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(MilitaryBranches)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(schema.create_table_from_entity(Ranks).if_not_exists().to_owned())
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(HealthStatuses)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Applications)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(ApplicationCities)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_table(
                schema
                    .create_table_from_entity(Attachments)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        // Composite uniqueness the entity derives cannot express.
        manager
            .create_index(
                Index::create()
                    .name("idx_application_cities_pair")
                    .table(ApplicationCities)
                    .col(application_cities::Column::ApplicationId)
                    .col(application_cities::Column::CityId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_type_advantages_pair")
                    .table(ServiceTypeAdvantages)
                    .col(service_type_advantages::Column::ServiceTypeId)
                    .col(service_type_advantages::Column::AdvantageId)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        let now = chrono::Utc::now();

        // Seed the review statuses; `new` is the owner-editable initial state.
        for (code, name) in [
            ("new", "New"),
            ("in_review", "In review"),
            ("approved", "Approved"),
            ("rejected", "Rejected"),
        ] {
            let insert = Query::insert()
                .into_table(ApplicationStatuses)
                .columns([
                    application_statuses::Column::Code,
                    application_statuses::Column::Name,
                    application_statuses::Column::CreatedAt,
                    application_statuses::Column::ModifiedAt,
                    application_statuses::Column::Exist,
                ])
                .values_panic([code.into(), name.into(), now.into(), now.into(), true.into()])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        // Seed the service types the specialized creation endpoints rely on.
        for (code, name, description) in [
            ("contract", "Contract service", "Paid service under contract"),
            ("conscription", "Conscription service", "Mandatory term of service"),
        ] {
            let insert = Query::insert()
                .into_table(ServiceTypes)
                .columns([
                    service_types::Column::Code,
                    service_types::Column::Name,
                    service_types::Column::Description,
                    service_types::Column::CreatedAt,
                    service_types::Column::ModifiedAt,
                    service_types::Column::Exist,
                ])
                .values_panic([
                    code.into(),
                    name.into(),
                    description.into(),
                    now.into(),
                    now.into(),
                    true.into(),
                ])
                .to_owned();
            manager.exec_stmt(insert).await?;
        }

        // Seed a staff account with a hashed default password.
        let password_hash = hash_default_password();
        let insert = Query::insert()
            .into_table(Users)
            .columns([
                users::Column::Username,
                users::Column::Email,
                users::Column::Phone,
                users::Column::FirstName,
                users::Column::LastName,
                users::Column::PasswordHash,
                users::Column::IsActive,
                users::Column::IsStaff,
                users::Column::CreatedAt,
                users::Column::UpdatedAt,
            ])
            .values_panic([
                "admin".into(),
                "admin@sarbaz.kz".into(),
                "+70000000000".into(),
                "Admin".into(),
                "".into(),
                password_hash.into(),
                true.into(),
                true.into(),
                now.into(),
                now.into(),
            ])
            .to_owned();
        manager.exec_stmt(insert).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Attachments).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApplicationCities).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Applications).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(HealthStatuses).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Ranks).to_owned()).await?;
        manager
            .drop_table(Table::drop().table(MilitaryBranches).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Specializations).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(EducationLevels).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ApplicationStatuses).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceTypeAdvantages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Advantages).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ServiceTypes).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RevokedTokens).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ConfirmationCodes).to_owned())
            .await?;
        manager.drop_table(Table::drop().table(Users).to_owned()).await?;
        manager.drop_table(Table::drop().table(Cities).to_owned()).await?;

        Ok(())
    }
}
