use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Users { Table, Id, Username, Email, Password, Role, Address }

#[derive(DeriveIden)]
enum Stores { Table, Id, Name, Email, Address, Image, OwnerId }

#[derive(DeriveIden)]
enum Ratings { Table, Id, UserId, StoreId, Rating }

const ROLES: [&str; 3] = ["systemadmin", "normaluser", "storeowner"];

#[derive(DeriveMigrationName)]
pub struct Migration;
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.create_table(
            Table::create()
                .table(Users::Table)
                .if_not_exists()
                .col(ColumnDef::new(Users::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Users::Username).string().not_null())
                .col(ColumnDef::new(Users::Email).string().not_null().unique_key())
                .col(ColumnDef::new(Users::Password).string().not_null())
                .col(ColumnDef::new(Users::Role).string_len(16).not_null().check(Expr::col(Users::Role).is_in(ROLES)))
                .col(ColumnDef::new(Users::Address).string())
                .to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Stores::Table)
                .if_not_exists()
                .col(ColumnDef::new(Stores::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Stores::Name).string().not_null())
                .col(ColumnDef::new(Stores::Email).string())
                .col(ColumnDef::new(Stores::Address).string())
                .col(ColumnDef::new(Stores::Image).string())
                .col(ColumnDef::new(Stores::OwnerId).integer())
                .foreign_key(ForeignKey::create()
                    .name("fk_stores_owner")
                    .from(Stores::Table, Stores::OwnerId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::SetNull)
                )
                .to_owned()
        ).await?;

        manager.create_index(
            Index::create().name("idx_stores_owner").table(Stores::Table).col(Stores::OwnerId).if_not_exists().to_owned()
        ).await?;

        manager.create_table(
            Table::create()
                .table(Ratings::Table)
                .if_not_exists()
                .col(ColumnDef::new(Ratings::Id).integer().not_null().auto_increment().primary_key())
                .col(ColumnDef::new(Ratings::UserId).integer().not_null())
                .col(ColumnDef::new(Ratings::StoreId).integer().not_null())
                .col(ColumnDef::new(Ratings::Rating).integer().not_null().check(Expr::col(Ratings::Rating).between(1, 5)))
                .foreign_key(ForeignKey::create()
                    .name("fk_ratings_user")
                    .from(Ratings::Table, Ratings::UserId)
                    .to(Users::Table, Users::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .foreign_key(ForeignKey::create()
                    .name("fk_ratings_store")
                    .from(Ratings::Table, Ratings::StoreId)
                    .to(Stores::Table, Stores::Id)
                    .on_delete(ForeignKeyAction::Cascade)
                )
                .to_owned()
        ).await?;

        // Backs the single-statement upsert in the ratings service.
        manager.create_index(
            Index::create()
                .name("idx_ratings_user_store")
                .table(Ratings::Table)
                .col(Ratings::UserId)
                .col(Ratings::StoreId)
                .unique()
                .if_not_exists()
                .to_owned()
        ).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Ratings::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Stores::Table).to_owned()).await?;
        manager.drop_table(Table::drop().table(Users::Table).to_owned()).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm_migration::sea_orm::{ConnectionTrait, Database, DatabaseBackend, Statement};

    use crate::{Migrator, MigratorTrait};

    #[tokio::test]
    async fn up_and_down_on_sqlite() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        db.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            "INSERT INTO users (username, email, password, role) VALUES ('a', 'a@x.test', 'h', 'normaluser')",
        ))
        .await
        .unwrap();
        let bad_role = db
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "INSERT INTO users (username, email, password, role) VALUES ('b', 'b@x.test', 'h', 'admin')",
            ))
            .await;
        assert!(bad_role.is_err());
        Migrator::down(&db, None).await.unwrap();
    }

    #[tokio::test]
    async fn ratings_are_unique_per_user_and_store() {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        for sql in [
            "INSERT INTO users (username, email, password, role) VALUES ('a', 'a@x.test', 'h', 'normaluser')",
            "INSERT INTO stores (name) VALUES ('Corner Shop')",
            "INSERT INTO ratings (user_id, store_id, rating) VALUES (1, 1, 4)",
        ] {
            db.execute(Statement::from_string(DatabaseBackend::Sqlite, sql))
                .await
                .unwrap();
        }
        let duplicate = db
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "INSERT INTO ratings (user_id, store_id, rating) VALUES (1, 1, 2)",
            ))
            .await;
        assert!(duplicate.is_err());
        let out_of_range = db
            .execute(Statement::from_string(
                DatabaseBackend::Sqlite,
                "UPDATE ratings SET rating = 6 WHERE id = 1",
            ))
            .await;
        assert!(out_of_range.is_err());
    }
}
