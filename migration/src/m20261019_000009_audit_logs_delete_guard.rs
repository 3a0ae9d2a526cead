//! Reject DELETE on the audit tables while the owning row still exists.
//!
//! Entries go away only with their order or sample, through the foreign-key
//! cascade, which runs once the owner row is already gone.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

/// (audit table, owner table, foreign key column)
const GUARDED: [(&str, &str, &str); 2] = [
    ("scan_logs", "orders", "order_id"),
    ("inventory_scan_logs", "inventory_samples", "sample_id"),
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for (table, owner, fk) in GUARDED {
            match backend {
                DbBackend::Postgres => {
                    db.execute_unprepared(&format!(
                        r#"CREATE OR REPLACE FUNCTION {table}_reject_delete() RETURNS trigger AS $$
                        BEGIN
                            IF EXISTS (SELECT 1 FROM {owner} WHERE id = OLD.{fk}) THEN
                                RAISE EXCEPTION '{table} rows are immutable';
                            END IF;
                            RETURN OLD;
                        END;
                        $$ LANGUAGE plpgsql"#
                    ))
                    .await?;
                    db.execute_unprepared(&format!(
                        "CREATE TRIGGER {table}_no_delete BEFORE DELETE ON {table} \
                         FOR EACH ROW EXECUTE FUNCTION {table}_reject_delete()"
                    ))
                    .await?;
                }
                DbBackend::Sqlite => {
                    db.execute_unprepared(&format!(
                        "CREATE TRIGGER IF NOT EXISTS {table}_no_delete BEFORE DELETE ON {table} \
                         WHEN EXISTS (SELECT 1 FROM {owner} WHERE id = OLD.{fk}) \
                         BEGIN SELECT RAISE(ABORT, '{table} rows are immutable'); END"
                    ))
                    .await?;
                }
                // Cascaded foreign-key deletes do not fire MySQL triggers
                DbBackend::MySql => {
                    db.execute_unprepared(&format!(
                        "CREATE TRIGGER {table}_no_delete BEFORE DELETE ON {table} \
                         FOR EACH ROW SIGNAL SQLSTATE '45000' \
                         SET MESSAGE_TEXT = '{table} rows are immutable'"
                    ))
                    .await?;
                }
            }
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        let backend = manager.get_database_backend();

        for (table, _, _) in GUARDED {
            let sql = match backend {
                DbBackend::Postgres => format!("DROP TRIGGER IF EXISTS {table}_no_delete ON {table}"),
                _ => format!("DROP TRIGGER IF EXISTS {table}_no_delete"),
            };
            db.execute_unprepared(&sql).await?;

            if backend == DbBackend::Postgres {
                db.execute_unprepared(&format!("DROP FUNCTION IF EXISTS {table}_reject_delete()"))
                    .await?;
            }
        }

        Ok(())
    }
}
