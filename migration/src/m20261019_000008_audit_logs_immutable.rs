//! Reject UPDATE on the audit tables at the database level.
//!
//! Deletes are guarded separately, see `m20261019_000009_audit_logs_delete_guard`.

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DbBackend;

const AUDIT_TABLES: [&str; 2] = ["scan_logs", "inventory_scan_logs"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        match manager.get_database_backend() {
            DbBackend::Postgres => {
                db.execute_unprepared(
                    r#"CREATE OR REPLACE FUNCTION reject_audit_update() RETURNS trigger AS $$
                    BEGIN
                        RAISE EXCEPTION '% rows are immutable', TG_TABLE_NAME;
                    END;
                    $$ LANGUAGE plpgsql"#,
                )
                .await?;
                for table in AUDIT_TABLES {
                    db.execute_unprepared(&format!(
                        "CREATE TRIGGER {table}_immutable BEFORE UPDATE ON {table} \
                         FOR EACH ROW EXECUTE FUNCTION reject_audit_update()"
                    ))
                    .await?;
                }
            }
            DbBackend::Sqlite => {
                for table in AUDIT_TABLES {
                    db.execute_unprepared(&format!(
                        "CREATE TRIGGER IF NOT EXISTS {table}_immutable BEFORE UPDATE ON {table} \
                         BEGIN SELECT RAISE(ABORT, '{table} rows are immutable'); END"
                    ))
                    .await?;
                }
            }
            DbBackend::MySql => {
                for table in AUDIT_TABLES {
                    db.execute_unprepared(&format!(
                        "CREATE TRIGGER {table}_immutable BEFORE UPDATE ON {table} \
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

        for table in AUDIT_TABLES {
            let sql = match backend {
                DbBackend::Postgres => format!("DROP TRIGGER IF EXISTS {table}_immutable ON {table}"),
                _ => format!("DROP TRIGGER IF EXISTS {table}_immutable"),
            };
            db.execute_unprepared(&sql).await?;
        }

        if backend == DbBackend::Postgres {
            db.execute_unprepared("DROP FUNCTION IF EXISTS reject_audit_update()")
                .await?;
        }

        Ok(())
    }
}
