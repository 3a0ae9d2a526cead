//! Schema migration CLI, e.g. `cargo run -p migration -- up` or `-- status`.
//! Reads DATABASE_URL like the server does.

use migration::Migrator;
use sea_orm_migration::cli;

#[async_std::main]
async fn main() {
    cli::run_cli(Migrator).await;
}
