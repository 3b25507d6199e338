use log::info;
use todostore_core::db::{open_db, open_db_in_memory};
use todostore_core::init_logging;
use todostore_server::config::ServerConfig;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = ServerConfig::from_env()?;
    init_logging(&config.log_level, config.log_dir.as_deref())?;

    let conn = if config.db_path == ":memory:" {
        open_db_in_memory()?
    } else {
        open_db(&config.db_path)?
    };

    let addr = config.bind_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!(
        "event=server_start module=server status=ok addr={addr} db_path={}",
        config.db_path
    );

    todostore_server::run(listener, conn).await?;
    Ok(())
}
