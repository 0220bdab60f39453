use anyhow::Result;

use pizzeria_cli::ConsolePrompter;
use pizzeria_cli::session;
use pizzeria_store::Store;

#[tokio::main]
async fn main() -> Result<()> {
    pizzeria_observability::init();

    // Ctrl-C is a normal way to leave the menus, not an error.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("\n\nGoodbye!");
            std::process::exit(0);
        }
    });

    let db_path = std::env::var("PIZZERIA_DB").unwrap_or_else(|_| "pizzeria.db".to_string());
    let store = Store::open(&db_path).await?;
    tracing::info!(db_path, "store opened");

    let mut prompter = ConsolePrompter::new();
    session::run(&store, &mut prompter).await?;

    store.close().await;
    Ok(())
}
