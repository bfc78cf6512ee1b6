use hostel_gate::{
    bot,
    config::{database, hostel, logging},
    core::student,
    errors::{Error, Result},
};
use std::env;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Load .env file first so RUST_LOG can come from it; env vars can also be set externally
    let dotenv_result = logging::load_dotenv();

    // 2. Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(logging::log_filter())
        .init();
    match dotenv_result {
        Ok(path) => info!("Loaded environment from {}", path.display()),
        Err(e) => info!("No .env file loaded: {}", e),
    }

    // 3. Load hostel configuration (student directory seed and staff roles)
    let hostel_config = hostel::load_default_config()
        .inspect_err(|e| error!("Failed to load hostel configuration: {}", e))?;
    info!(
        "Loaded configuration with {} students, {} admins, {} gate staff.",
        hostel_config.students.len(),
        hostel_config.staff.admin_user_ids.len(),
        hostel_config.staff.gate_user_ids.len()
    );

    // 4. Connect to the database and ensure the schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|_| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to initialize database: {}", e))?;

    // 5. Seed the student directory
    student::seed_students(&db, &hostel_config.students)
        .await
        .inspect(|_| info!("Student directory seeded successfully."))
        .inspect_err(|e| error!("Failed to seed students: {}", e))?;

    // 6. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, hostel_config.staff, db).await
}
