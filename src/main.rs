use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use intercambio_console::config::ConsoleConfig;
use intercambio_console::gateway::{HttpProgramGateway, HttpSchoolGateway};
use intercambio_console::services::{Dashboard, DashboardEntry};
use intercambio_console::shell::TracingNotifier;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "intercambio_console=info".to_string()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ConsoleConfig::from_env();
    let user_id: i64 = std::env::var("CONSOLE_USER_ID")
        .ok()
        .and_then(|value| value.parse().ok())
        .ok_or("CONSOLE_USER_ID must be set to the signed-in user's id")?;

    info!(api = %config.api_base_url, user_id, "starting console");

    let schools = Arc::new(HttpSchoolGateway::new(config.api_base_url.as_str()));
    let programs = Arc::new(HttpProgramGateway::new(config.api_base_url.as_str()));

    let mut dashboard = Dashboard::new(schools, programs, Arc::new(TracingNotifier));
    dashboard.load(user_id).await;

    let Some(school) = dashboard.school() else {
        return Err("dashboard load failed; see log output above".into());
    };
    println!("Programs of {} (school {})", school.name, school.id);

    for entry in dashboard.entries() {
        match entry {
            DashboardEntry::Persisted(program) => println!(
                "  [{}] {} — {}, {} — {} seats",
                program.status.as_str(),
                program.title,
                program.city,
                program.country,
                program.available_seats
            ),
            DashboardEntry::Draft(draft) => {
                println!("  [RASCUNHO] {} — {} seats", draft.name, draft.vacancies)
            }
        }
    }

    Ok(())
}
