// roster-client/examples/list_demo.rs
// Drive the employee list against an endpoint
//
// Usage:
//   cargo run -p roster-client --example list_demo                # ROSTER_ENDPOINT
//   cargo run -p roster-client --example list_demo -- --mock "An"  # in-process mock

use roster_client::{
    ClientConfig, DraftField, EmployeeGateway, EmployeeListController, InProcessGateway,
};
use roster_mock::{AppState, EmployeeStore};
use shared::SortField;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "roster_client=debug,list_demo=info".into()),
        )
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let use_mock = args.iter().any(|a| a == "--mock");
    let filter = args
        .iter()
        .find(|a| !a.starts_with("--"))
        .cloned()
        .unwrap_or_default();

    let config = ClientConfig::from_env();
    config.validate()?;

    if use_mock {
        let state = AppState::new(EmployeeStore::seeded(config.key_scheme), config.token.clone());
        let mut gateway = InProcessGateway::new(roster_mock::router(state), config.key_scheme);
        if let Some(token) = &config.token {
            gateway.set_token(token);
        }
        run(EmployeeListController::new(gateway, &config), &filter).await
    } else {
        tracing::info!(endpoint = %config.endpoint, "Using remote endpoint");
        run(EmployeeListController::new(config.build_gateway()?, &config), &filter).await
    }
}

async fn run<G: EmployeeGateway>(
    mut list: EmployeeListController<G>,
    filter: &str,
) -> anyhow::Result<()> {
    list.start();
    list.set_filter_text(filter);
    list.set_sort(SortField::UserName);
    list.settle().await;
    print_page(&list);

    if let Some(first) = list.records().first().cloned() {
        list.open_for_edit(&first);
        list.update_draft_field(DraftField::Phone, "555-0000")?;
        list.save()?;
        list.settle().await;
        if let Some(err) = list.mutation_error() {
            tracing::warn!("{err}");
        }
        print_page(&list);
    }

    println!("{}", serde_json::to_string_pretty(&list.snapshot())?);
    Ok(())
}

fn print_page<G: EmployeeGateway>(list: &EmployeeListController<G>) {
    if let Some(err) = list.error() {
        println!("! {err}");
    }
    println!(
        "-- sorted by {} {}, filter {:?}",
        list.sort_field(),
        list.sort_direction(),
        list.filter_text()
    );
    for r in list.records() {
        println!(
            "{:<20} {:<12} {:<24} {}",
            r.name,
            r.user_name,
            r.email.as_deref().unwrap_or("-"),
            r.phone.as_deref().unwrap_or("-")
        );
    }
}
