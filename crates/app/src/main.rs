//! LaunchBI - lead analytics dashboard core
//!
//! Thin CLI consumer of the core: wires the state store, the selection
//! service and the lead feed together, then renders one dashboard snapshot
//! as text. Any richer presentation layer talks to exactly the same
//! services.
//!
//! ```text
//! launchbi                          render the dashboard for the active pair
//! launchbi projects                 list projects and the active selection
//! launchbi create <name> <camps>    create a project (comma-separated list)
//! launchbi edit <id> <name> <camps> rename a project / replace its campaigns
//! launchbi credentials <id> <act> <token>
//! launchbi select <id> [campaign]   switch project (and optionally campaign)
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use launchbi_core::{metrics, LeadFeed, SelectionService, StateStore};
use launchbi_domain::{Config, DashboardMetrics, LaunchBiError, Result, SelectionState};
use launchbi_infra::{DbManager, StateRepository, WebhookLeadClient};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging FIRST so we can see .env loading
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env file; using process environment"),
    }

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "launchbi failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<()> {
    let config = launchbi_infra::config::load();

    let db = Arc::new(DbManager::new(&config.database.path, config.database.pool_size)?);
    db.run_migrations()?;
    let store: Arc<dyn StateStore> = Arc::new(StateRepository::new(db));

    let mut selection = SelectionService::load(store).await?;

    let args: Vec<String> = std::env::args().skip(1).collect();
    let args: Vec<&str> = args.iter().map(String::as_str).collect();

    match args.as_slice() {
        [] | ["snapshot"] => render_dashboard(&selection, &config).await,
        ["projects"] => {
            render_projects(selection.state());
            Ok(())
        }
        ["create", name, campaigns] => {
            let id = selection.create_project(name, campaigns).await?;
            println!("project {id} created and selected");
            render_projects(selection.state());
            Ok(())
        }
        ["edit", id, name, campaigns] => {
            let id = parse_id(id)?;
            selection.edit_project(id, name, campaigns).await?;
            println!("project {id} updated");
            render_projects(selection.state());
            Ok(())
        }
        ["credentials", id, account, token] => {
            let id = parse_id(id)?;
            selection
                .set_ad_credentials(id, Some((*account).to_string()), Some((*token).to_string()))
                .await?;
            println!("ad credentials stored for project {id}");
            Ok(())
        }
        ["select", id, rest @ ..] => {
            let id = parse_id(id)?;
            selection.select_project(id).await?;
            if let [campaign] = rest {
                selection.select_campaign(campaign).await?;
            }
            render_dashboard(&selection, &config).await
        }
        other => Err(LaunchBiError::Validation(format!("unknown command: {}", other.join(" ")))),
    }
}

fn parse_id(raw: &str) -> Result<i64> {
    raw.parse::<i64>()
        .map_err(|_| LaunchBiError::Validation(format!("'{raw}' is not a project id")))
}

/// Fetch the active pair's leads and print the derived metrics.
async fn render_dashboard(selection: &SelectionService, config: &Config) -> Result<()> {
    let source = Arc::new(WebhookLeadClient::new(&config.webhook)?);
    let feed = LeadFeed::new(source);

    let key = selection.selection_key();
    feed.refresh(&key).await;
    let snapshot = feed.snapshot();
    let dashboard = metrics::dashboard(&snapshot.leads, config.dashboard.investment);

    let state = selection.state();
    let project =
        state.current_project().map_or("?", |p| p.name.as_str());
    println!("== {project} / {} ==", state.active_campaign);
    render_metrics(&dashboard);

    for lead in &snapshot.leads {
        println!(
            "  {:<30} {:<14} {:>5}",
            lead.email.as_deref().unwrap_or("(sem email)"),
            lead.cidade.as_deref().unwrap_or("Não id."),
            lead.score_ia.map_or_else(|| "--".to_string(), |s| format!("{s:.1}")),
        );
    }
    Ok(())
}

fn render_metrics(m: &DashboardMetrics) {
    println!("leads na campanha : {}", m.total);
    println!("taxa de resposta  : {}% ({} respondentes)", m.response_rate, m.respondents);
    println!("aprovados         : {}", m.qualified);
    println!("custo por lead    : R$ {:.2} (investimento R$ {:.2})", m.cost_per_lead, m.investment);
    println!("genero            : {} M / {} F", m.gender.masculino, m.gender.feminino);
    println!("renda             : {} na faixa 2 a 5 / {} outros", m.income.faixa_2_a_5, m.income.outros);
    println!("trafego           : {} ADS / {} Player", m.traffic.ads, m.traffic.player);
    println!("dispositivo       : {} desktop / {} mobile", m.devices.desktop, m.devices.mobile);

    let peak = m.hourly.iter().enumerate().max_by_key(|(_, count)| **count);
    if let Some((hour, count)) = peak {
        if *count > 0 {
            println!("pico de entrada   : {hour}h ({count} leads)");
        }
    }
}

fn render_projects(state: &SelectionState) {
    for project in &state.projects {
        let marker = if project.id == state.current_project_id { "*" } else { " " };
        let traffic = if project.has_ad_credentials() { "meta ads ok" } else { "sem credenciais" };
        println!("{marker} [{}] {} ({}) - {}", project.id, project.name, traffic, project.campaigns.join(", "));
    }
    println!("campanha ativa: {}", state.active_campaign);
}
