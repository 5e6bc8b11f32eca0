use std::io;

use clap::{Parser, Subcommand};
use colored::*;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use crate::{
    api::{PortalApi, http::HttpPortalApi},
    config::Config,
    models::{area::Area, draft::RegistrationDraft},
    services::{
        areas::find_area,
        gate::{Decision, Destination, can_enter},
        registration::{RegistrationFlow, SubmitOutcome},
        results::{LoadStatus, ResultsAggregator},
        session::{LoginError, LoginParameters, SessionStore, login, logout},
        validation::Field,
    },
    storage::{Storage, json::JsonFileStorage},
};

mod api;
mod config;
mod models;
mod services;
mod storage;
mod ui;

#[derive(Parser)]
#[command(
    name = "registro",
    about = "Register people into areas and follow the head count from your terminal"
)]
struct Cli {
    #[command(flatten)]
    config: Config,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start a session
    Login { name: String },

    /// End the current session
    Logout,

    /// Show who is logged in
    Whoami,

    /// List the areas people can be registered into
    Areas,

    /// Register a person (prompts for missing fields on a terminal)
    Register {
        /// Full name
        #[arg(short, long)]
        name: Option<String>,

        /// Email address
        #[arg(short, long)]
        email: Option<String>,

        /// Area id, name or slug (e.g. "2", "TI", "tecnologia")
        #[arg(short, long)]
        area: Option<String>,

        /// Stay here instead of opening the results afterwards
        #[arg(long)]
        no_redirect: bool,
    },

    /// Show how many people are registered per area
    Results,

    /// List registered people
    Personas,

    /// Check that the service is reachable
    Health,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if let Err(e) = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init()
    {
        eprintln!("Warning: tracing init failed: {}", e);
    }
}

fn build_api(config: &Config) -> HttpPortalApi {
    let base = config.api_base().unwrap_or_else(|e| {
        ui::render_error(&e.to_string());
        std::process::exit(1);
    });
    let timeout = config.timeout().unwrap_or_else(|e| {
        ui::render_error(&e.to_string());
        std::process::exit(1);
    });
    HttpPortalApi::new(base, timeout).unwrap_or_else(|e| {
        ui::render_error(&format!("Failed to build HTTP client: {}", e));
        std::process::exit(1);
    })
}

/// Runs the gate for one navigation attempt and acts on its decision
fn enter<S: Storage>(destination: Destination, session: &SessionStore<S>) -> bool {
    match can_enter(destination.path(), session) {
        Decision::Allow => true,
        Decision::Redirect(path) => {
            ui::render_error(&format!(
                "You need to be logged in to open {}",
                destination.path()
            ));
            ui::render_hint(&format!(
                "Go to {} with: {}",
                path,
                Destination::Login.command()
            ));
            false
        }
    }
}

/// Areas are optional for registering: numeric ids still work without them
async fn load_areas(api: &impl PortalApi) -> Vec<Area> {
    match api.list_areas().await {
        Ok(areas) => areas,
        Err(e) => {
            warn!(error = %e, "areas could not be loaded");
            ui::render_error("Areas could not be loaded. Please try again.");
            vec![]
        }
    }
}

fn ask(label: &str) -> Option<String> {
    match ui::prompt(label) {
        Ok(answer) => answer,
        Err(e) => {
            warn!(error = %e, "prompt failed");
            None
        }
    }
}

/// Returns `false` when input ended before the field was filled
fn prompt_field(flow: &mut RegistrationFlow, field: Field, areas: &[Area]) -> bool {
    match field {
        Field::Name => ask("Full name").map(|v| flow.set_name(v)).is_some(),
        Field::Email => ask("Email").map(|v| flow.set_email(v)).is_some(),
        Field::Area => {
            if !areas.is_empty() {
                ui::render_areas(areas);
            }
            ask("Area (id or name)")
                .map(|v| flow.select_area(&v, areas))
                .is_some()
        }
    }
}

fn prompt_missing_fields(flow: &mut RegistrationFlow, areas: &[Area]) -> bool {
    let draft = flow.draft().clone();
    let missing = [
        (Field::Name, draft.name.trim().is_empty()),
        (Field::Email, draft.email.trim().is_empty()),
        (Field::Area, draft.area_id.is_none()),
    ];

    missing
        .into_iter()
        .filter(|(_, is_missing)| *is_missing)
        .all(|(field, _)| prompt_field(flow, field, areas))
}

async fn run_register<S: Storage>(
    api: &impl PortalApi,
    session: &SessionStore<S>,
    draft: RegistrationDraft,
    raw_area: Option<String>,
    no_redirect: bool,
    interactive: bool,
) -> bool {
    let areas = load_areas(api).await;

    let mut flow = RegistrationFlow::with_draft(draft);
    if let Some(raw) = raw_area {
        flow.select_area(&raw, &areas);
    }

    if interactive && !prompt_missing_fields(&mut flow, &areas) {
        return false;
    }

    loop {
        match flow.submit(api).await {
            SubmitOutcome::Ignored => {
                warn!(state = ?flow.state(), "submission ignored");
                return false;
            }
            SubmitOutcome::Invalid(violation) => {
                ui::render_error(flow.error_message().unwrap_or_default());
                if !interactive || !prompt_field(&mut flow, violation.field(), &areas) {
                    return false;
                }
            }
            SubmitOutcome::Failed(_) => {
                ui::render_error(flow.error_message().unwrap_or_default());
                let retry = interactive && ui::confirm("Try again?").unwrap_or(false);
                if !retry {
                    return false;
                }
            }
            SubmitOutcome::Succeeded {
                message,
                persona,
                redirect,
            } => {
                ui::render_success(flow.success_message().unwrap_or(&message));
                if let Some(persona) = persona {
                    let area_name = find_area(&areas, persona.area_id)
                        .map(|area| area.name.clone())
                        .unwrap_or_else(|| format!("area #{}", persona.area_id));
                    println!(
                        "  {} <{}> · {}",
                        persona.name.bold(),
                        persona.email,
                        area_name.blue()
                    );
                }

                if no_redirect {
                    return true;
                }

                println!(
                    "\n  {}",
                    format!(
                        "Opening {} in {} seconds...",
                        redirect.destination().path(),
                        redirect.delay().as_secs()
                    )
                    .dimmed()
                );
                let destination = redirect.wait().await;
                if !enter(destination, session) {
                    return false;
                }
                return run_results(api, interactive).await;
            }
        }
    }
}

async fn run_results(api: &impl PortalApi, interactive: bool) -> bool {
    let mut aggregator = ResultsAggregator::new();
    aggregator.load(api).await;

    loop {
        if let Some(snapshot) = aggregator.snapshot() {
            ui::render_results(snapshot);
        }

        match aggregator.status().clone() {
            LoadStatus::Loaded => return true,
            LoadStatus::LoadFailed(_) => {
                ui::render_error(aggregator.error_message().unwrap_or_default());
                let retry = interactive && ui::confirm("Reload?").unwrap_or(false);
                if !retry {
                    return false;
                }
                aggregator.reload(api).await;
            }
            LoadStatus::NotLoaded | LoadStatus::Loading => return false,
        }
    }
}

async fn run_personas(api: &impl PortalApi) -> bool {
    match api.list_personas().await {
        Ok(personas) => {
            let areas = load_areas(api).await;
            ui::render_personas(&personas, &areas);
            true
        }
        Err(e) => {
            warn!(error = %e, "personas could not be loaded");
            ui::render_error("People could not be loaded. Check that the backend is running.");
            false
        }
    }
}

fn render_home<S: Storage>(session: &SessionStore<S>) {
    ui::render_view_header("REGISTRO", None);
    match session.get() {
        Ok(Some(user_name)) => println!("  Logged in as {}\n", user_name.bold()),
        _ => println!(
            "  Not logged in. Start with: {}\n",
            Destination::Login.command()
        ),
    }
    for destination in Destination::ALL {
        let marker = if destination.is_protected() {
            "login required".dimmed()
        } else {
            "".normal()
        };
        println!(
            "  {:<13} {:<24} {}",
            destination.path(),
            destination.command(),
            marker
        );
    }
    println!();
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    init_tracing();

    let cli = Cli::parse();
    let session = SessionStore::new(JsonFileStorage::new(cli.config.session_path()));

    let ok = match cli.command {
        None => {
            render_home(&session);
            true
        }
        Some(Commands::Login { name }) => {
            match login(&session, LoginParameters { user_name: name }) {
                Ok(user_name) => {
                    ui::render_success(&format!("Logged in as {}", user_name));
                    true
                }
                Err(LoginError::BlankUserName) => {
                    ui::render_error("User name cannot be blank");
                    false
                }
                Err(LoginError::Storage(e)) => {
                    ui::render_error(&format!("Failed to save session: {}", e));
                    false
                }
            }
        }
        Some(Commands::Logout) => match logout(&session) {
            Ok(Some(user_name)) => {
                ui::render_success(&format!("Logged out {}", user_name));
                true
            }
            Ok(None) => {
                println!("Nobody was logged in");
                true
            }
            Err(e) => {
                ui::render_error(&format!("Failed to clear session: {}", e));
                false
            }
        },
        Some(Commands::Whoami) => match session.get() {
            Ok(Some(user_name)) => {
                let since = session
                    .logged_in_at()
                    .ok()
                    .flatten()
                    .map(|ts| format!(" since {}", ui::format_login_instant(ts)))
                    .unwrap_or_default();
                println!("{}{}", user_name.bold(), since.dimmed());
                true
            }
            Ok(None) => {
                println!("Not logged in");
                true
            }
            Err(e) => {
                ui::render_error(&format!("Failed to read session: {}", e));
                false
            }
        },
        Some(Commands::Areas) => {
            let api = build_api(&cli.config);
            match api.list_areas().await {
                Ok(areas) => {
                    ui::render_areas(&areas);
                    true
                }
                Err(e) => {
                    warn!(error = %e, "areas could not be loaded");
                    ui::render_error("Areas could not be loaded. Please try again.");
                    false
                }
            }
        }
        Some(Commands::Register {
            name,
            email,
            area,
            no_redirect,
        }) => {
            if enter(Destination::Registro, &session) {
                let api = build_api(&cli.config);
                let draft = RegistrationDraft::new(
                    name.unwrap_or_default(),
                    email.unwrap_or_default(),
                    None,
                );
                run_register(
                    &api,
                    &session,
                    draft,
                    area,
                    no_redirect,
                    ui::is_interactive(),
                )
                .await
            } else {
                false
            }
        }
        Some(Commands::Results) => {
            if enter(Destination::Resultados, &session) {
                let api = build_api(&cli.config);
                run_results(&api, ui::is_interactive()).await
            } else {
                false
            }
        }
        Some(Commands::Personas) => {
            if enter(Destination::Personas, &session) {
                let api = build_api(&cli.config);
                run_personas(&api).await
            } else {
                false
            }
        }
        Some(Commands::Health) => {
            let api = build_api(&cli.config);
            match api.health().await {
                Ok(health) => {
                    let service = health.service.unwrap_or_else(|| String::from("service"));
                    ui::render_success(&format!("{} is {}", service, health.status));
                    true
                }
                Err(e) => {
                    ui::render_error(&e.to_string());
                    false
                }
            }
        }
    };

    if !ok {
        std::process::exit(1);
    }
}
