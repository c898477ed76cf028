pub mod api;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod logs;
pub mod models;
pub mod pages;
pub mod render;
pub mod session;
mod utils;
pub mod validation;

use std::{
    io::{self, BufRead, Write},
    path::Path,
    sync::Arc,
};

use anyhow::{anyhow, bail, Context};
use chrono::Utc;
use clap::Parser;

use api::ApiClient;
use catalog::PriceClass;
use cli::{AdminAction, Cli, Commands, CredentialArgs, EventArgs};
use config::Settings;
use error::Error;
use models::{Credentials, RegistrationForm};
use pages::{
    admin::{self, Dashboard, UserAdmin},
    auth::{self, LoginOutcome},
    detail::{self, EventDetail},
    landing::Landing,
    profile::Profile,
    Notice, NoticeKind, PageScope,
};
use render::Renderer;
use session::SessionStore;
use validation::{format_rupiah, validate_photo, EventDraft, PhotoUpload, SessionDraft};

/// Parse the command line, wire settings, session and client, and run the
/// selected page action.
pub async fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logs::init();

    let settings = Settings::from_env(&cli.env)?;
    let session = Arc::new(SessionStore::load(&settings.session_path));
    let api = ApiClient::new(&settings.api_url, settings.http_timeout, session)?;
    let renderer = Renderer::new(&settings.asset_host, settings.timezone);
    tracing::debug!(api = %settings.api_url, "client ready");

    let scope = PageScope::new();
    let watcher = scope.clone();
    tokio::spawn(async move {
        shutdown_signal().await;
        watcher.teardown();
    });

    dispatch(cli.command, &api, &settings, &renderer, &scope).await
}

/// Resolve on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %err, "cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::warn!(error = %err, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => tracing::info!("interrupted; cancelling requests"),
        () = terminate => tracing::info!("terminated; cancelling requests"),
    }
}

async fn dispatch(
    command: Commands,
    api: &ApiClient,
    settings: &Settings,
    renderer: &Renderer,
    scope: &PageScope,
) -> anyhow::Result<()> {
    let now = Utc::now();
    match command {
        Commands::Events(args) => {
            let mut landing = Landing::new(settings.page_size, settings.timezone, scope);
            landing.load(api).await;
            landing.set_filters(args.filters());
            landing.go_to_page(args.page, now);
            println!("{}", renderer.event_grid(&landing.view(now).page));
        }
        Commands::Popular => {
            let mut landing = Landing::new(settings.page_size, settings.timezone, scope);
            landing.load(api).await;
            print!("{}", renderer.popular(&landing.view(now).popular));
        }
        Commands::Show { id } => {
            let detail = EventDetail::load(api, id, scope).await.map_err(explain)?;
            print!("{}", renderer.event_detail(&detail, now));
        }
        Commands::Join { id, form } => {
            let mut detail = EventDetail::load(api, id, scope).await.map_err(explain)?;
            let form = RegistrationForm {
                name: form.name,
                email: form.email,
                phone: form.phone,
                job: form.job,
                payment_method: form.payment_method,
            };
            let notice = detail.register(api, &form, now).await.map_err(explain)?;
            report(renderer, &notice)?;
        }
        Commands::Login(args) => {
            match auth::login(api, &credentials(args), now, scope).await.map_err(explain)? {
                LoginOutcome::SignedIn { route, role } => {
                    println!("signed in as {} ({:?})", role.as_str(), route);
                }
                LoginOutcome::Rejected(notice) => report(renderer, &notice)?,
            }
        }
        Commands::Logout => {
            let route = auth::logout(api).map_err(explain)?;
            println!("signed out ({route:?})");
        }
        Commands::Signup(args) => {
            let notice = auth::sign_up(api, &credentials(args), now, scope)
                .await
                .map_err(explain)?;
            report(renderer, &notice)?;
        }
        Commands::Profile => {
            let profile = Profile::load(api, scope).await.map_err(explain)?;
            print!("{}", renderer.profile(profile.username.as_deref(), &profile.events));
        }
        Commands::Rate { event_id, rating } => {
            let mut profile = Profile::load(api, scope).await.map_err(explain)?;
            let notice = profile
                .submit_rating(api, event_id, rating, now)
                .await
                .map_err(explain)?;
            report(renderer, &notice)?;
            println!("{}", renderer.rating(profile.own_rating()));
        }
        Commands::Unrate { event_id } => {
            let mut profile = Profile::load(api, scope).await.map_err(explain)?;
            profile.select_event(api, event_id).await.map_err(explain)?;
            let notice = profile.delete_rating(api, now).await.map_err(explain)?;
            report(renderer, &notice)?;
        }
        Commands::Admin { action } => run_admin(action, api, renderer, scope).await?,
    }
    Ok(())
}

async fn run_admin(
    action: AdminAction,
    api: &ApiClient,
    renderer: &Renderer,
    scope: &PageScope,
) -> anyhow::Result<()> {
    let now = Utc::now();
    match action {
        AdminAction::Events => {
            let dashboard = Dashboard::load(api, scope).await;
            print!("{}", renderer.admin_events(&dashboard.events));
        }
        AdminAction::DeleteEvent { id, yes } => {
            let mut dashboard = Dashboard::load(api, scope).await;
            dashboard.request_delete(id);
            let Some(event) = dashboard.pending_delete() else {
                bail!("event {id} not found");
            };
            if !yes && !confirm(&format!("Hapus event \"{}\"?", event.name))? {
                dashboard.cancel_delete();
                return Ok(());
            }
            let notice = dashboard.confirm_delete(api, now).await.map_err(explain)?;
            report(renderer, &notice)?;
        }
        AdminAction::CreateEvent(args) => {
            let draft = event_draft(args)?;
            let (notice, _) = admin::create_event(api, &draft, now, scope)
                .await
                .map_err(explain)?;
            report(renderer, &notice)?;
        }
        AdminAction::UpdateEvent { id, event } => {
            let draft = event_draft(event)?;
            let (notice, _) = admin::update_event(api, id, &draft, now, scope)
                .await
                .map_err(explain)?;
            report(renderer, &notice)?;
        }
        AdminAction::Registrants { id } => {
            let list = detail::load_registrants(api, id, scope).await.map_err(explain)?;
            print!("{}", renderer.registrants(&list));
        }
        AdminAction::Categories => {
            for category in admin::categories(api, scope).await {
                println!("{:>5}  {}", category.id, category.name);
            }
        }
        AdminAction::Locations => {
            for location in admin::locations(api, scope).await {
                println!("{:>5}  {}", location.id, location.city);
            }
        }
        AdminAction::Users => {
            let users = UserAdmin::load(api, scope).await;
            print!("{}", renderer.users(&users.users));
        }
        AdminAction::AddUser(args) => {
            let mut users = UserAdmin::load(api, scope).await;
            let notice = users
                .add_user(api, &args.username, &args.password, now)
                .await
                .map_err(explain)?;
            report(renderer, &notice)?;
        }
        AdminAction::DeleteUser { id } => {
            let mut users = UserAdmin::load(api, scope).await;
            let notice = users.delete_user(api, id, now).await.map_err(explain)?;
            report(renderer, &notice)?;
        }
    }
    Ok(())
}

fn credentials(args: CredentialArgs) -> Credentials {
    Credentials {
        username: args.username,
        password: args.password,
    }
}

/// Print a notice; an error notice also fails the command.
fn report(renderer: &Renderer, notice: &Notice) -> anyhow::Result<()> {
    match notice.kind {
        NoticeKind::Success => {
            println!("{}", renderer.notice(notice));
            Ok(())
        }
        NoticeKind::Error => Err(anyhow!(notice.message.clone())),
    }
}

fn explain(err: Error) -> anyhow::Error {
    if err.needs_login() {
        anyhow!("login required: run `event-portal login` first")
    } else {
        err.into()
    }
}

fn confirm(question: &str) -> anyhow::Result<bool> {
    print!("{question} [y/N] ");
    io::stdout().flush()?;
    let mut answer = String::new();
    io::stdin().lock().read_line(&mut answer)?;
    Ok(matches!(answer.trim(), "y" | "Y" | "ya" | "yes"))
}

fn event_draft(args: EventArgs) -> anyhow::Result<EventDraft> {
    let photo = match &args.photo {
        Some(path) => Some(read_photo(path)?),
        None => None,
    };
    let sessions = if args.sessions.is_empty() {
        vec![SessionDraft::default()]
    } else {
        args.sessions
            .iter()
            .map(|raw| parse_session(raw))
            .collect::<anyhow::Result<Vec<_>>>()?
    };
    let price = match PriceClass::of(&args.price) {
        PriceClass::Free => args.price,
        PriceClass::Paid => format_rupiah(&args.price),
    };

    Ok(EventDraft {
        name: args.name,
        description: args.description,
        date_start: args.date_start,
        date_end: args.date_end,
        start_time: args.start_time,
        end_time: args.end_time,
        capacity: Some(args.capacity),
        category_id: Some(args.category_id),
        location_id: args.location_id,
        address: args.address,
        price,
        mode: args.mode,
        link: args.link,
        benefits: args.benefits,
        photo,
        sessions,
    })
}

fn parse_session(raw: &str) -> anyhow::Result<SessionDraft> {
    let parts: Vec<&str> = raw.split('|').map(str::trim).collect();
    match parts.as_slice() {
        [date, time, speaker, location] => Ok(SessionDraft {
            date: date.to_string(),
            time: time.to_string(),
            speaker: speaker.to_string(),
            location: location.to_string(),
        }),
        _ => bail!("session must be `date|time|speaker|location`, got {raw:?}"),
    }
}

fn read_photo(path: &Path) -> anyhow::Result<PhotoUpload> {
    let content_type = match path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    };
    validate_photo(content_type)?;
    let bytes = std::fs::read(path).with_context(|| format!("reading photo {}", path.display()))?;
    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "photo".to_string());
    Ok(PhotoUpload {
        file_name,
        content_type: content_type.to_string(),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_entries_need_four_parts() {
        let session = parse_session("2025-01-10 | 09:00 | Ayu | Hall A").expect("session");
        assert_eq!(session.speaker, "Ayu");
        assert_eq!(session.location, "Hall A");
        assert!(parse_session("2025-01-10|09:00").is_err());
    }

    #[test]
    fn non_image_photos_are_refused_before_reading() {
        let err = read_photo(Path::new("/nonexistent/brief.pdf")).expect_err("pdf refused");
        assert!(err.to_string().contains("image"));
    }

    #[test]
    fn paid_prices_are_formatted() {
        let args = EventArgs {
            name: "Jazz Night".into(),
            description: String::new(),
            date_start: "2025-01-10".into(),
            date_end: None,
            start_time: "19:00".into(),
            end_time: None,
            capacity: 100,
            category_id: 1,
            location_id: Some(2),
            address: "Jl. Braga 1".into(),
            price: "50000".into(),
            mode: validation::EventMode::Offline,
            link: String::new(),
            benefits: String::new(),
            photo: None,
            sessions: Vec::new(),
        };
        let draft = event_draft(args).expect("draft");
        assert_eq!(draft.price, "Rp. 50.000");
        assert_eq!(draft.sessions.len(), 1);
    }
}
