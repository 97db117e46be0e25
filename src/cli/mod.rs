//! `ssts` command-line front end.

mod live;
pub mod render;

use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::debug;

use crate::api::{ApiClient, ApiError, ProfileUpdate, RegisterRequest, Role, UserProfile};
use crate::auth::{AuthError, AuthSession, TokenStore, TokenStoreError};
use crate::config::{self, AppConfig, ConfigError};
use crate::export::{self, ExportError};
use crate::history::{FeedbackError, HistoryView};
use crate::live::{LiveController, StreamSource, ToastKind};
use crate::organization::{CoachOverview, ManagementOverview, RecentRow};
use crate::profile::{self, PROFILE_UPDATED, ProfileError, ProfileForm};
use crate::shell::{Resolution, landing_route, resolve};
use crate::widgets::DashboardView;

const KNOWN_PATHS: [&str; 9] = [
    "/",
    "/login",
    "/register",
    "/dashboard",
    "/coach-dashboard",
    "/history",
    "/compare",
    "/management-dashboard",
    "/settings",
];

#[derive(Parser, Debug)]
#[command(name = "ssts", version, about = "Smart Sprint Training System client")]
pub struct Cli {
    /// Backend origin, e.g. http://localhost:8000.
    #[arg(long, global = true, env = "SSTS_SERVER")]
    pub server: Option<String>,
    /// Log at debug level.
    #[arg(long, short, global = true, default_value_t = false)]
    pub verbose: bool,
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Sign in and remember the access token.
    Login {
        /// Account email.
        #[arg(long)]
        email: String,
        /// Read from stdin when omitted.
        #[arg(long, env = "SSTS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Forget the stored access token.
    Logout,
    /// Show the signed-in account and its menu.
    Whoami,
    /// Create an account.
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "SSTS_PASSWORD", hide_env_values = true)]
        password: String,
        /// athlete, coach or management.
        #[arg(long, default_value = "athlete")]
        role: String,
    },
    /// Run an interactive live analysis session.
    Live(LiveArgs),
    /// Print the backend's current stats once.
    Stats,
    /// Save the backend's current stats as a history session.
    Save,
    /// Ask the backend for a CSV export and print its link.
    ExportCsv {
        /// Open the link with the system handler.
        #[arg(long, default_value_t = false)]
        open: bool,
    },
    /// Write the PDF report of the current stats.
    Report {
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Session history.
    History {
        #[command(subcommand)]
        command: HistoryCommand,
    },
    /// Coach and management overviews.
    Org {
        #[command(subcommand)]
        command: OrgCommand,
    },
    /// Profile settings.
    Profile {
        #[command(subcommand)]
        command: ProfileCommand,
    },
    /// Show where each page resolves for the current login.
    Routes {
        /// Resolve only this path.
        #[arg(long)]
        path: Option<String>,
    },
}

#[derive(Args, Debug, Default)]
pub struct LiveArgs {
    /// Camera index on the backend host instead of the default webcam.
    #[arg(long, conflicts_with_all = ["file", "url"])]
    pub camera: Option<String>,
    /// Local video to upload and analyse.
    #[arg(long, conflicts_with = "url")]
    pub file: Option<PathBuf>,
    /// Remote video URL the backend reads itself.
    #[arg(long)]
    pub url: Option<String>,
    /// Stop automatically after this many seconds.
    #[arg(long)]
    pub seconds: Option<u64>,
}

impl LiveArgs {
    pub fn source(&self) -> StreamSource {
        if let Some(camera) = &self.camera {
            StreamSource::CustomCamera(camera.clone())
        } else if let Some(file) = &self.file {
            StreamSource::File(Some(file.clone()))
        } else if let Some(url) = &self.url {
            StreamSource::ExternalUrl(url.clone())
        } else {
            StreamSource::DefaultCamera
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum HistoryCommand {
    /// List sessions with the progress chart.
    List {
        /// Another athlete's id (coaches and management).
        #[arg(long)]
        user: Option<i64>,
    },
    /// Export the session table as PDF.
    Pdf {
        #[arg(long)]
        user: Option<i64>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Read or write coach feedback of one session.
    Feedback {
        session: i64,
        /// New notes; prints the current feedback when omitted.
        notes: Option<String>,
        #[arg(long)]
        user: Option<i64>,
    },
}

#[derive(Subcommand, Debug)]
pub enum OrgCommand {
    /// Organization counters and global recent activity.
    Summary,
    /// Recent sessions across athletes.
    Recent,
    /// Athlete roster with recent sessions.
    Athletes,
}

#[derive(Subcommand, Debug)]
pub enum ProfileCommand {
    /// Change profile fields; omitted fields keep their value.
    Update {
        #[arg(long)]
        name: Option<String>,
        /// Centimetres.
        #[arg(long)]
        height: Option<String>,
        /// Kilograms.
        #[arg(long)]
        weight: Option<String>,
        /// 100m personal best, e.g. 10.50s.
        #[arg(long)]
        personal_best: Option<String>,
        #[arg(long, hide_env_values = true, env = "SSTS_NEW_PASSWORD")]
        password: Option<String>,
    },
}

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Store(#[from] TokenStoreError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
    #[error(transparent)]
    Feedback(#[from] FeedbackError),
    #[error("Terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("{0}")]
    Action(String),
}

/// Loaded configuration plus the restored login.
pub struct Context {
    pub config: AppConfig,
    pub session: AuthSession,
}

impl Context {
    pub fn open(server: Option<&str>) -> Result<Self, CliError> {
        let mut config = config::load_or_default()?;
        if let Some(origin) = server {
            config::apply_origin_override(&mut config, origin)?;
        }
        let api = ApiClient::new(&config.server);
        let mut session = AuthSession::new(api, TokenStore::new()?);
        session.init();
        Ok(Self { config, session })
    }

    fn api(&self) -> &ApiClient {
        self.session.api()
    }

    fn identity(&self) -> Result<&UserProfile, CliError> {
        Ok(self.session.require_identity()?)
    }

    fn output_dir(&self, explicit: Option<PathBuf>) -> PathBuf {
        explicit
            .or_else(|| self.config.export.output_dir.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }

    fn controller(&self) -> LiveController<ApiClient> {
        LiveController::new(Arc::new(self.api().clone()), &self.config.live)
    }
}

pub fn run(cli: Cli) -> Result<(), CliError> {
    let mut ctx = Context::open(cli.server.as_deref())?;
    debug!(origin = ctx.api().origin(), "Client ready");
    match cli.command {
        Command::Login { email, password } => login(&mut ctx, &email, password),
        Command::Logout => {
            ctx.session.logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => {
            print_lines(&render::identity(ctx.identity()?));
            Ok(())
        }
        Command::Register {
            name,
            email,
            password,
            role,
        } => {
            let request = RegisterRequest {
                full_name: name,
                email,
                password,
                role: Role::from(role),
            };
            let profile = ctx.session.register(&request)?;
            println!("Registered {} as {}", profile.email, profile.role.label());
            Ok(())
        }
        Command::Live(args) => {
            ctx.identity()?;
            live::run(&ctx, &args)
        }
        Command::Stats => {
            ctx.identity()?;
            let mut controller = ctx.controller();
            if !controller.refresh_snapshot() {
                return Err(CliError::Action("No stats available".into()));
            }
            print_lines(&render::dashboard(&DashboardView::build(&controller)));
            Ok(())
        }
        Command::Save => {
            ctx.identity()?;
            let mut controller = ctx.controller();
            controller.refresh_snapshot();
            controller.save_session();
            finish_with_toast(&controller)
        }
        Command::ExportCsv { open } => {
            ctx.identity()?;
            let mut controller = ctx.controller();
            match controller.export_csv() {
                Some(url) => {
                    println!("{url}");
                    if open {
                        export::open_url(&url)?;
                    }
                    Ok(())
                }
                None => finish_with_toast(&controller),
            }
        }
        Command::Report { out } => {
            let identity = ctx.identity()?.clone();
            let out_dir = ctx.output_dir(out);
            let mut controller = ctx.controller();
            controller.refresh_snapshot();
            controller.export_report(Some(&identity), &out_dir);
            finish_with_toast(&controller)
        }
        Command::History { command } => history(&ctx, command),
        Command::Org { command } => org(&ctx, command),
        Command::Profile { command } => profile_command(&mut ctx, command),
        Command::Routes { path } => {
            let identity = ctx.session.identity();
            let paths: Vec<String> = match path {
                Some(path) => vec![path],
                None => KNOWN_PATHS.iter().map(|path| path.to_string()).collect(),
            };
            for path in paths {
                match resolve(&path, identity) {
                    Resolution::Render(route) => println!("{path} -> render {route:?}"),
                    Resolution::Redirect(target) => println!("{path} -> redirect {target}"),
                }
            }
            Ok(())
        }
    }
}

fn login(ctx: &mut Context, email: &str, password: Option<String>) -> Result<(), CliError> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };
    let profile = ctx.session.login(email, &password)?;
    println!(
        "Logged in as {} ({})",
        profile.display_name(),
        profile.role.label()
    );
    println!("Landing page: {}", landing_route(profile.role).path());
    Ok(())
}

fn history(ctx: &Context, command: HistoryCommand) -> Result<(), CliError> {
    let role = ctx.identity()?.role;
    match command {
        HistoryCommand::List { user } => {
            let view = HistoryView::load(ctx.api(), role, user)?;
            print_lines(&render::history(&view));
        }
        HistoryCommand::Pdf { user, out } => {
            let view = HistoryView::load(ctx.api(), role, user)?;
            let path = export::write_history_report(view.sessions(), &ctx.output_dir(out))?;
            println!("{}", path.display());
        }
        HistoryCommand::Feedback {
            session,
            notes,
            user,
        } => {
            let mut view = HistoryView::load(ctx.api(), role, user)?;
            match notes {
                Some(notes) => {
                    view.update_feedback(ctx.api(), session, &notes)?;
                    println!("Feedback saved");
                }
                None => {
                    let text = view.feedback_text(session).ok_or_else(|| {
                        CliError::Action(format!("Session {session} is not in this history"))
                    })?;
                    println!("{text}");
                }
            }
        }
    }
    Ok(())
}

fn org(ctx: &Context, command: OrgCommand) -> Result<(), CliError> {
    ctx.identity()?;
    match command {
        OrgCommand::Summary => {
            print_lines(&render::management(&ManagementOverview::load(ctx.api())?));
        }
        OrgCommand::Recent => {
            let rows: Vec<_> = ctx
                .api()
                .recent_sessions()?
                .iter()
                .map(RecentRow::from_session)
                .collect();
            print_lines(&render::recent(&rows, "No recent sessions found."));
        }
        OrgCommand::Athletes => {
            print_lines(&render::coach(&CoachOverview::load(ctx.api())?));
        }
    }
    Ok(())
}

fn profile_command(ctx: &mut Context, command: ProfileCommand) -> Result<(), CliError> {
    let ProfileCommand::Update {
        name,
        height,
        weight,
        personal_best,
        password,
    } = command;
    let current = ctx.identity()?.clone();
    let mut form = ProfileForm::from_profile(&current);
    if let Some(name) = name {
        form.full_name = name;
    }
    if let Some(height) = height {
        form.height = height;
    }
    if let Some(weight) = weight {
        form.weight = weight;
    }
    if let Some(best) = personal_best {
        form.personal_best = best;
    }
    let update = ProfileUpdate {
        password: password.filter(|password| !password.is_empty()),
        ..form.changes_from(&current)?
    };
    profile::update_profile(&mut ctx.session, &update)?;
    println!("{PROFILE_UPDATED}");
    Ok(())
}

fn finish_with_toast(controller: &LiveController<ApiClient>) -> Result<(), CliError> {
    match controller.toast() {
        Some(toast) if toast.kind == ToastKind::Error => {
            Err(CliError::Action(toast.message.clone()))
        }
        Some(toast) => {
            println!("{}", toast.message);
            Ok(())
        }
        None => Ok(()),
    }
}

fn prompt(label: &str) -> Result<String, CliError> {
    let mut stdout = std::io::stdout();
    stdout.write_all(label.as_bytes())?;
    stdout.flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{line}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_nested_history_commands() {
        let cli = Cli::try_parse_from([
            "ssts",
            "--server",
            "http://coach.local:8000",
            "history",
            "feedback",
            "12",
            "Drive the arms",
            "--user",
            "4",
        ])
        .unwrap();
        assert_eq!(cli.server.as_deref(), Some("http://coach.local:8000"));
        match cli.command {
            Command::History {
                command:
                    HistoryCommand::Feedback {
                        session,
                        notes,
                        user,
                    },
            } => {
                assert_eq!(session, 12);
                assert_eq!(notes.as_deref(), Some("Drive the arms"));
                assert_eq!(user, Some(4));
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn live_source_from_flags() {
        let cli = Cli::try_parse_from(["ssts", "live", "--camera", "2"]).unwrap();
        let Command::Live(args) = cli.command else {
            panic!("expected live");
        };
        assert_eq!(args.source(), StreamSource::CustomCamera("2".into()));
        assert_eq!(LiveArgs::default().source(), StreamSource::DefaultCamera);
        assert!(Cli::try_parse_from(["ssts", "live", "--camera", "2", "--url", "x"]).is_err());
    }

    #[test]
    fn verbose_raises_log_level() {
        let cli = Cli::try_parse_from(["ssts", "-v", "whoami"]).unwrap();
        assert_eq!(cli.log_level(), "debug");
    }
}
