use std::fmt;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use fitbook::api::http::HttpApi;
use fitbook::api::{ApiError, OneTimeSession, ProfileUpdate, RegistrationRequest, RegularClass};
use fitbook::booking;
use fitbook::config::{ClientConfig, ConfigError};
use fitbook::filter::{ListFilter, ModeFilter};
use fitbook::format;
use fitbook::session::{ActionOutcome, Onboarding, SessionController};
use fitbook::store::{FileStore, StoreError};
use fitbook::validate::{self, FieldErrors};
use tracing_subscriber::EnvFilter;

type Session = SessionController<HttpApi, FileStore>;

#[derive(thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Api(#[from] ApiError),
    #[error("session store error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid input: {0}")]
    Invalid(#[from] FieldErrors),
    #[error("{0}")]
    Failed(String),
    #[error("not logged in; run `fitbook login` first")]
    NotLoggedIn,
    #[error("nothing to update; pass at least one field")]
    EmptyUpdate,
    #[error("invalid JSON payload: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

// `main` reports its error through Debug; show the readable message instead.
impl fmt::Debug for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

#[derive(Parser, Debug)]
#[command(name = "fitbook", about = "FitWithJack class and session booking CLI")]
struct Cli {
    #[arg(long, env = "FITBOOK_API_BASE_URL")]
    base_url: Option<String>,

    #[arg(long, env = "FITBOOK_STORE_PATH", help = "Session store file")]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Classes(ClassesCommand),
    Sessions(SessionsCommand),
    Register(RegisterArgs),
    Verify {
        code: String,
        #[arg(long, help = "Defaults to the email registered last")]
        email: Option<String>,
    },
    SetPassword {
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
        #[arg(long, help = "Defaults to the email verified last")]
        email: Option<String>,
    },
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Logout,
    Whoami,
    Profile(ProfileCommand),
}

#[derive(Args, Debug)]
struct ClassesCommand {
    #[command(subcommand)]
    command: ClassesSubcommand,
}

#[derive(Subcommand, Debug)]
enum ClassesSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
    },
    Show {
        id: i64,
    },
    Enrol {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct SessionsCommand {
    #[command(subcommand)]
    command: SessionsSubcommand,
}

#[derive(Subcommand, Debug)]
enum SessionsSubcommand {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = "all", help = "all, online or in-person")]
        mode: ModeFilter,
    },
    Show {
        id: i64,
    },
    Enrol {
        id: i64,
    },
}

#[derive(Args, Debug)]
struct RegisterArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long)]
    last_name: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    phone: String,
    #[arg(long, help = "yyyy-mm-dd")]
    date_of_birth: String,
}

#[derive(Args, Debug)]
struct ProfileCommand {
    #[command(subcommand)]
    command: ProfileSubcommand,
}

#[derive(Subcommand, Debug)]
enum ProfileSubcommand {
    Show {
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    Update {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        phone: Option<String>,
        #[arg(long)]
        height: Option<f64>,
        #[arg(long)]
        weight: Option<f64>,
        #[arg(long)]
        date_of_birth: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = ClientConfig::from_env()?;
    if let Some(base_url) = cli.base_url {
        config.api_base_url = base_url.trim_end_matches('/').to_owned();
    }
    if let Some(store) = cli.store {
        config.store_path = store;
    }

    tracing::debug!(base_url = %config.api_base_url, store = %config.store_path.display(), "client configured");

    let api = HttpApi::from_config(&config)?;
    let store = FileStore::open(config.store_path.clone())?;
    let mut session = SessionController::new(api, store);
    session.initialize().await;

    match cli.command {
        Command::Classes(classes) => run_classes(&session, classes).await,
        Command::Sessions(sessions) => run_sessions(&session, sessions).await,
        Command::Register(args) => run_register(&mut session, args).await,
        Command::Verify { code, email } => {
            let outcome = Onboarding::new(&mut session).verify(email.as_deref(), &code).await;
            report(outcome, "email verified")
        }
        Command::SetPassword { password, confirm, email } => {
            let result = Onboarding::new(&mut session).set_password(email.as_deref(), &password, &confirm).await?;
            report(result.outcome, "password set")?;
            if result.logged_in {
                println!("logged in as {}", display_name(&session));
            } else {
                eprintln!("password set, but automatic login failed; run `fitbook login`");
            }
            Ok(())
        }
        Command::Login { email, password } => {
            validate::login(&email, &password)?;
            report(session.login(email.trim(), &password).await, "")?;
            println!("logged in as {}", display_name(&session));
            Ok(())
        }
        Command::Logout => {
            session.logout();
            println!("logged out");
            Ok(())
        }
        Command::Whoami => {
            if session.is_authenticated() {
                println!("{} ({:?} profile)", display_name(&session), session.state().profile);
            } else {
                println!("not logged in");
            }
            Ok(())
        }
        Command::Profile(profile) => run_profile(&mut session, profile).await,
    }
}

// =============================================================================
// BROWSING
// =============================================================================

async fn run_classes(session: &Session, classes: ClassesCommand) -> Result<(), CliError> {
    match classes.command {
        ClassesSubcommand::List { search } => {
            let all = booking::list_classes(session).await?;
            let filter = ListFilter::new(search, ModeFilter::All);
            let shown = filter.apply(&all);
            for class in &shown {
                println!("{}", class_line(class));
            }
            eprintln!("{} of {} classes", shown.len(), all.len());
            Ok(())
        }
        ClassesSubcommand::Show { id } => {
            let class = booking::get_class(session, id).await?;
            println!("{}", class_line(&class));
            if let Some(description) = class.description.as_deref().or(class.short_description.as_deref()) {
                println!("\n{description}");
            }
            Ok(())
        }
        ClassesSubcommand::Enrol { id } => report(booking::enrol_class(session, id).await, "enrolled"),
    }
}

async fn run_sessions(session: &Session, sessions: SessionsCommand) -> Result<(), CliError> {
    match sessions.command {
        SessionsSubcommand::List { search, mode } => {
            let all = booking::list_sessions(session).await?;
            let filter = ListFilter::new(search, mode);
            let shown = filter.apply(&all);
            for one_off in &shown {
                println!("{}", session_line(one_off));
            }
            eprintln!("{} of {} sessions ({mode})", shown.len(), all.len());
            Ok(())
        }
        SessionsSubcommand::Show { id } => {
            let one_off = booking::get_session(session, id).await?;
            println!("{}", session_line(&one_off));
            if let Some(location) = one_off.location.as_deref() {
                println!("location: {location}");
            }
            if let Some(description) = one_off.description.as_deref().or(one_off.short_description.as_deref()) {
                println!("\n{description}");
            }
            Ok(())
        }
        SessionsSubcommand::Enrol { id } => report(booking::enrol_session(session, id).await, "enrolled"),
    }
}

fn availability(current: u32, max: u32) -> String {
    let status = format::availability_status(current, max);
    format!("{} spots left ({})", format::spots_left(current, max), status.label())
}

fn class_line(class: &RegularClass) -> String {
    format!(
        "{:>5}  {:<32} {:>9}  {}  {}",
        class.id,
        format::truncate_text(&class.name, 32),
        format::format_price(class.price),
        availability(class.current_number, class.max_number),
        class.date_and_time.as_deref().unwrap_or("-"),
    )
}

fn session_line(one_off: &OneTimeSession) -> String {
    let when = match (one_off.date.as_deref(), one_off.time.as_deref()) {
        (Some(date), Some(time)) => format!("{} {}", format::format_date(date), format::format_time(time)),
        (Some(date), None) => format::format_date(date),
        _ => "-".to_owned(),
    };
    format!(
        "{:>5}  {:<32} {:>9}  {}  {}  [{}]",
        one_off.id,
        format::truncate_text(&one_off.name, 32),
        format::format_price(one_off.price),
        availability(one_off.current_number, one_off.max_number),
        when,
        one_off.mode.as_deref().unwrap_or("In-Person"),
    )
}

// =============================================================================
// ACCOUNT
// =============================================================================

async fn run_register(session: &mut Session, args: RegisterArgs) -> Result<(), CliError> {
    let request = RegistrationRequest {
        first_name: args.first_name,
        last_name: args.last_name,
        email: args.email,
        phone_number: args.phone,
        date_of_birth: args.date_of_birth,
    };
    let outcome = Onboarding::new(session).register(&request).await?;
    report(outcome, "registered; check your email for a verification code")
}

async fn run_profile(session: &mut Session, profile: ProfileCommand) -> Result<(), CliError> {
    if !session.is_authenticated() {
        return Err(CliError::NotLoggedIn);
    }
    match profile.command {
        ProfileSubcommand::Show { json } => {
            let Some(user) = session.user() else {
                return Err(CliError::NotLoggedIn);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(user)?);
                return Ok(());
            }
            println!("name:          {}", user.full_name());
            println!("email:         {}", user.email);
            println!("phone:         {}", user.phone_number.as_deref().unwrap_or("-"));
            if let Some(height) = user.height {
                println!("height:        {height}");
            }
            if let Some(weight) = user.weight {
                println!("weight:        {weight}");
            }
            if let Some(dob) = user.date_of_birth.as_deref() {
                println!("date of birth: {}", format::format_date(dob));
            }
            Ok(())
        }
        ProfileSubcommand::Update { first_name, last_name, phone, height, weight, date_of_birth } => {
            let update = ProfileUpdate {
                first_name,
                last_name,
                email: None,
                phone_number: phone,
                height,
                weight,
                date_of_birth,
            };
            if update.is_empty() {
                return Err(CliError::EmptyUpdate);
            }
            validate::profile_update(&update)?;
            report(session.update_profile(&update).await, "profile updated")
        }
    }
}

fn display_name(session: &Session) -> String {
    session.user().map_or_else(|| "unknown user".to_owned(), |user| format!("{} <{}>", user.full_name(), user.email))
}

/// Print a success message, or turn a failure into an exit error.
fn report(outcome: ActionOutcome, fallback: &str) -> Result<(), CliError> {
    match outcome {
        ActionOutcome::Success { message } => {
            match message.as_deref().unwrap_or(fallback) {
                "" => {}
                text => println!("{text}"),
            }
            Ok(())
        }
        ActionOutcome::Failure { error } => Err(CliError::Failed(error)),
    }
}
