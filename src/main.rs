// Only compile UI module when TUI feature is enabled
#[cfg(feature = "tui")]
mod ui;

use anyhow::{bail, Result};
use clap::{Parser, Subcommand};
use club_directory::{
    telemetry, AppState, BrowseView, Club, ClubRegistry, College, StaticCredentials,
};
use secrecy::SecretString;
use std::io::{self, BufRead, Write};

/// Browse the college club directory
#[derive(Parser)]
#[command(name = "club-directory", version, about = "College club directory")]
struct Args {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print clubs, optionally for one college
    List {
        #[arg(long, help = "GGITS, GGCT or GGCE")]
        college: Option<College>,
    },
    /// Print directory totals
    Stats,
    /// Check admin credentials
    Login {
        #[arg(long)]
        email: String,

        #[arg(long, env = "CLUBS_ADMIN_PASSWORD", hide_env_values = true, hide = true)]
        password: Option<String>,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let args = Args::parse();
    let view = BrowseView::new(ClubRegistry::new());

    match args.command {
        None => run_ui_mode(view)?,
        Some(Command::List { college }) => run_list(&view, college),
        Some(Command::Stats) => run_stats(&view),
        Some(Command::Login { email, password }) => run_login(&email, password)?,
    }

    Ok(())
}

fn print_club(club: &Club) {
    println!("  [{}] {} ({})", club.id, club.name, club.college);
    println!(
        "      founded {} · {} members · {} past events",
        club.founding_year,
        club.member_count,
        club.past_events.len()
    );
    println!("      {}", club.registration_link);
}

fn run_list(view: &BrowseView, college: Option<College>) {
    let colleges: Vec<College> = match college {
        Some(college) => vec![college],
        None => College::ALL.to_vec(),
    };

    for college in colleges {
        println!("\n🏫 {}", college);
        println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

        let mut clubs = view.clubs_for(college).peekable();
        if clubs.peek().is_none() {
            println!("  No clubs yet");
        }
        for club in clubs {
            print_club(&club);
        }
    }
}

fn run_stats(view: &BrowseView) {
    let stats = view.stats();

    println!("📊 Directory totals");
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");
    println!("  Clubs:   {}", stats.total_clubs);
    println!("  Members: {}", stats.total_members);
    println!("  Events:  {}", stats.total_events);
    println!();
    for summary in view.college_summaries() {
        println!("  {:<6} {} clubs", summary.college.as_str(), summary.club_count);
    }
}

fn prompt_password() -> Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn run_login(email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt_password()?,
    };
    let password = SecretString::from(password);

    let mut state = AppState::new();
    match state.login(&StaticCredentials::new(), email, &password) {
        Ok(session) => {
            println!("✅ Signed in as {}", session.email);
            println!("   Admin view: {:?}", state.view);
            Ok(())
        }
        Err(err) => bail!("❌ {}", err),
    }
}

#[cfg(feature = "tui")]
fn run_ui_mode(view: BrowseView) -> Result<()> {
    let mut app = ui::App::new(view);
    ui::run_ui(&mut app)
}

#[cfg(not(feature = "tui"))]
fn run_ui_mode(_view: BrowseView) -> Result<()> {
    bail!(
        "TUI mode not available. Rebuild with --features tui, \
         or use a subcommand (list, stats, login)"
    )
}
