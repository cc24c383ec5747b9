use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    DeleteOutcome, DirectoryClient, MutationOutcome, UserStore, DEFAULT_SERVER_URL,
};
use shared::domain::{User, UserFields, UserId};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(about = "Manage the user directory from a terminal")]
struct Cli {
    #[arg(long, env = "USER_DIRECTORY_URL", default_value = DEFAULT_SERVER_URL)]
    server_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print every user.
    List,
    Create {
        #[arg(long)]
        first_name: String,
        #[arg(long)]
        last_name: String,
        #[arg(long)]
        email: String,
    },
    /// Change some fields of a user; omitted fields keep their current value.
    Update {
        id: i64,
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    Delete {
        id: i64,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let client = DirectoryClient::new(&cli.server_url)
        .with_context(|| format!("invalid server url '{}'", cli.server_url))?;

    match cli.command {
        Command::List => {
            let users = client.list_users().await?;
            print!("{}", render_table(&users));
        }
        Command::Create {
            first_name,
            last_name,
            email,
        } => {
            let fields = UserFields::new(first_name, last_name, email);
            expect_applied(client.create_user(&fields).await?)?;
            println!("created {} {}", fields.first_name, fields.last_name);
        }
        Command::Update {
            id,
            first_name,
            last_name,
            email,
        } => {
            let id = UserId(id);
            let users = client.list_users().await?;
            let current = users.iter().find(|user| user.id == id);
            let fields = merge_fields(current, first_name, last_name, email);
            expect_applied(client.update_user(id, &fields).await?)?;
            println!("updated user {id}");
        }
        Command::Delete { id } => {
            let id = UserId(id);
            match client.delete_user(id).await? {
                DeleteOutcome::Deleted => println!("deleted user {id}"),
                DeleteOutcome::Failed { status, message } => bail!(
                    "failed to delete user {id} (HTTP {status}): {}",
                    message.as_deref().unwrap_or("no message")
                ),
            }
        }
    }

    Ok(())
}

fn expect_applied(outcome: MutationOutcome) -> Result<()> {
    match outcome {
        MutationOutcome::Applied => Ok(()),
        MutationOutcome::Rejected { status, message } => bail!("{message} (HTTP {status})"),
    }
}

/// Unknown ids still go out with whatever was given, so the server can answer "User not found".
fn merge_fields(
    current: Option<&User>,
    first_name: Option<String>,
    last_name: Option<String>,
    email: Option<String>,
) -> UserFields {
    let base = current.map(User::fields).unwrap_or_default();
    UserFields {
        first_name: first_name.unwrap_or(base.first_name),
        last_name: last_name.unwrap_or(base.last_name),
        email: email.unwrap_or(base.email),
    }
}

fn render_table(users: &[User]) -> String {
    let headers = ["ID", "First Name", "Last Name", "Email"];
    let rows: Vec<[String; 4]> = users
        .iter()
        .map(|user| {
            [
                user.id.to_string(),
                user.first_name.clone(),
                user.last_name.clone(),
                user.email.clone(),
            ]
        })
        .collect();

    let mut widths = headers.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    let mut push_line = |cells: [&str; 4]| {
        let line: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .collect();
        out.push_str(line.join("  ").trim_end());
        out.push('\n');
    };
    push_line(headers);
    for row in &rows {
        push_line([row[0].as_str(), row[1].as_str(), row[2].as_str(), row[3].as_str()]);
    }
    out
}
