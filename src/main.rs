use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use devpulse::{activity, Config, ConfluenceClient, GitHubClient, JiraClient};

#[derive(Parser, Debug)]
#[command(name = "devpulse")]
#[command(version = "0.1.0")]
#[command(about = "Engineering activity metrics across GitHub, Jira, and Confluence")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Output file (defaults to stdout)
    #[arg(short, long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pull request, cycle time, and review metrics for a GitHub user
    Github {
        /// GitHub username, e.g. "alice"
        #[arg(short, long)]
        login: String,

        /// Start of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        from: String,

        /// End of the range, inclusive (YYYY-MM-DD)
        #[arg(long)]
        to: String,

        /// Restrict to "owner/repo" (repeatable)
        #[arg(long = "repo")]
        repos: Vec<String>,
    },
    /// Issue, lead time, and reopened metrics for a Jira user
    Jira {
        /// User email or account id
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Extra JQL clause (project, labels, ...)
        #[arg(long)]
        jql: Option<String>,
    },
    /// Page, comment, and space metrics for a Confluence user
    Confluence {
        /// User email or account id
        #[arg(short, long)]
        user: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,

        /// Restrict to one space key
        #[arg(long)]
        space: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("devpulse=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env();

    let metrics = match &args.command {
        Command::Github {
            login,
            from,
            to,
            repos,
        } => {
            let client = GitHubClient::new(config.github()?, config.timeout_secs)?;
            let repos = (!repos.is_empty()).then_some(repos.as_slice());
            let metrics =
                activity::github::engineer_activity(&client, login, from, to, repos).await?;
            serde_json::to_value(metrics)?
        }
        Command::Jira {
            user,
            from,
            to,
            jql,
        } => {
            let client = JiraClient::new(config.jira()?, config.timeout_secs)?;
            let metrics =
                activity::jira::engineer_activity(&client, user, from, to, jql.as_deref()).await?;
            serde_json::to_value(metrics)?
        }
        Command::Confluence {
            user,
            from,
            to,
            space,
        } => {
            let client = ConfluenceClient::new(config.confluence()?, config.timeout_secs)?;
            let metrics =
                activity::confluence::engineer_activity(&client, user, from, to, space.as_deref())
                    .await?;
            serde_json::to_value(metrics)?
        }
    };

    let rendered = serde_json::to_string_pretty(&metrics)?;
    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            tracing::info!(%path, "metrics written");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}
