use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use client_core::{ActionDispatcher, McuClient, PageContext};
use shared::domain::{CookieScope, DeletionKind, FormField, InfoModal, RecordId};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

mod config;
mod terminal;

use config::{load_cookie_jar, load_settings};
use terminal::TerminalPage;

#[derive(Parser, Debug)]
#[command(about = "Clinic check-up registration from the terminal")]
struct Cli {
    #[arg(long)]
    server_url: Option<String>,
    #[arg(long)]
    cookie_jar: Option<std::path::PathBuf>,
    /// Page the action is triggered from; decides where login lands.
    #[arg(long)]
    referrer: Option<String>,
    /// Wait for Enter before acting on a dismissed dialog.
    #[arg(long)]
    wait: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    Login {
        name: String,
        nik: String,
    },
    Register {
        name: String,
        nik: String,
        /// 1 (laki-laki) or 2 (perempuan)
        gender: String,
        address: String,
    },
    Book {
        /// YYYY-MM-DD
        date: String,
        /// pagi, siang or sore
        session: String,
        mcu: String,
        name: String,
    },
    AdminLogin {
        name: String,
        password: String,
    },
    SignOut,
    AdminSignOut,
    Delete {
        #[arg(value_enum)]
        kind: DeleteTarget,
        id: String,
        /// Confirm without prompting.
        #[arg(long)]
        yes: bool,
    },
    SaveMcu {
        name: String,
        detail: String,
    },
    AddMcuData,
    InputMcuData,
    Refresh,
    Info {
        #[arg(value_enum)]
        modal: InfoTarget,
    },
    Cookies,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum DeleteTarget {
    Mcu,
    User,
    Queue,
}

impl From<DeleteTarget> for DeletionKind {
    fn from(value: DeleteTarget) -> Self {
        match value {
            DeleteTarget::Mcu => DeletionKind::Mcu,
            DeleteTarget::User => DeletionKind::User,
            DeleteTarget::Queue => DeletionKind::Queue,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum InfoTarget {
    Registration,
    Checkup,
}

impl Command {
    fn form_fields(&self) -> HashMap<FormField, String> {
        let pairs: Vec<(FormField, &String)> = match self {
            Command::Login { name, nik } => {
                vec![(FormField::Name, name), (FormField::NationalId, nik)]
            }
            Command::Register {
                name,
                nik,
                gender,
                address,
            } => vec![
                (FormField::Name, name),
                (FormField::NationalId, nik),
                (FormField::Gender, gender),
                (FormField::Address, address),
            ],
            Command::Book {
                date,
                session,
                mcu,
                name,
            } => vec![
                (FormField::Date, date),
                (FormField::Session, session),
                (FormField::CheckupType, mcu),
                (FormField::PatientName, name),
            ],
            Command::AdminLogin { name, password } => {
                vec![(FormField::Name, name), (FormField::Password, password)]
            }
            Command::SaveMcu { name, detail } => vec![
                (FormField::McuName, name),
                (FormField::McuHospitalDetail, detail),
            ],
            _ => Vec::new(),
        };
        pairs
            .into_iter()
            .map(|(field, value)| (field, value.clone()))
            .collect()
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(server_url) = cli.server_url.clone() {
        settings.server_url = server_url;
    }
    if let Some(cookie_jar) = cli.cookie_jar.clone() {
        settings.cookie_jar_path = cookie_jar;
    }
    if cli.referrer.is_some() {
        settings.referrer = cli.referrer.clone();
    }
    settings.wait_for_dismissal |= cli.wait;

    let jar = load_cookie_jar(&settings.cookie_jar_path)?;
    if let Command::Cookies = cli.command {
        for line in [
            jar.render(CookieScope::User),
            jar.render(CookieScope::Admin),
        ]
        .into_iter()
        .flatten()
        {
            println!("{line}");
        }
        return Ok(());
    }

    let client = McuClient::new(&settings.server_url)?;
    let page = Arc::new(TerminalPage::new(
        settings.server_url.clone(),
        cli.command.form_fields(),
        settings.referrer.clone(),
        settings.cookie_jar_path.clone(),
        jar,
        settings.wait_for_dismissal,
    ));
    let dispatcher = ActionDispatcher::new(client, page as Arc<dyn PageContext>);

    let failure = match cli.command {
        Command::Login { .. } => dispatcher.login().await.failure().cloned(),
        Command::Register { .. } => dispatcher.register().await.failure().cloned(),
        Command::Book { .. } => dispatcher.book_appointment().await.failure().cloned(),
        Command::AdminLogin { .. } => dispatcher.admin_login().await.failure().cloned(),
        Command::SignOut => {
            dispatcher.sign_out();
            None
        }
        Command::AdminSignOut => {
            dispatcher.admin_sign_out();
            None
        }
        Command::Delete { kind, id, yes } => {
            dispatcher
                .request_deletion(kind.into(), RecordId::new(id))
                .await;
            if yes || confirm_on_stdin().await? {
                dispatcher.confirm_deletion().await.failure().cloned()
            } else {
                dispatcher.cancel_deletion().await;
                None
            }
        }
        Command::SaveMcu { .. } => dispatcher.save_mcu_metadata().await.failure().cloned(),
        Command::AddMcuData => {
            dispatcher.add_mcu_data();
            None
        }
        Command::InputMcuData => {
            dispatcher.input_mcu_data();
            None
        }
        Command::Refresh => {
            dispatcher.refresh_page();
            None
        }
        Command::Info { modal } => {
            dispatcher.open_info_modal(match modal {
                InfoTarget::Registration => InfoModal::RegistrationFlow,
                InfoTarget::Checkup => InfoModal::CheckupResultFlow,
            });
            None
        }
        Command::Cookies => None,
    };

    if let Some(reason) = failure {
        tracing::debug!(%reason, "action did not succeed");
        std::process::exit(1);
    }
    Ok(())
}

async fn confirm_on_stdin() -> Result<bool> {
    println!("Delete this record? [y/N]");
    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await
        .context("failed to read confirmation")?;
    Ok(matches!(line.trim(), "y" | "Y" | "yes"))
}
