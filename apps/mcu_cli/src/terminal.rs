//! Terminal rendition of the clinic pages: dialogs and alerts go to stdout,
//! cookies live in a JSON jar on disk.

use std::{collections::HashMap, path::PathBuf, sync::Mutex, time::Duration};

use async_trait::async_trait;
use client_core::{CookieJar, Dialog, DialogIcon, PageContext};
use shared::{
    domain::{BookingSession, CookieScope, FormField, Modal},
    protocol::QueueTicket,
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};

use crate::config::save_cookie_jar;

pub struct TerminalPage {
    base_url: String,
    fields: HashMap<FormField, String>,
    referrer: Option<String>,
    jar_path: PathBuf,
    jar: Mutex<CookieJar>,
    wait_for_dismissal: bool,
}

impl TerminalPage {
    pub fn new(
        base_url: impl Into<String>,
        fields: HashMap<FormField, String>,
        referrer: Option<String>,
        jar_path: PathBuf,
        jar: CookieJar,
        wait_for_dismissal: bool,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            fields,
            referrer,
            jar_path,
            jar: Mutex::new(jar),
            wait_for_dismissal,
        }
    }

    fn update_jar(&self, update: impl FnOnce(&mut CookieJar)) {
        let Ok(mut jar) = self.jar.lock() else {
            error!("cookie jar lock poisoned");
            return;
        };
        update(&mut jar);
        if let Err(err) = save_cookie_jar(&self.jar_path, &jar) {
            error!(error = %format!("{err:#}"), "failed to persist cookie jar");
        }
    }
}

#[async_trait]
impl PageContext for TerminalPage {
    fn field(&self, field: FormField) -> String {
        self.fields.get(&field).cloned().unwrap_or_default()
    }

    fn referrer(&self) -> Option<String> {
        self.referrer.clone()
    }

    fn set_cookie(&self, scope: CookieScope, token: &str) {
        self.update_jar(|jar| jar.set(scope, token));
        info!(path = scope.path(), "cookie written");
    }

    fn clear_cookie(&self, scope: CookieScope) {
        self.update_jar(|jar| {
            jar.clear(scope);
        });
        info!(path = scope.path(), "cookie cleared");
    }

    fn cookie_header(&self, path: &str) -> Option<String> {
        self.jar.lock().ok().and_then(|jar| jar.header_for(path))
    }

    async fn show_dialog(&self, dialog: Dialog) {
        let marker = match dialog.icon {
            DialogIcon::Success => "✔",
            DialogIcon::Error => "✘",
        };
        println!("{marker} {}", dialog.title);
        if !dialog.text.is_empty() {
            println!("  {}", dialog.text);
        }

        if self.wait_for_dismissal {
            println!("  [press Enter to dismiss]");
            let mut line = String::new();
            if let Err(err) = BufReader::new(tokio::io::stdin()).read_line(&mut line).await {
                warn!(error = %err, "could not read dialog dismissal from stdin");
            }
        }
    }

    fn alert(&self, message: &str) {
        println!("alert: {message}");
    }

    fn redirect(&self, path: &str) {
        println!("-> {}{path}", self.base_url.trim_end_matches('/'));
    }

    fn reload(&self) {
        println!("-> reload");
    }

    fn schedule_reload(&self, delay: Duration) {
        println!("-> reload in {} ms", delay.as_millis());
    }

    fn show_queue_ticket(&self, ticket: &QueueTicket) {
        println!("Nomor antrian : {}", ticket.queue_number);
        println!("Tanggal       : {}", ticket.date);
        println!("Hari          : {}", ticket.weekday);
        println!("Sesi          : {}", ticket.session);
        println!("Jam           : {}", ticket.time);
        if let Some(session) = BookingSession::from_form_value(&ticket.session) {
            let (opens, closes) = session.window();
            println!("Jam layanan   : {opens} - {closes}");
        }
        println!("[{}] open", Modal::BookingResult.element_id());
    }

    fn set_modal_visible(&self, modal: Modal, visible: bool) {
        let state = if visible { "open" } else { "closed" };
        println!("[{}] {state}", modal.element_id());
    }

    fn log_console(&self, message: &str) {
        eprintln!("console: {message}");
    }
}
