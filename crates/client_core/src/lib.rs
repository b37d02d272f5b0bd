use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use shared::{
    domain::{
        routes, BookingSession, CookieScope, DeletionKind, FormField, Gender, InfoModal, Modal,
        RecordId,
    },
    error::{ActionResult, FailureReason},
    protocol::{
        AdminCredentials, AdminGrant, AppointmentRequest, Credentials, LoginGrant, McuMetadata,
        QueueTicket, RegistrationForm, RegistrationReceipt,
    },
};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

pub mod session;
pub mod transport;

pub use session::CookieJar;
pub use transport::McuClient;

/// Delay before the page reloads after a user record is deleted.
pub const USER_DELETION_RELOAD_DELAY: Duration = Duration::from_millis(3800);

const LOGIN_OK_TITLE: &str = "Berhasil melakukan login!";
const LOGIN_FAILED_TITLE: &str = "Gagal melakukan login!";
const REGISTER_OK_TITLE: &str = "Berhasil melakukan registrasi!";
const REGISTER_FAILED_TITLE: &str = "Gagal melakukan registrasi!";
const BOOKING_FAILED_TITLE: &str = "Gagal melakukan pendaftaran!";
const DELETED_TITLE: &str = "Deleted!";
const DELETED_TEXT: &str = "MCU deleted successfully.";
const ADMIN_LOGIN_OK_ALERT: &str = "Admin Login Berhasil";
const SIGNED_OUT_ALERT: &str = "Signed out!";
const MCU_SAVED_ALERT: &str = "Data berhasil disimpan";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogIcon {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub text: String,
    pub icon: DialogIcon,
}

impl Dialog {
    pub fn success(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            icon: DialogIcon::Success,
        }
    }

    pub fn error(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            icon: DialogIcon::Error,
        }
    }
}

/// Everything an action may touch on the hosting page. Implemented by the
/// browser shim, the terminal front-end, and recording mocks in tests.
#[async_trait]
pub trait PageContext: Send + Sync {
    fn field(&self, field: FormField) -> String;
    fn referrer(&self) -> Option<String>;
    fn set_cookie(&self, scope: CookieScope, token: &str);
    fn clear_cookie(&self, scope: CookieScope);
    /// `Cookie` header the page would send for `path`.
    fn cookie_header(&self, _path: &str) -> Option<String> {
        None
    }
    /// Resolves once the user dismisses the dialog.
    async fn show_dialog(&self, dialog: Dialog);
    fn alert(&self, message: &str);
    fn redirect(&self, path: &str);
    fn reload(&self);
    fn schedule_reload(&self, delay: Duration);
    /// Fills the booking results panel and opens its modal.
    fn show_queue_ticket(&self, ticket: &QueueTicket);
    fn set_modal_visible(&self, modal: Modal, visible: bool);
    fn log_console(&self, message: &str);
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDeletion {
    pub kind: DeletionKind,
    pub id: RecordId,
}

/// Binds each page action to one request and one presentation outcome.
pub struct ActionDispatcher {
    client: McuClient,
    page: Arc<dyn PageContext>,
    pending_deletion: Mutex<Option<PendingDeletion>>,
}

impl ActionDispatcher {
    pub fn new(client: McuClient, page: Arc<dyn PageContext>) -> Self {
        Self {
            client,
            page,
            pending_deletion: Mutex::new(None),
        }
    }

    pub async fn login(&self) -> ActionResult<LoginGrant> {
        let credentials = Credentials {
            name: self.page.field(FormField::Name),
            national_id: self.page.field(FormField::NationalId),
        };
        debug!(action = "login", name = %credentials.name, "dispatching");

        let outcome = self
            .client
            .login(&credentials, self.page.cookie_header(routes::LOGIN))
            .await;
        match &outcome {
            ActionResult::Success(grant) => {
                self.page.set_cookie(CookieScope::User, &grant.token);
                info!(scope = ?CookieScope::User, "stored session token");
                self.page
                    .show_dialog(Dialog::success(
                        LOGIN_OK_TITLE,
                        grant.message.clone().unwrap_or_default(),
                    ))
                    .await;
                self.page.redirect(self.post_login_target());
            }
            ActionResult::Failure(reason) => {
                let reload = matches!(reason, FailureReason::TransportRejected { .. });
                self.report_failure("login", LOGIN_FAILED_TITLE, reason, reload)
                    .await;
            }
        }
        outcome
    }

    /// `/akun` when the user arrived from the login page, else the booking page.
    pub fn post_login_target(&self) -> &'static str {
        let came_from_login = self
            .page
            .referrer()
            .map(|referrer| referrer_path(&referrer).contains(routes::LOGIN))
            .unwrap_or(false);
        if came_from_login {
            routes::ACCOUNT
        } else {
            routes::BOOKING
        }
    }

    pub async fn register(&self) -> ActionResult<RegistrationReceipt> {
        let form = RegistrationForm {
            name: self.page.field(FormField::Name),
            national_id: self.page.field(FormField::NationalId),
            gender: self.page.field(FormField::Gender),
            address: self.page.field(FormField::Address),
        };
        debug!(
            action = "register",
            name = %form.name,
            gender = ?Gender::from_form_value(&form.gender),
            "dispatching"
        );

        let outcome = self
            .client
            .register(&form, self.page.cookie_header(routes::REGISTER))
            .await;
        match &outcome {
            ActionResult::Success(receipt) => {
                self.page
                    .show_dialog(Dialog::success(
                        REGISTER_OK_TITLE,
                        receipt.message.clone().unwrap_or_default(),
                    ))
                    .await;
                self.page.redirect(routes::LOGIN);
            }
            ActionResult::Failure(reason) => {
                self.report_failure("register", REGISTER_FAILED_TITLE, reason, true)
                    .await;
            }
        }
        outcome
    }

    pub async fn book_appointment(&self) -> ActionResult<QueueTicket> {
        let appointment = AppointmentRequest {
            date: self.page.field(FormField::Date),
            session: self.page.field(FormField::Session),
            checkup_type: self.page.field(FormField::CheckupType),
            name: self.page.field(FormField::PatientName),
        };
        debug!(
            action = "book",
            date = %appointment.date,
            session = ?BookingSession::from_form_value(&appointment.session),
            "dispatching"
        );

        let outcome = self
            .client
            .book_appointment(&appointment, self.page.cookie_header(routes::BOOKING))
            .await;
        match &outcome {
            ActionResult::Success(ticket) => {
                info!(queue_number = %ticket.queue_number, "appointment booked");
                self.page.show_queue_ticket(ticket);
            }
            ActionResult::Failure(reason) => {
                self.report_failure("book", BOOKING_FAILED_TITLE, reason, true)
                    .await;
            }
        }
        outcome
    }

    pub async fn admin_login(&self) -> ActionResult<AdminGrant> {
        let credentials = AdminCredentials {
            name: self.page.field(FormField::Name),
            password: self.page.field(FormField::Password),
        };
        debug!(action = "admin_login", name = %credentials.name, "dispatching");

        let outcome = self
            .client
            .admin_login(&credentials, self.page.cookie_header(routes::ADMIN_LOGIN))
            .await;
        match &outcome {
            ActionResult::Success(grant) => {
                self.page.alert(ADMIN_LOGIN_OK_ALERT);
                self.page.set_cookie(CookieScope::Admin, &grant.token);
                info!(scope = ?CookieScope::Admin, "stored session token");
                self.page.redirect(routes::ADMIN);
            }
            ActionResult::Failure(FailureReason::Rejected { message }) => {
                self.page.alert(message.as_deref().unwrap_or_default());
            }
            ActionResult::Failure(reason) => {
                warn!(action = "admin_login", %reason, "request failed without user feedback");
            }
        }
        outcome
    }

    pub fn sign_out(&self) {
        self.page.clear_cookie(CookieScope::User);
        info!(scope = ?CookieScope::User, "cleared session token");
        self.page.alert(SIGNED_OUT_ALERT);
        self.page.redirect(routes::HOME);
    }

    pub fn admin_sign_out(&self) {
        self.page.clear_cookie(CookieScope::Admin);
        info!(scope = ?CookieScope::Admin, "cleared session token");
        self.page.alert(SIGNED_OUT_ALERT);
        self.page.redirect(routes::ADMIN_LOGIN);
    }

    /// Opens the delete confirmation and makes `id` the only pending target.
    pub async fn request_deletion(&self, kind: DeletionKind, id: RecordId) {
        let mut pending = self.pending_deletion.lock().await;
        if let Some(previous) = pending.as_ref() {
            debug!(previous = %previous.id, next = %id, "replacing pending deletion");
        }
        *pending = Some(PendingDeletion { kind, id });
        drop(pending);
        self.page.set_modal_visible(Modal::Delete, true);
    }

    pub async fn delete_mcu(&self, id: RecordId) {
        self.request_deletion(DeletionKind::Mcu, id).await;
    }

    pub async fn delete_user(&self, id: RecordId) {
        self.request_deletion(DeletionKind::User, id).await;
    }

    pub async fn delete_queue_entry(&self, id: RecordId) {
        self.request_deletion(DeletionKind::Queue, id).await;
    }

    pub async fn pending_deletion(&self) -> Option<PendingDeletion> {
        self.pending_deletion.lock().await.clone()
    }

    /// Confirm-button handler: sends exactly one request for the pending target.
    pub async fn confirm_deletion(&self) -> ActionResult<PendingDeletion> {
        let Some(target) = self.pending_deletion.lock().await.take() else {
            debug!("delete confirmed with nothing pending");
            return ActionResult::Failure(FailureReason::NothingPending);
        };
        debug!(action = "delete", kind = ?target.kind, id = %target.id, "dispatching");

        let endpoint = target.kind.endpoint();
        let outcome = self
            .client
            .delete_record(target.kind, target.id.clone(), self.page.cookie_header(endpoint))
            .await;
        match outcome {
            ActionResult::Success(()) => {
                match target.kind {
                    DeletionKind::User => {
                        self.page.schedule_reload(USER_DELETION_RELOAD_DELAY);
                        self.page
                            .show_dialog(Dialog::success(DELETED_TITLE, DELETED_TEXT))
                            .await;
                    }
                    DeletionKind::Mcu | DeletionKind::Queue => self.page.reload(),
                }
                ActionResult::Success(target)
            }
            ActionResult::Failure(reason) => {
                warn!(action = "delete", id = %target.id, %reason, "deletion failed");
                self.page.log_console(&format!("Error: {reason}"));
                // The modal stays open; a second confirm retries the same record.
                let mut pending = self.pending_deletion.lock().await;
                if pending.is_none() {
                    *pending = Some(target);
                }
                ActionResult::Failure(reason)
            }
        }
    }

    /// Close-button handler for the delete confirmation.
    pub async fn cancel_deletion(&self) {
        self.pending_deletion.lock().await.take();
        self.page.set_modal_visible(Modal::Delete, false);
    }

    pub async fn save_mcu_metadata(&self) -> ActionResult<()> {
        let metadata = McuMetadata {
            name: self.page.field(FormField::McuName),
            hospital_detail: self.page.field(FormField::McuHospitalDetail),
        };
        debug!(action = "save_mcu", name = %metadata.name, "dispatching");

        let outcome = self
            .client
            .save_mcu_metadata(&metadata, self.page.cookie_header(routes::SAVE_MCU))
            .await;
        match &outcome {
            ActionResult::Success(()) => {
                self.page.alert(MCU_SAVED_ALERT);
                self.page.redirect(routes::ADMIN_MCU_DETAIL);
            }
            ActionResult::Failure(reason) => {
                debug!(action = "save_mcu", %reason, "unhandled failure");
            }
        }
        outcome
    }

    pub fn refresh_page(&self) {
        self.page.reload();
    }

    pub fn open_info_modal(&self, modal: InfoModal) {
        self.page.set_modal_visible(Modal::Info(modal), true);
    }

    pub fn add_mcu_data(&self) {
        self.page.redirect(routes::ADMIN_MCU_EDIT);
    }

    pub fn input_mcu_data(&self) {
        self.page.redirect(routes::ADMIN_MCU_INPUT);
    }

    async fn report_failure(
        &self,
        action: &'static str,
        title: &str,
        reason: &FailureReason,
        reload_on_dismiss: bool,
    ) {
        if !reason.is_surfaced() {
            warn!(action, %reason, "request failed without user feedback");
            return;
        }

        debug!(action, %reason, "showing error dialog");
        self.page
            .show_dialog(Dialog::error(title, reason.user_message()))
            .await;
        if reload_on_dismiss {
            self.page.reload();
        }
    }
}

fn referrer_path(referrer: &str) -> String {
    match url::Url::parse(referrer) {
        Ok(url) => url.path().to_string(),
        Err(_) => referrer.to_string(),
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
