use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(RecordId);

pub const TOKEN_COOKIE: &str = "mytoken";

pub mod routes {
    pub const HOME: &str = "/";
    pub const LOGIN: &str = "/login";
    pub const REGISTER: &str = "/register";
    pub const ACCOUNT: &str = "/akun";
    pub const BOOKING: &str = "/pendaftaranonline";
    pub const ADMIN: &str = "/admin";
    pub const ADMIN_LOGIN: &str = "/admin/login";
    pub const ADMIN_MCU_DETAIL: &str = "/admin/detail/mcu";
    pub const ADMIN_MCU_EDIT: &str = "/admin/detail/mcu/editrs";
    pub const ADMIN_MCU_INPUT: &str = "/admin/mcu";
    pub const DELETE_MCU: &str = "/delete_mcu";
    pub const DELETE_USER: &str = "/delete_user";
    pub const DELETE_QUEUE: &str = "/delete_antrian";
    pub const SAVE_MCU: &str = "/save_data";
}

/// Input elements the dispatcher reads from the host page, keyed by element id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    Name,
    NationalId,
    Gender,
    Address,
    Date,
    Session,
    CheckupType,
    PatientName,
    Password,
    McuName,
    McuHospitalDetail,
}

impl FormField {
    pub fn element_id(self) -> &'static str {
        match self {
            FormField::Name => "inputName",
            FormField::NationalId => "inputNIK",
            FormField::Gender => "inputGender",
            FormField::Address => "inputAddress",
            FormField::Date => "inputDate",
            FormField::Session => "inputSession",
            FormField::CheckupType => "inputMCU",
            FormField::PatientName => "inputNama",
            FormField::Password => "inputPass",
            FormField::McuName => "nama_mcu",
            FormField::McuHospitalDetail => "detailrs_mcu",
        }
    }
}

/// Gender as chosen on the registration form. The select submits `1` or `2`;
/// the server maps those codes to the spelled-out name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Recognises the select codes and the spelled-out names. The raw form
    /// value is what goes on the wire; this is only a typed view of it.
    pub fn from_form_value(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "laki-laki" | "male" => Some(Gender::Male),
            "2" | "perempuan" | "female" => Some(Gender::Female),
            _ => None,
        }
    }
}

/// Time-of-day appointment slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookingSession {
    Morning,
    Midday,
    Afternoon,
}

impl BookingSession {
    /// Opening and closing time of the slot as served by the clinic.
    pub fn window(self) -> (&'static str, &'static str) {
        match self {
            BookingSession::Morning => ("08:00", "12:00"),
            BookingSession::Midday => ("12:30", "14:30"),
            BookingSession::Afternoon => ("15:00", "18:00"),
        }
    }

    pub fn from_form_value(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "pagi" | "morning" => Some(BookingSession::Morning),
            "siang" | "midday" => Some(BookingSession::Midday),
            "sore" | "afternoon" => Some(BookingSession::Afternoon),
            _ => None,
        }
    }
}

/// Cookie path a token is stored under; user and admin areas never share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CookieScope {
    User,
    Admin,
}

impl CookieScope {
    pub fn path(self) -> &'static str {
        match self {
            CookieScope::User => "/",
            CookieScope::Admin => "/admin",
        }
    }

    pub fn covers(self, request_path: &str) -> bool {
        match self {
            CookieScope::User => true,
            CookieScope::Admin => {
                request_path == "/admin" || request_path.starts_with("/admin/")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeletionKind {
    Mcu,
    User,
    Queue,
}

impl DeletionKind {
    pub fn endpoint(self) -> &'static str {
        match self {
            DeletionKind::Mcu => routes::DELETE_MCU,
            DeletionKind::User => routes::DELETE_USER,
            DeletionKind::Queue => routes::DELETE_QUEUE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InfoModal {
    RegistrationFlow,
    CheckupResultFlow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    Delete,
    BookingResult,
    Info(InfoModal),
}

impl Modal {
    pub fn element_id(self) -> &'static str {
        match self {
            Modal::Delete => "deleteModal",
            Modal::BookingResult => "resultModal",
            Modal::Info(InfoModal::RegistrationFlow) => "modalPendaftaran",
            Modal::Info(InfoModal::CheckupResultFlow) => "modalPemeriksaan",
        }
    }
}
