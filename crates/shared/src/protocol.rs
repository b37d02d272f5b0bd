use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::{
    domain::RecordId,
    error::{ActionResult, FailureReason},
};

pub const RESULT_SUCCESS: &str = "success";
pub const RESULT_ERROR: &str = "error";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "nik")]
    pub national_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RegistrationForm {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "nik")]
    pub national_id: String,
    /// Raw select value (`1` or `2`); the server maps it to a name.
    pub gender: String,
    #[serde(rename = "alamat")]
    pub address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppointmentRequest {
    /// `YYYY-MM-DD` from the date input, sent as typed.
    #[serde(rename = "tanggal")]
    pub date: String,
    #[serde(rename = "sesi")]
    pub session: String,
    #[serde(rename = "mcu")]
    pub checkup_type: String,
    #[serde(rename = "nama")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminCredentials {
    #[serde(rename = "nama")]
    pub name: String,
    #[serde(rename = "pass")]
    pub password: String,
}

/// JSON body of the deletion endpoints. `user_id` mirrors `_id` and is only
/// sent to `/delete_user`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeletionRequest {
    #[serde(rename = "_id")]
    pub id: RecordId,
    #[serde(rename = "user_id", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<RecordId>,
}

impl DeletionRequest {
    pub fn single(id: RecordId) -> Self {
        Self { id, user_id: None }
    }

    pub fn mirrored(id: RecordId) -> Self {
        Self {
            user_id: Some(id.clone()),
            id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct McuMetadata {
    #[serde(rename = "nama_mcu")]
    pub name: String,
    #[serde(rename = "detailrs_mcu")]
    pub hospital_detail: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginGrant {
    pub token: String,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RegistrationReceipt {
    #[serde(default)]
    pub message: Option<String>,
}

/// Booked slot as echoed back by `/pendaftaranonline`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QueueTicket {
    #[serde(rename = "nomor_antrian", deserialize_with = "string_or_number")]
    pub queue_number: String,
    #[serde(rename = "tanggal")]
    pub date: String,
    #[serde(rename = "hari")]
    pub weekday: String,
    #[serde(rename = "sesi")]
    pub session: String,
    #[serde(rename = "jam")]
    pub time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AdminGrant {
    pub token: String,
}

/// Raw response envelope. Only `result` is interpreted here; everything else
/// stays in `fields` until the success payload is decoded.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerResponse {
    #[serde(default)]
    pub result: Option<String>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl ServerResponse {
    pub fn is_success(&self) -> bool {
        self.result.as_deref() == Some(RESULT_SUCCESS)
    }

    pub fn is_error(&self) -> bool {
        self.result.as_deref() == Some(RESULT_ERROR)
    }

    fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(Value::as_str).map(str::to_string)
    }

    pub fn message(&self) -> Option<String> {
        self.text("message")
    }

    pub fn msg(&self) -> Option<String> {
        self.text("msg")
    }

    /// Best user-facing explanation the server gave for a rejection.
    pub fn failure_message(&self) -> Option<String> {
        self.message()
            .or_else(|| self.msg())
            .or_else(|| self.text("error"))
    }
}

/// Turns a completed HTTP exchange into the action-level result. This is the
/// only place that inspects `result`.
pub fn decode_response<T: DeserializeOwned>(status: u16, body: &[u8]) -> ActionResult<T> {
    let is_ok = (200..300).contains(&status);
    let parsed = serde_json::from_slice::<ServerResponse>(body);

    if !is_ok {
        return match parsed {
            Ok(response) if response.is_error() => {
                ActionResult::Failure(FailureReason::TransportRejected {
                    status,
                    message: response.failure_message(),
                })
            }
            _ => ActionResult::Failure(FailureReason::Transport {
                detail: format!("HTTP status {status}"),
            }),
        };
    }

    let response = match parsed {
        Ok(response) => response,
        Err(err) => {
            return ActionResult::Failure(FailureReason::Transport {
                detail: format!("unreadable response body: {err}"),
            })
        }
    };

    if !response.is_success() {
        return ActionResult::Failure(FailureReason::Rejected {
            message: response.failure_message(),
        });
    }

    match serde_json::from_value::<T>(Value::Object(response.fields)) {
        Ok(payload) => ActionResult::Success(payload),
        Err(err) => ActionResult::Failure(FailureReason::Malformed {
            detail: err.to_string(),
        }),
    }
}

/// Decode for endpoints whose body is not consumed; any 2xx is success.
pub fn decode_unit(status: u16) -> ActionResult<()> {
    if (200..300).contains(&status) {
        ActionResult::Success(())
    } else {
        ActionResult::Failure(FailureReason::Transport {
            detail: format!("HTTP status {status}"),
        })
    }
}

/// Decode for endpoints that only need a 2xx with some JSON body.
pub fn decode_json_ack(status: u16, body: &[u8]) -> ActionResult<()> {
    match decode_unit(status) {
        ActionResult::Success(()) => match serde_json::from_slice::<Value>(body) {
            Ok(_) => ActionResult::Success(()),
            Err(err) => ActionResult::Failure(FailureReason::Transport {
                detail: format!("unreadable response body: {err}"),
            }),
        },
        failure => failure,
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Text(String),
        Int(i64),
        Float(f64),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Text(text) => text,
        Raw::Int(value) => value.to_string(),
        Raw::Float(value) => value.to_string(),
    })
}
