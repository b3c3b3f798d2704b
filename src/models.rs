use serde::{Deserialize, Serialize};

// Request Bodies
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ContactSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct QuoteSubmission {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub company: Option<String>,
    pub message: Option<String>,
    pub systems: Option<Vec<SystemCode>>,
    pub file: Option<FileUpload>,
}

/// A file picked in the quote form, base64-encoded by the browser.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct FileUpload {
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub mime_type: Option<String>,
    pub content: Option<String>,
}

impl FileUpload {
    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.mime_type.is_none() && self.content.is_none()
    }
}

/// Engineering systems a client can ask a quote for.
#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(from = "String")]
pub enum SystemCode {
    Sks,
    Saps,
    Soue,
    Skud,
    Sots,
    Sot,
    Askue,
    Eom,
    Ovik,
    Other(String),
}

impl From<String> for SystemCode {
    fn from(code: String) -> Self {
        match code.as_str() {
            "sks" => SystemCode::Sks,
            "saps" => SystemCode::Saps,
            "soue" => SystemCode::Soue,
            "skud" => SystemCode::Skud,
            "sots" => SystemCode::Sots,
            "sot" => SystemCode::Sot,
            "askue" => SystemCode::Askue,
            "eom" => SystemCode::Eom,
            "ovik" => SystemCode::Ovik,
            _ => SystemCode::Other(code),
        }
    }
}

impl SystemCode {
    /// Label shown in the email; unknown codes are shown as sent.
    pub fn label(&self) -> &str {
        match self {
            SystemCode::Sks => "СКС - Структурированные кабельные системы",
            SystemCode::Saps => "САПС - Система автоматической пожарной сигнализации",
            SystemCode::Soue => "СОУЭ - Система оповещения и управления эвакуацией",
            SystemCode::Skud => "СКУД - Система контроля и управления доступом",
            SystemCode::Sots => "СОТС - Система охранно-тревожной сигнализации",
            SystemCode::Sot => "СОТ - Система охранного телевидения",
            SystemCode::Askue => "АСКУЭ - Автоматизированная система коммерческого учета электроэнергии",
            SystemCode::Eom => "ЭОМ - Электрооборудование и молниезащита",
            SystemCode::Ovik => "ОВИК - Отопление, вентиляция и кондиционирование",
            SystemCode::Other(code) => code,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Role {
    Admin,
    Editor,
    #[default]
    Client,
    Employee,
    Other(String),
}

impl From<&str> for Role {
    fn from(role: &str) -> Self {
        match role {
            "admin" => Role::Admin,
            "editor" => Role::Editor,
            "client" => Role::Client,
            "employee" => Role::Employee,
            other => Role::Other(other.to_string()),
        }
    }
}

impl Role {
    pub fn label(&self) -> &str {
        match self {
            Role::Admin => "Администратор",
            Role::Editor => "Редактор",
            Role::Client => "Клиент",
            Role::Employee => "Сотрудник",
            Role::Other(role) => role,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InvitationRequest {
    pub email: String,
    pub name: String,
    pub password: String,
    pub role: Role,
    pub login_url: String,
}

// Read models
#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: i32,
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub budget: Option<f64>,
    pub user_role: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LegalEntity {
    pub id: i32,
    pub name: Option<String>,
    pub inn: Option<String>,
    pub kpp: Option<String>,
    pub ogrn: Option<String>,
    pub legal_address: Option<String>,
    pub actual_address: Option<String>,
    pub director_name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Serialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProject {
    pub project: Project,
    pub legal_entity: Option<LegalEntity>,
}

// Outgoing mail
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub filename: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html: String,
    pub attachment: Option<Attachment>,
}
