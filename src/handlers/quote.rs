//! Quote requests: a richer contact form with system choices and an optional file.

use base64::{engine::general_purpose, Engine as _};
use lambda_http::{Body, Request, Response};
use serde_json::{json, Value};

use crate::config::QuoteSettings;
use crate::error::{ApiError, AttachmentError};
use crate::handlers::{respond, screen_method};
use crate::http::{parse_json_body, CorsPolicy};
use crate::mail::Mailer;
use crate::models::{Attachment, FileUpload, OutgoingEmail, QuoteSubmission, SystemCode};

const INVALID_BODY: &str = "Некорректный формат данных";
const MISSING_FIELDS: &str = "Заполните все обязательные поля";
const DELIVERY_PREFIX: &str = "Ошибка отправки: ";
const SENT: &str = "Заявка успешно отправлена";

/// Handle a quote request
pub async fn handle_quote_request<M>(event: &Request, settings: &QuoteSettings, mailer: &M) -> Response<Body>
where
    M: Mailer + ?Sized,
{
    if let Some(response) = screen_method(event, "POST", &CorsPolicy::POST_FORM) {
        return response;
    }

    respond("send-email", submit(event.body(), settings, mailer).await)
}

async fn submit<M>(body: &Body, settings: &QuoteSettings, mailer: &M) -> Result<Value, ApiError>
where
    M: Mailer + ?Sized,
{
    let submission: QuoteSubmission = parse_json_body(body).ok_or(ApiError::MalformedBody(INVALID_BODY))?;

    let name = submission.name.as_deref().unwrap_or_default();
    let email = submission.email.as_deref().unwrap_or_default();
    let message = submission.message.as_deref().unwrap_or_default();

    if name.is_empty() || email.is_empty() || message.is_empty() {
        return Err(ApiError::MissingFields(MISSING_FIELDS));
    }

    // Best effort: a broken file never blocks the request itself.
    let attachment = match submission.file.as_ref().filter(|file| !file.is_empty()) {
        Some(file) => match decode_attachment(file) {
            Ok(attachment) => {
                tracing::debug!(
                    filename = %attachment.filename,
                    mime_type = file.mime_type.as_deref().unwrap_or("application/octet-stream"),
                    size = attachment.bytes.len(),
                    "attaching uploaded file"
                );
                Some(attachment)
            }
            Err(e) => {
                tracing::warn!(error = %e, "dropping quote attachment");
                None
            }
        },
        None => None,
    };

    let outgoing = OutgoingEmail {
        from: settings.smtp.username.clone(),
        to: settings.recipient.clone(),
        subject: format!("Новая заявка с сайта от {}", name),
        html: render_email(&submission),
        attachment,
    };

    mailer
        .send(outgoing)
        .await
        .map_err(|source| ApiError::Delivery { prefix: DELIVERY_PREFIX, source })?;

    tracing::info!(sender = %email, recipient = %settings.recipient, "quote request forwarded");

    Ok(json!({
        "success": true,
        "message": SENT,
    }))
}

/// Decodes the browser's base64 payload; a `data:` URL prefix is tolerated.
pub fn decode_attachment(file: &FileUpload) -> Result<Attachment, AttachmentError> {
    let content = file.content.as_deref().ok_or(AttachmentError::MissingContent)?;
    let filename = file.name.clone().ok_or(AttachmentError::MissingName)?;

    // Format: data:application/pdf;base64,xxxx
    let base64_data = if content.starts_with("data:") {
        content.split(',').next_back().unwrap_or(content)
    } else {
        content
    };

    let cleaned: String = base64_data.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let bytes = general_purpose::STANDARD
        .decode(cleaned)
        .map_err(|e| AttachmentError::Decode(e.to_string()))?;

    Ok(Attachment { filename, bytes })
}

fn render_systems(systems: &[SystemCode]) -> String {
    if systems.is_empty() {
        return String::new();
    }

    let items: String = systems
        .iter()
        .map(|system| format!("<li>{}</li>", system.label()))
        .collect();

    format!(
        r#"
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee; vertical-align: top;"><strong>Интересующие системы:</strong></td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;"><ul style="margin: 5px 0; padding-left: 20px;">{items}</ul></td>
        </tr>
"#
    )
}

/// Unlike the contact form, an absent company drops the whole row.
fn render_company(company: &str) -> String {
    if company.is_empty() {
        return String::new();
    }

    format!(
        r#"
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee;"><strong>Компания:</strong></td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{company}</td>
        </tr>
"#
    )
}

fn render_email(submission: &QuoteSubmission) -> String {
    let phone = submission.phone.as_deref().filter(|p| !p.is_empty()).unwrap_or("Не указан");

    format!(
        r#"
<html>
<body style="font-family: Arial, sans-serif; line-height: 1.6; color: #333;">
    <h2 style="color: #ff6b35;">Новая заявка с сайта</h2>
    <table style="width: 100%; border-collapse: collapse;">
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee;"><strong>Имя:</strong></td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{name}</td>
        </tr>
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee;"><strong>Email:</strong></td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;"><a href="mailto:{email}">{email}</a></td>
        </tr>
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee;"><strong>Телефон:</strong></td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{phone}</td>
        </tr>
        {company}
        {systems}
        <tr>
            <td style="padding: 10px; vertical-align: top;"><strong>Сообщение:</strong></td>
            <td style="padding: 10px;">{message}</td>
        </tr>
    </table>
    <p style="margin-top: 20px; color: #666; font-size: 12px;">
        Это письмо отправлено автоматически с формы обратной связи сайта.
    </p>
</body>
</html>
"#,
        name = submission.name.as_deref().unwrap_or_default(),
        email = submission.email.as_deref().unwrap_or_default(),
        phone = phone,
        company = render_company(submission.company.as_deref().unwrap_or_default()),
        systems = render_systems(submission.systems.as_deref().unwrap_or_default()),
        message = submission.message.as_deref().unwrap_or_default(),
    )
}
