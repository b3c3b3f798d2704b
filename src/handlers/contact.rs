//! Contact form: forwards a site visitor's message to the operator inbox.

use lambda_http::{Body, Request, Response};
use serde_json::{json, Value};

use crate::config::ContactSettings;
use crate::error::ApiError;
use crate::handlers::{respond, screen_method};
use crate::http::{parse_json_body, CorsPolicy};
use crate::mail::Mailer;
use crate::models::{ContactSubmission, OutgoingEmail};

const INVALID_BODY: &str = "Неверный формат данных";
const MISSING_FIELDS: &str = "Заполните обязательные поля: имя, email, сообщение";
const DELIVERY_PREFIX: &str = "Ошибка отправки: ";
const SENT: &str = "Заявка успешно отправлена";

/// Trimmed view of a submission; empty strings stand for absent fields.
#[derive(Debug)]
struct ContactForm {
    name: String,
    email: String,
    phone: String,
    company: String,
    message: String,
}

impl From<ContactSubmission> for ContactForm {
    fn from(submission: ContactSubmission) -> Self {
        let trimmed = |value: Option<String>| value.map(|v| v.trim().to_string()).unwrap_or_default();
        ContactForm {
            name: trimmed(submission.name),
            email: trimmed(submission.email),
            phone: trimmed(submission.phone),
            company: trimmed(submission.company),
            message: trimmed(submission.message),
        }
    }
}

/// Handle a contact form submission
pub async fn handle_contact_form<M>(event: &Request, settings: &ContactSettings, mailer: &M) -> Response<Body>
where
    M: Mailer + ?Sized,
{
    if let Some(response) = screen_method(event, "POST", &CorsPolicy::POST_FORM) {
        return response;
    }

    respond("contact", submit(event.body(), settings, mailer).await)
}

async fn submit<M>(body: &Body, settings: &ContactSettings, mailer: &M) -> Result<Value, ApiError>
where
    M: Mailer + ?Sized,
{
    let submission: ContactSubmission = parse_json_body(body).ok_or(ApiError::MalformedBody(INVALID_BODY))?;
    let form = ContactForm::from(submission);

    if form.name.is_empty() || form.email.is_empty() || form.message.is_empty() {
        return Err(ApiError::MissingFields(MISSING_FIELDS));
    }

    let email = OutgoingEmail {
        from: settings.mailbox.clone(),
        to: settings.mailbox.clone(),
        subject: format!("Новая заявка с сайта от {}", form.name),
        html: render_email(&form),
        attachment: None,
    };

    mailer
        .send(email)
        .await
        .map_err(|source| ApiError::Delivery { prefix: DELIVERY_PREFIX, source })?;

    tracing::info!(sender = %form.email, "contact request forwarded");

    Ok(json!({
        "success": true,
        "message": SENT,
    }))
}

fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.is_empty() { placeholder } else { value }
}

fn render_email(form: &ContactForm) -> String {
    format!(
        r#"
<html>
<body style="font-family: Arial, sans-serif; color: #333;">
    <h2 style="color: #0EA5E9;">Новая заявка с сайта TechIntegrator</h2>
    <table style="border-collapse: collapse; width: 100%; max-width: 600px;">
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee; font-weight: bold;">Имя:</td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{name}</td>
        </tr>
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee; font-weight: bold;">Email:</td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{email}</td>
        </tr>
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee; font-weight: bold;">Телефон:</td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{phone}</td>
        </tr>
        <tr>
            <td style="padding: 10px; border-bottom: 1px solid #eee; font-weight: bold;">Компания:</td>
            <td style="padding: 10px; border-bottom: 1px solid #eee;">{company}</td>
        </tr>
        <tr>
            <td style="padding: 10px; vertical-align: top; font-weight: bold;">Сообщение:</td>
            <td style="padding: 10px;">{message}</td>
        </tr>
    </table>
</body>
</html>
"#,
        name = form.name,
        email = form.email,
        phone = or_placeholder(&form.phone, "Не указан"),
        company = or_placeholder(&form.company, "Не указана"),
        message = form.message,
    )
}
