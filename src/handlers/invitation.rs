//! Invitation emails carrying login credentials for a newly created account.

use lambda_http::{Body, Request, Response};
use serde_json::{json, Map, Value};

use crate::config::InvitationSettings;
use crate::error::ApiError;
use crate::handlers::{respond, screen_method};
use crate::http::{body_text, CorsPolicy};
use crate::mail::Mailer;
use crate::models::{InvitationRequest, OutgoingEmail, Role};

const MISSING_FIELDS: &str = "Email, name and password are required";
const DEFAULT_LOGIN_URL: &str = "https://systemcraft.ru/login";

/// Handle an invitation request
pub async fn handle_send_invitation<M>(event: &Request, settings: &InvitationSettings, mailer: &M) -> Response<Body>
where
    M: Mailer + ?Sized,
{
    if let Some(response) = screen_method(event, "POST", &CorsPolicy::POST_FORM) {
        return response;
    }

    respond("send-invitation", submit(event.body(), settings, mailer).await)
}

/// The body is either a JSON object or a JSON string holding one. Anything
/// unreadable is an empty object, so bad input surfaces as missing fields.
fn body_fields(body: &Body) -> Map<String, Value> {
    let parsed = body_text(body).and_then(|text| serde_json::from_str::<Value>(text).ok());

    match parsed {
        Some(Value::Object(fields)) => fields,
        Some(Value::String(inner)) => match serde_json::from_str::<Value>(&inner) {
            Ok(Value::Object(fields)) => fields,
            _ => Map::new(),
        },
        _ => Map::new(),
    }
}

fn non_empty(fields: &Map<String, Value>, key: &str) -> Option<String> {
    fields
        .get(key)
        .and_then(|v| v.as_str())
        .filter(|s| !s.is_empty())
        .map(|s| s.to_string())
}

impl InvitationRequest {
    fn from_fields(fields: &Map<String, Value>) -> Option<Self> {
        Some(InvitationRequest {
            email: non_empty(fields, "email")?,
            name: non_empty(fields, "name")?,
            password: non_empty(fields, "password")?,
            role: fields
                .get("role")
                .and_then(|v| v.as_str())
                .map(Role::from)
                .unwrap_or_default(),
            login_url: fields
                .get("loginUrl")
                .and_then(|v| v.as_str())
                .unwrap_or(DEFAULT_LOGIN_URL)
                .to_string(),
        })
    }
}

async fn submit<M>(body: &Body, settings: &InvitationSettings, mailer: &M) -> Result<Value, ApiError>
where
    M: Mailer + ?Sized,
{
    let invitation = InvitationRequest::from_fields(&body_fields(body)).ok_or(ApiError::MissingFields(MISSING_FIELDS))?;

    let email = OutgoingEmail {
        from: settings.from_email.clone(),
        to: invitation.email.clone(),
        subject: format!("Приглашение в систему СистемКрафт - {}", invitation.role.label()),
        html: render_email(&invitation),
        attachment: None,
    };

    mailer
        .send(email)
        .await
        .map_err(|source| ApiError::Delivery { prefix: "", source })?;

    tracing::info!(recipient = %invitation.email, role = invitation.role.label(), "invitation sent");

    Ok(json!({
        "success": true,
        "message": format!("Invitation sent to {}", invitation.email),
    }))
}

fn render_email(invitation: &InvitationRequest) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <style>
        body {{ font-family: Arial, sans-serif; line-height: 1.6; color: #333; }}
        .container {{ max-width: 600px; margin: 0 auto; padding: 20px; }}
        .header {{ background: linear-gradient(135deg, #667eea 0%, #764ba2 100%); color: white; padding: 30px; text-align: center; border-radius: 10px 10px 0 0; }}
        .content {{ background: #f9fafb; padding: 30px; border-radius: 0 0 10px 10px; }}
        .credentials {{ background: white; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #667eea; }}
        .button {{ display: inline-block; background: #667eea; color: white; padding: 12px 30px; text-decoration: none; border-radius: 6px; margin-top: 20px; }}
        .footer {{ text-align: center; margin-top: 20px; color: #666; font-size: 12px; }}
    </style>
</head>
<body>
    <div class="container">
        <div class="header">
            <h1>Добро пожаловать в СистемКрафт!</h1>
        </div>
        <div class="content">
            <p>Здравствуйте, {name}!</p>
            <p>Для вас создан аккаунт в системе СистемКрафт с ролью <strong>{role}</strong>.</p>

            <div class="credentials">
                <h3 style="margin-top: 0;">Данные для входа:</h3>
                <p><strong>Логин (Email):</strong> {email}</p>
                <p><strong>Пароль:</strong> {password}</p>
                <p><strong>Ссылка для входа:</strong> <a href="{login_url}">{login_url}</a></p>
            </div>

            <p>Рекомендуем изменить пароль после первого входа в систему.</p>

            <a href="{login_url}" class="button">Войти в систему</a>

            <div class="footer">
                <p>Если у вас возникли вопросы, свяжитесь с администратором.</p>
                <p>© 2024 СистемКрафт. Все права защищены.</p>
            </div>
        </div>
    </div>
</body>
</html>
"#,
        name = invitation.name,
        role = invitation.role.label(),
        email = invitation.email,
        password = invitation.password,
        login_url = invitation.login_url,
    )
}
