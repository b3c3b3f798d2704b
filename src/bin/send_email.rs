use lambda_http::{run, service_fn, Body, Error, Request, Response};

use systemcraft_functions::config::QuoteSettings;
use systemcraft_functions::handlers::handle_quote_request;
use systemcraft_functions::mail::SmtpMailer;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let settings = QuoteSettings::from_env()?;
    let mailer = SmtpMailer::new(&settings.smtp)?;
    tracing::info!(relay = %settings.smtp.host, port = settings.smtp.port, "quote function ready");

    let settings = &settings;
    let mailer = &mailer;
    run(service_fn(move |event: Request| async move {
        Ok::<Response<Body>, Error>(handle_quote_request(&event, settings, mailer).await)
    }))
    .await
}
