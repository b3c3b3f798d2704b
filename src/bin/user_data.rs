use lambda_http::{run, service_fn, Body, Error, Request, Response};

use systemcraft_functions::config::DatabaseSettings;
use systemcraft_functions::handlers::handle_user_projects;
use systemcraft_functions::store::PgProjectStore;

#[tokio::main]
async fn main() -> Result<(), Error> {
    lambda_http::tracing::init_default_subscriber();

    let settings = DatabaseSettings::from_env()?;
    let store = PgProjectStore::new(&settings);

    let store = &store;
    run(service_fn(move |event: Request| async move {
        Ok::<Response<Body>, Error>(handle_user_projects(&event, store).await)
    }))
    .await
}
