use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::HttpRepository;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::overview::load_overview;
use crate::session::{ActixSessionStore, SessionStore};

#[get("/")]
pub async fn show_index(
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());

    let data = match load_overview(&repo, &store).await {
        Ok(data) => data,
        Err(err) => return service_error_response(err, &store, "/"),
    };

    let mut context = base_context(&flash_messages, "index");
    context.insert("customer", &data.customer);
    context.insert("overview", &data);

    render_template(&tera, "main/index.html", &context)
}
