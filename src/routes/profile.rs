use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::repository::HttpRepository;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::profile::load_profile;
use crate::session::{ActixSessionStore, SessionStore};

#[get("/profile")]
pub async fn show_profile(
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());

    let data = match load_profile(&repo, &store).await {
        Ok(data) => data,
        Err(err) => return service_error_response(err, &store, "/"),
    };

    let mut context = base_context(&flash_messages, "profile");
    context.insert("customer", &data.customer);
    context.insert("profile", &data);

    render_template(&tera, "profile/index.html", &context)
}
