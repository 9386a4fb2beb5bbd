use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::forms::leads::SearchQuery;
use crate::repository::HttpRepository;
use crate::routes::{base_context, render_template, service_error_response};
use crate::services::collections::load_contacted_page;
use crate::session::{ActixSessionStore, SessionStore};

#[get("/contacted")]
pub async fn show_contacted(
    params: web::Query<SearchQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());

    let data = match load_contacted_page(&repo, &store, params.into_inner().q).await {
        Ok(data) => data,
        Err(err) => return service_error_response(err, &store, "/"),
    };

    let mut context = base_context(&flash_messages, "contacted");
    context.insert("customer", &data.customer);
    context.insert("collection", &data);

    render_template(&tera, "leads/contacted.html", &context)
}
