use actix_session::Session;
use actix_web::{Responder, get, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::forms::leads::SearchQuery;
use crate::repository::HttpRepository;
use crate::routes::{base_context, flash_dialog, render_template, service_error_response};
use crate::services::collections::load_saved_page;
use crate::session::{ActixSessionStore, SessionStore};

#[get("/saved")]
pub async fn show_saved(
    params: web::Query<SearchQuery>,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());

    let params = params.into_inner();
    let confirm = params.confirm();

    let data = match load_saved_page(&repo, &store, params.q, confirm).await {
        Ok(data) => data,
        Err(err) => return service_error_response(err, &store, "/"),
    };

    let mut dialog = flash_dialog(&flash_messages);
    if let Some(confirm) = &data.confirm_dialog {
        dialog.show(confirm.clone());
    }

    let mut context = base_context(&flash_messages, "saved");
    context.insert("dialog", &dialog.current());
    context.insert("customer", &data.customer);
    context.insert("collection", &data);

    render_template(&tera, "leads/saved.html", &context)
}
