use actix_session::Session;
use actix_web::{HttpRequest, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::domain::dialog::Dialog;
use crate::domain::filter::{AREA_OPTIONS, OCCUPANCY_OPTIONS, SUB_TYPE_OPTIONS, TYPE_OPTIONS};
use crate::forms::leads::{CatalogQueryForm, LeadActionForm, inbox_path};
use crate::models::config::ServerConfig;
use crate::repository::HttpRepository;
use crate::routes::{
    base_context, flash_dialog, redirect, render_template, send_dialog, service_error_response,
};
use crate::services::catalog::{CatalogRequest, load_catalog_page, transition_path};
use crate::services::leads::{purchase_lead, toggle_save};
use crate::session::{ActixSessionStore, SessionStore};

const INBOX_PATH: &str = "/leads-inbox";

#[get("/leads-inbox")]
pub async fn show_inbox(
    req: HttpRequest,
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());

    let form = CatalogQueryForm::parse(req.query_string()).unwrap_or_else(|e| {
        log::warn!("Ignoring malformed inbox query: {e}");
        CatalogQueryForm::default()
    });
    let filter = form.filter();
    let page = form.page();
    let request = CatalogRequest {
        return_to: inbox_path(&filter, page.unwrap_or(1)),
        confirm: form.confirm(),
        toggle_bhk: form.toggled_bhk(),
        reset: form.reset(),
        filter,
        page,
    };

    if request.is_transition() {
        return redirect(&transition_path(&request, server_config.page_size));
    }

    let data = match load_catalog_page(&repo, &store, request, server_config.page_size).await {
        Ok(data) => data,
        Err(err) => return service_error_response(err, &store, "/"),
    };

    let mut dialog = flash_dialog(&flash_messages);
    if let Some(confirm) = &data.confirm_dialog {
        dialog.show(confirm.clone());
    }

    let mut context = base_context(&flash_messages, "leads");
    context.insert("dialog", &dialog.current());
    context.insert("customer", &data.customer);
    context.insert("catalog", &data);
    context.insert("type_options", TYPE_OPTIONS);
    context.insert("sub_type_options", SUB_TYPE_OPTIONS);
    context.insert("area_options", AREA_OPTIONS);
    context.insert("occupancy_options", OCCUPANCY_OPTIONS);

    render_template(&tera, "leads/inbox.html", &context)
}

#[post("/leads/purchase")]
pub async fn purchase(
    session: Session,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<LeadActionForm>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());
    let return_to = form.return_path(INBOX_PATH);

    let lead_id = match form.lead_id() {
        Ok(lead_id) => lead_id,
        Err(e) => {
            log::warn!("Rejected purchase form: {e}");
            send_dialog(&Dialog::error("Purchase Failed", "Failed to purchase lead"));
            return redirect(&return_to);
        }
    };

    match purchase_lead(&repo, &store, &lead_id).await {
        Ok(dialog) => {
            send_dialog(&dialog);
            redirect(&return_to)
        }
        Err(err) => service_error_response(err, &store, &return_to),
    }
}

#[post("/leads/save")]
pub async fn save(
    session: Session,
    repo: web::Data<HttpRepository>,
    web::Form(form): web::Form<LeadActionForm>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let repo = repo.authorized(store.token().as_deref());
    let return_to = form.return_path(INBOX_PATH);

    let lead_id = match form.lead_id() {
        Ok(lead_id) => lead_id,
        Err(e) => {
            log::warn!("Rejected save form: {e}");
            send_dialog(&Dialog::error("Error", "Failed to update saved leads"));
            return redirect(&return_to);
        }
    };

    match toggle_save(&repo, &store, &lead_id).await {
        Ok(_) => redirect(&return_to),
        Err(err) => service_error_response(err, &store, &return_to),
    }
}
