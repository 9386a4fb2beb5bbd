//! HTTP handlers and the helpers they share.

use actix_web::HttpResponse;
use actix_web::http::header;
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages, Level};
use tera::{Context, Tera};

use crate::domain::dialog::{Dialog, DialogKind, DialogSlot};
use crate::middleware::LOGIN_PATH;
use crate::services::ServiceError;
use crate::session::SessionStore;

pub mod auth;
pub mod contacted;
pub mod leads;
pub mod main;
pub mod profile;
pub mod saved;

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    match tera.render(template, context) {
        Ok(body) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(body),
        Err(e) => {
            log::error!("Failed to render template '{template}': {e}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

pub fn alert_level_to_dialog_kind(level: &Level) -> DialogKind {
    match level {
        Level::Error | Level::Warning => DialogKind::Error,
        Level::Success => DialogKind::Success,
        _ => DialogKind::Info,
    }
}

fn dialog_kind_to_level(kind: DialogKind) -> Level {
    match kind {
        DialogKind::Error => Level::Error,
        DialogKind::Success => Level::Success,
        DialogKind::Info | DialogKind::Confirm => Level::Info,
    }
}

/// Rebuilds a dialog from a flash message.
///
/// Messages sent with [`send_dialog`] carry the serialized dialog; any other
/// flash text becomes a plain dialog of the matching kind.
pub fn dialog_from_flash(content: &str, level: Level) -> Dialog {
    if let Ok(dialog) = serde_json::from_str::<Dialog>(content) {
        return dialog;
    }

    match alert_level_to_dialog_kind(&level) {
        DialogKind::Error => Dialog::error("Error", content),
        DialogKind::Success => Dialog::success("Success!", content),
        DialogKind::Info | DialogKind::Confirm => Dialog::info("Notice", content),
    }
}

/// Queues `dialog` for the page rendered after the next redirect.
pub fn send_dialog(dialog: &Dialog) {
    let level = dialog_kind_to_level(dialog.kind);
    match serde_json::to_string(dialog) {
        Ok(content) => FlashMessage::new(content, level).send(),
        Err(e) => {
            log::error!("Failed to encode dialog: {e}");
            FlashMessage::new(dialog.message.clone(), level).send();
        }
    }
}

/// Flash messages collapsed into the single dialog to display.
pub fn flash_dialog(flash_messages: &IncomingFlashMessages) -> DialogSlot {
    let mut slot = DialogSlot::default();
    for message in flash_messages.iter() {
        slot.show(dialog_from_flash(message.content(), message.level()));
    }
    slot
}

pub fn base_context(flash_messages: &IncomingFlashMessages, current_page: &str) -> Context {
    let slot = flash_dialog(flash_messages);
    let mut context = Context::new();
    context.insert("dialog", &slot.current());
    context.insert("current_page", current_page);
    context
}

/// Turns a failed page action into a response.
///
/// A rejected session is dropped and the browser sent to the login page;
/// anything else is reported in an error dialog on `fallback`.
pub fn service_error_response<S>(err: ServiceError, store: &S, fallback: &str) -> HttpResponse
where
    S: SessionStore + ?Sized,
{
    match err {
        ServiceError::Unauthorized => {
            log::info!("Session rejected, redirecting to login");
            store.clear();
            redirect(LOGIN_PATH)
        }
        other => {
            log::error!("Request failed: {other}");
            send_dialog(&Dialog::error("Error", other.to_string()));
            redirect(fallback)
        }
    }
}
