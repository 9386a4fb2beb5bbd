use actix_session::Session;
use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::IncomingFlashMessages;
use tera::Tera;

use crate::forms::auth::LoginForm;
use crate::middleware::LOGIN_PATH;
use crate::repository::HttpRepository;
use crate::routes::{base_context, redirect, render_template};
use crate::services::auth::{self, login_error_message};
use crate::session::{ActixSessionStore, SessionStore};

#[get("/login")]
pub async fn show_login(
    session: Session,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    if store.is_logged_in() {
        return redirect("/");
    }

    let context = base_context(&flash_messages, "login");
    render_template(&tera, "auth/login.html", &context)
}

#[post("/login")]
pub async fn login(
    session: Session,
    repo: web::Data<HttpRepository>,
    flash_messages: IncomingFlashMessages,
    tera: web::Data<Tera>,
    web::Form(form): web::Form<LoginForm>,
) -> impl Responder {
    let store = ActixSessionStore::new(session);
    let number = form.number.clone();

    match auth::login(repo.get_ref(), &store, form).await {
        Ok(_) => redirect("/"),
        Err(err) => {
            let mut context = base_context(&flash_messages, "login");
            context.insert("login_error", &login_error_message(&err));
            context.insert("number", &number);
            render_template(&tera, "auth/login.html", &context)
        }
    }
}

#[post("/logout")]
pub async fn logout(session: Session) -> HttpResponse {
    let store = ActixSessionStore::new(session);
    auth::logout(&store);
    redirect(LOGIN_PATH)
}
