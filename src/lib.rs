#[cfg(feature = "data")]
pub mod domain;
#[cfg(feature = "data")]
pub mod pagination;

#[cfg(feature = "server")]
pub mod dto;
#[cfg(feature = "server")]
pub mod forms;
#[cfg(feature = "server")]
pub mod middleware;
#[cfg(feature = "server")]
pub mod models;
#[cfg(feature = "server")]
pub mod repository;
#[cfg(feature = "server")]
pub mod routes;
#[cfg(feature = "server")]
pub mod services;
#[cfg(feature = "server")]
pub mod session;

#[cfg(feature = "server")]
pub use server::run;

#[cfg(feature = "server")]
mod server {
    use actix_cors::Cors;
    use actix_files::Files;
    use actix_session::{SessionMiddleware, storage::CookieSessionStore};
    use actix_web::cookie::Key;
    use actix_web::{App, HttpServer, middleware, web};
    use actix_web_flash_messages::{FlashMessagesFramework, storage::CookieMessageStore};
    use tera::Tera;

    use crate::middleware::RequireSession;
    use crate::models::config::ServerConfig;
    use crate::repository::HttpRepository;
    use crate::routes::auth::{login, logout, show_login};
    use crate::routes::contacted::show_contacted;
    use crate::routes::leads::{purchase, save, show_inbox};
    use crate::routes::main::show_index;
    use crate::routes::profile::show_profile;
    use crate::routes::saved::show_saved;

    /// Builds and runs the Actix-Web HTTP server using the provided configuration.
    pub async fn run(server_config: ServerConfig) -> std::io::Result<()> {
        let repo = HttpRepository::new(&server_config.api_url, server_config.request_timeout())
            .map_err(|e| std::io::Error::other(format!("Invalid backend configuration: {e}")))?;

        // Keys and stores for sessions and flash messages.
        let secret_key = Key::try_from(server_config.secret.as_bytes()).map_err(|e| {
            std::io::Error::other(format!("Secret must be at least 64 bytes long: {e}"))
        })?;

        let message_store = CookieMessageStore::builder(secret_key.clone()).build();
        let message_framework = FlashMessagesFramework::builder(message_store).build();

        let tera = Tera::new(&server_config.templates_dir)
            .map_err(|e| std::io::Error::other(format!("Template parsing error(s): {e}")))?;

        let bind_address = (server_config.address.clone(), server_config.port);
        log::info!(
            "Serving dashboard on {}:{} against {}",
            server_config.address,
            server_config.port,
            server_config.api_url
        );

        HttpServer::new(move || {
            App::new()
                .wrap(Cors::permissive())
                .wrap(message_framework.clone())
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), secret_key.clone())
                        .cookie_secure(false) // set to true in prod
                        .cookie_domain(
                            (!server_config.domain.is_empty())
                                .then(|| server_config.domain.clone()),
                        )
                        .build(),
                )
                .wrap(middleware::Compress::default())
                .wrap(middleware::Logger::default())
                .service(Files::new("/assets", "./assets"))
                .service(show_login)
                .service(login)
                .service(
                    web::scope("")
                        .wrap(RequireSession)
                        .service(show_index)
                        .service(show_inbox)
                        .service(purchase)
                        .service(save)
                        .service(show_saved)
                        .service(show_contacted)
                        .service(show_profile)
                        .service(logout),
                )
                .app_data(web::Data::new(tera.clone()))
                .app_data(web::Data::new(repo.clone()))
                .app_data(web::Data::new(server_config.clone()))
        })
        .bind(bind_address)?
        .run()
        .await
    }
}
