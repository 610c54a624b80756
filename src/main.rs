use actix::Actor;
use actix_cors::Cors;
use actix_web::{
    self, http::header, middleware::{from_fn, Logger}, web, App, HttpServer,
};
use std::sync::Arc;

use crate::{
    configs::{connect_database, AuthConfig, StorageConfig},
    constants::Env,
    middlewares::authentication,
    modules::{
        conversation::{repository_pg::ConversationRepositoryPg, service::ConversationService},
        listing::{repository_pg::ListingRepositoryPg, service::ListingService, storage::StorageBucket},
        message::repository_pg::MessageRepositoryPg,
        offer::{repository_pg::OfferRepositoryPg, service::OfferService},
        realtime::{hub::RealtimeHub, Broadcaster},
        saved_property::{repository_pg::SavedPropertyRepositoryPg, service::SavedPropertyService},
        viewing_request::{repository_pg::ViewingRequestRepositoryPg, service::ViewingRequestService},
    },
};

mod api;
mod configs;
mod constants;
mod middlewares;
mod modules;
mod utils;

#[actix_web::get("/")]
async fn health_check() -> &'static str {
    "Server is running"
}

/// Authenticated routes mounted under `/api`.
pub fn api_configure(cfg: &mut web::ServiceConfig) {
    cfg.configure(modules::listing::route::configure)
        .configure(modules::saved_property::route::configure)
        .configure(modules::conversation::route::configure)
        .configure(modules::viewing_request::route::configure)
        .configure(modules::offer::route::configure)
        .service(modules::realtime::handler::subscribe);
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let env = Env::load().map_err(|e| std::io::Error::other(e.to_string()))?;
    env_logger::init();
    log::info!("Environment variables loaded");

    let db_pool = connect_database(&env).await.map_err(|e| {
        log::error!("Database connection error: {}", e);
        std::io::Error::other("Database connection error")
    })?;

    let auth_config = AuthConfig::from(&env);
    let storage = Arc::new(StorageBucket::new(StorageConfig::from(&env)));
    let storage_base_url = storage.config().base_url.clone();

    let hub = RealtimeHub::new().start();
    let broadcaster: Arc<dyn Broadcaster> = Arc::new(hub.clone());

    let listing_repo = Arc::new(ListingRepositoryPg::new(db_pool.clone()));
    let saved_repo = Arc::new(SavedPropertyRepositoryPg::new(db_pool.clone()));
    let conversation_repo = Arc::new(ConversationRepositoryPg::new(db_pool.clone()));
    let message_repo = Arc::new(MessageRepositoryPg::new(db_pool.clone()));
    let viewing_repo = Arc::new(ViewingRequestRepositoryPg::new(db_pool.clone()));
    let offer_repo = Arc::new(OfferRepositoryPg::new(db_pool.clone()));

    let listing_service = ListingService::with_dependencies(listing_repo.clone(), storage);
    let saved_service = SavedPropertyService::with_dependencies(saved_repo, listing_repo.clone());
    let conversation_service = ConversationService::with_dependencies(
        conversation_repo,
        message_repo,
        listing_repo.clone(),
        broadcaster.clone(),
    );
    let viewing_service = ViewingRequestService::with_dependencies(
        viewing_repo,
        listing_repo.clone(),
        conversation_service.clone(),
        broadcaster.clone(),
    );
    let offer_service = OfferService::with_dependencies(
        offer_repo,
        listing_repo,
        conversation_service.clone(),
        broadcaster,
    );

    let frontend_url = env.frontend_url.clone();

    log::info!("Starting server at http://{}:{}", env.ip, env.port);
    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_url)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
            .allowed_header("X-User-Id")
            .supports_credentials()
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(web::Data::new(auth_config.clone()))
            .app_data(web::Data::new(hub.clone()))
            .app_data(web::Data::new(listing_service.clone()))
            .app_data(web::Data::new(saved_service.clone()))
            .app_data(web::Data::new(conversation_service.clone()))
            .app_data(web::Data::new(viewing_service.clone()))
            .app_data(web::Data::new(offer_service.clone()))
            .service(health_check)
            .service(
                web::scope(&storage_base_url).configure(modules::listing::route::storage_configure),
            )
            .service(web::scope("/api").wrap(from_fn(authentication)).configure(api_configure))
    })
    .bind((env.ip.as_str(), env.port))?
    .workers(env.workers)
    .run()
    .await
}
