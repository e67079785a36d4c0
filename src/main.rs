use std::{io, sync::Mutex};

use actix_web::{middleware::Logger, web::{self, Data}, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use creative_network::{
    config::Config,
    configure,
    db::{store::Store, DB},
    mentor::Mentor,
    moderation::{Moderator, Sentiment},
    not_found,
    rag::Corpus,
};

fn startup_error(e: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> io::Error {
    io::Error::new(io::ErrorKind::Other, e)
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load().map_err(startup_error)?;

    let sentiment = match &config.sentiment_lexicon {
        Some(path) => {
            let lexicon = Sentiment::load(path)?;
            info!("Loaded {} sentiment entries from {}", lexicon.len(), path.display());
            lexicon
        }
        None => Sentiment::default(),
    };
    let corpus = Corpus::load(&config.rag_corpus_path).map_err(startup_error)?;

    let db = Data::new(Mutex::new(DB::load(Store::open(&config.store_dir))));
    let moderator = Data::new(Moderator::new(sentiment));
    let corpus = Data::new(corpus);
    let mentor = Data::new(Mentor::new(config.llm.clone()));

    info!("Listening on {}:{}", config.bind_address, config.port);
    HttpServer::new(move || {
        App::new()
            .configure(configure)
            .app_data(db.clone())
            .app_data(moderator.clone())
            .app_data(corpus.clone())
            .app_data(mentor.clone())
            .wrap(Logger::default())
            .default_service(web::to(not_found))
    })
    .bind((config.bind_address.as_str(), config.port))?
    .run()
    .await
}
