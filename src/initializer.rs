use crate::domain::interface::*;
use crate::domain::service;
use crate::error::Result;
use crate::infra;
use crate::repository;
use std::sync::Arc;

#[derive(Clone, Debug)]
pub struct Config {
    pub db_url: String,
    pub db_pool_size: u32,
    pub bearer_token: String,
    pub twitter_api_url: String,
    pub locale: String,
    pub auth_tokens: String,
}

#[derive(Clone)]
pub struct Infras {
    pub db: infra::DBConnector,
    pub http_client: Arc<infra::HttpClient>,
    pub translator: Arc<dyn ITranslator + Send + Sync>,
    pub authenticator: Arc<dyn IAuthenticator + Send + Sync>,
}

impl Infras {
    pub async fn ensure_initialized(&self) -> Result<()> {
        self.db.ensure_initialized().await
    }
}

pub fn infras(config: &Config) -> Result<Infras> {
    let db_executor = infra::DBExecutor::new(config.db_url.clone(), config.db_pool_size);
    let db_connector = infra::DBConnector::new(db_executor);
    let http_client = Arc::new(infra::HttpClient::new());
    let translator = Arc::new(infra::JsonCatalog::builtin(&config.locale)?);
    let authenticator = Arc::new(infra::TokenAuthenticator::from_spec(&config.auth_tokens)?);
    if authenticator.is_empty() {
        tracing::warn!("no auth tokens configured, protected routes will reject every request");
    } else {
        tracing::info!(tokens = authenticator.len(), "auth tokens loaded");
    }
    Ok(Infras {
        db: db_connector,
        http_client,
        translator,
        authenticator,
    })
}

#[derive(Clone)]
pub struct Repository {
    pub tweet: Arc<repository::TweetRepository>,
    pub user: Arc<repository::UserRepository>,
    pub tweet_source: Arc<repository::TwitterTweetSource>,
}

pub fn repository(infras: &Infras, config: &Config) -> Result<Repository> {
    let tweet = Arc::new(repository::TweetRepository::new(infras.db.clone()));
    let user = Arc::new(repository::UserRepository::new(infras.db.clone()));
    let tweet_source = Arc::new(repository::TwitterTweetSource::new(
        infras.http_client.clone(),
        config.bearer_token.clone(),
        &config.twitter_api_url,
    )?);
    Ok(Repository {
        tweet,
        user,
        tweet_source,
    })
}

#[derive(Clone)]
pub struct Services {
    pub tweet: service::TweetService,
}

#[derive(Clone)]
pub struct AppContext {
    pub infras: Infras,
    pub repository: Repository,
    pub services: Services,
}

pub fn new(config: Config) -> Result<AppContext> {
    let infras = infras(&config)?;
    let repository = repository(&infras, &config)?;
    let services = Services {
        tweet: service::TweetService::new(
            repository.tweet.clone(),
            repository.user.clone(),
            repository.tweet_source.clone(),
            infras.translator.clone(),
        ),
    };
    Ok(AppContext {
        infras,
        repository,
        services,
    })
}
