pub mod handlers;
pub mod middleware;

use crate::domain::interface::*;
use crate::domain::service::TweetService;
use crate::initializer::AppContext;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{delete, get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct ApiState {
    pub tweet: TweetService,
    pub authenticator: Arc<dyn IAuthenticator + Send + Sync>,
    pub translator: Arc<dyn ITranslator + Send + Sync>,
}

impl From<&AppContext> for ApiState {
    fn from(app: &AppContext) -> Self {
        ApiState {
            tweet: app.services.tweet.clone(),
            authenticator: app.infras.authenticator.clone(),
            translator: app.infras.translator.clone(),
        }
    }
}

/// The tweet routes, relative to wherever the caller mounts them.
pub fn router(state: ApiState) -> Router {
    let public = Router::new()
        .route("/get-one/:id", get(handlers::get_one))
        .route("/user", get(handlers::list_by_user));

    let protected = Router::new()
        .route("/", get(handlers::list))
        .route(
            "/",
            post(handlers::create).layer(from_fn(middleware::validate_tweet)),
        )
        .route(
            "/",
            delete(handlers::destroy).layer(from_fn_with_state(
                state.clone(),
                middleware::authorize_owner,
            )),
        )
        .route("/user/:username", get(handlers::user_tweets))
        .route(
            "/comments",
            post(handlers::comment).layer(from_fn(middleware::validate_comment)),
        )
        .route("/likes", post(handlers::like))
        .route("/external/:username", get(handlers::external))
        .route_layer(from_fn_with_state(state.clone(), middleware::authenticate));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::*;
    use crate::infra::{JsonCatalog, TokenAuthenticator};
    use crate::repository::{TweetRepository, UserRepository};
    use crate::test_util::{self, FailingTweetRepository, StaticTweetSource};
    use axum::body::Body;
    use axum::http::{header, Method, Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    struct TestApp {
        _dir: tempfile::TempDir,
        router: Router,
        users: Arc<UserRepository>,
    }

    async fn app() -> TestApp {
        app_with_store(None).await
    }

    async fn app_with_store(store: Option<Arc<dyn ITweetRepository + Send + Sync>>) -> TestApp {
        let (dir, db) = test_util::temp_db().await;
        let users = Arc::new(UserRepository::new(db.clone()));
        let tweets: Arc<dyn ITweetRepository + Send + Sync> = match store {
            Some(store) => store,
            None => Arc::new(TweetRepository::new(db)),
        };
        let translator = Arc::new(JsonCatalog::builtin("en").unwrap());
        let source = StaticTweetSource(vec![ExternalTweet {
            text: "elsewhere".to_string(),
            created_at: Some("2022-11-14T10:37:33.000Z".to_string()),
        }]);
        let state = ApiState {
            tweet: TweetService::new(
                tweets,
                users.clone(),
                Arc::new(source),
                translator.clone(),
            ),
            authenticator: Arc::new(
                TokenAuthenticator::from_spec("token-1=u1,token-2=u2").unwrap(),
            ),
            translator,
        };
        TestApp {
            _dir: dir,
            router: router(state),
            users,
        }
    }

    fn request(method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Request<Body> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn send(app: &TestApp, req: Request<Body>) -> (StatusCode, Value) {
        let resp = app.router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = hyper::body::to_bytes(resp.into_body()).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    async fn create(app: &TestApp, token: &str, user: &str, content: &str) -> Value {
        let (status, body) = send(
            app,
            request(
                Method::POST,
                "/",
                Some(token),
                Some(json!({"content": content, "userId": user})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body
    }

    #[tokio::test]
    async fn create_returns_the_new_tweet() {
        let app = app().await;
        let body = create(&app, "token-1", "u1", "hello").await;
        assert_eq!(body["content"], json!("hello"));
        assert_eq!(body["user"], json!("u1"));
        assert_eq!(body["likes"], json!(0));
        assert_eq!(body["comments"], json!([]));
        assert!(body["id"].as_str().map_or(false, |id| !id.is_empty()));
        assert!(body.get("createdAt").is_some());

        let uri = format!("/get-one/{}", body["id"].as_str().unwrap());
        let (status, found) = send(&app, request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(found["tweet"]["content"], json!("hello"));
    }

    #[tokio::test]
    async fn missing_tweets_are_reported_under_tweet() {
        let app = app().await;
        let (status, body) = send(&app, request(Method::GET, "/get-one/nope", None, None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"tweet": "Tweet not found"}));
    }

    #[tokio::test]
    async fn deleting_someone_elses_tweet_is_not_found() {
        let app = app().await;
        let tweet = create(&app, "token-1", "u1", "mine").await;
        let id = tweet["id"].clone();

        let (status, body) = send(
            &app,
            request(
                Method::DELETE,
                "/",
                Some("token-2"),
                Some(json!({"tweetId": id, "userId": "u2"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "Tweet does not exist"}));

        let (status, body) = send(
            &app,
            request(
                Method::DELETE,
                "/",
                Some("token-1"),
                Some(json!({"tweetId": id, "userId": "u1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Tweet deleted successfully", "id": id}));
    }

    #[tokio::test]
    async fn deleting_for_another_user_is_forbidden() {
        let app = app().await;
        let tweet = create(&app, "token-1", "u1", "mine").await;

        let (status, body) = send(
            &app,
            request(
                Method::DELETE,
                "/",
                Some("token-2"),
                Some(json!({"tweetId": tweet["id"], "userId": "u1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(
            body,
            json!({"message": "You are not allowed to perform this action"})
        );
    }

    #[tokio::test]
    async fn unknown_usernames_are_localized() {
        let app = app().await;
        let (status, body) =
            send(&app, request(Method::GET, "/user/nobody", Some("token-1"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({"message": "User does not exist"}));
    }

    #[tokio::test]
    async fn user_profiles_come_with_their_tweets() {
        let app = app().await;
        let ann = User::new("Ann".to_string(), "ann".to_string(), "ann@example.com".to_string());
        app.users.save(ann.clone()).await.unwrap();
        create(&app, "token-1", &ann.id.0, "first").await;

        let (status, body) = send(
            &app,
            request(Method::GET, "/user/ann?page=1&limit=5", Some("token-1"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["user"]["username"], json!("ann"));
        assert_eq!(body["userTweets"]["tweets"][0]["content"], json!("first"));
        assert_eq!(body["userTweets"]["total"], json!(1));
        assert_eq!(body["userTweets"]["currentPage"], json!(1));

        let uri = format!("/user?id={}", ann.id);
        let (status, body) = send(&app, request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"][0]["user"]["name"], json!("Ann"));
    }

    #[tokio::test]
    async fn protected_routes_need_a_known_token() {
        let app = app().await;
        for token in [None, Some("wrong")] {
            let (status, body) = send(&app, request(Method::GET, "/", token, None)).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED);
            assert_eq!(body, json!({"message": "Authentication required"}));
        }
        let (status, _) = send(&app, request(Method::GET, "/", Some("token-1"), None)).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn payloads_are_validated() {
        let app = app().await;
        let (status, body) = send(
            &app,
            request(Method::POST, "/", Some("token-1"), Some(json!({"userId": "u1"}))),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "\"content\" is required"}));

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/comments",
                Some("token-1"),
                Some(json!({"comment": "hi", "userId": "u1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"message": "\"tweetId\" is required"}));

        let (status, _) = send(
            &app,
            request(Method::GET, "/?page=abc", Some("token-1"), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn comments_and_likes_are_acknowledged() {
        let app = app().await;
        let tweet = create(&app, "token-1", "u1", "hello").await;

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/comments",
                Some("token-2"),
                Some(json!({"comment": "nice", "tweetId": tweet["id"], "userId": "u2"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "ok", "comment": "nice", "user": "u2"}));

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/likes",
                Some("token-2"),
                Some(json!({"tweetId": tweet["id"], "like": true})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "ok"}));

        let (_, list) = send(&app, request(Method::GET, "/", Some("token-1"), None)).await;
        assert_eq!(list["total"], json!(1));
        assert_eq!(list["data"][0]["likes"], json!(1));
        assert_eq!(list["data"][0]["comments"][0]["comment"], json!("nice"));
    }

    #[tokio::test]
    async fn external_tweets_pass_through() {
        let app = app().await;
        let (status, body) = send(
            &app,
            request(Method::GET, "/external/jack", Some("token-1"), None),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!([{"text": "elsewhere", "created_at": "2022-11-14T10:37:33.000Z"}])
        );
    }

    #[tokio::test]
    async fn huge_page_numbers_are_clamped() {
        let app = app().await;
        create(&app, "token-1", "u1", "hello").await;

        let uri = format!("/user?id=u1&page={}", i64::MAX);
        let (status, body) = send(&app, request(Method::GET, &uri, None, None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["currentPage"], json!(MAX_PAGE));
        assert_eq!(body["hasMore"], json!(false));

        let uri = format!("/?page={}&limit=100", i64::MAX);
        let (status, body) = send(&app, request(Method::GET, &uri, Some("token-1"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["total"], json!(1));
        assert_eq!(body["data"], json!([]));
    }

    #[tokio::test]
    async fn store_failures_keep_their_message() {
        let app = app_with_store(Some(Arc::new(FailingTweetRepository))).await;

        let (status, body) = send(
            &app,
            request(
                Method::POST,
                "/likes",
                Some("token-1"),
                Some(json!({"tweetId": "t1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "not updated"}));

        let (status, body) = send(
            &app,
            request(
                Method::DELETE,
                "/",
                Some("token-1"),
                Some(json!({"tweetId": "t1", "userId": "u1"})),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Tweet could not be deleted"}));

        // no explicit message, so only the error type is shown
        let (status, body) = send(&app, request(Method::GET, "/", Some("token-1"), None)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "db_error"}));
    }
}
