//! CLI module for the `ansari` binary.
//!
//! This module provides the command-line front end:
//! - Argument parsing
//! - Version display
//! - Auth and service setup from the environment
//! - Command execution against a [`ChatService`]
//!
//! # Usage
//!
//! ```ignore
//! use ansari_client::cli::{parse_args, run_cli_command, service_from_env};
//!
//! let command = parse_args(std::env::args())?;
//! let service = service_from_env().await?;
//! run_cli_command(&service, command, CancellationToken::new(), &mut std::io::stdout()).await?;
//! ```

pub mod args;
pub mod version;

pub use args::{parse_args, ArgsError, CliCommand, USAGE};
pub use version::{version_line, VERSION};

use color_eyre::eyre::WrapErr;
use color_eyre::Result;
use futures_util::StreamExt;
use std::io::Write;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::adapters::{ReqwestHttpClient, SessionAuth, StaticAuth};
use crate::config::ClientConfig;
use crate::error::{ChatError, NetworkError};
use crate::models::{AddMessageRequest, Thread, ThreadNameRequest};
use crate::service::ChatService;
use crate::traits::AuthProvider;

/// Environment variable holding the access token.
pub const ENV_TOKEN: &str = "ANSARI_TOKEN";

/// Environment variable holding the refresh token.
pub const ENV_REFRESH_TOKEN: &str = "ANSARI_REFRESH_TOKEN";

/// Environment variable holding the auth server base URL.
pub const ENV_AUTH_URL: &str = "ANSARI_AUTH_URL";

fn env_value(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Pick the auth provider the environment describes.
///
/// With a refresh token the session refreshes itself (immediately, when no
/// access token is given); with only an access token it is used as is;
/// with neither every command fails as signed out.
pub async fn auth_from_env(config: &ClientConfig) -> Result<Arc<dyn AuthProvider>> {
    let token = env_value(ENV_TOKEN);
    let refresh_token = env_value(ENV_REFRESH_TOKEN);

    let auth: Arc<dyn AuthProvider> = match (token, refresh_token) {
        (token, Some(refresh_token)) => {
            let auth_url = env_value(ENV_AUTH_URL).unwrap_or_else(|| config.base_url.clone());
            let http = ReqwestHttpClient::from_config(config)
                .wrap_err("failed to create HTTP client")?;
            tracing::debug!(%auth_url, "using refreshable session");

            let has_access_token = token.is_some();
            let session = SessionAuth::new(
                Arc::new(http),
                &auth_url,
                token.unwrap_or_default(),
                refresh_token,
            );
            if !has_access_token {
                session
                    .refresh()
                    .await
                    .wrap_err("failed to obtain an access token")?;
            }
            Arc::new(session)
        }
        (Some(token), None) => Arc::new(StaticAuth::new(token)),
        (None, None) => {
            tracing::warn!("{} is not set", ENV_TOKEN);
            Arc::new(StaticAuth::anonymous())
        }
    };
    Ok(auth)
}

/// Build the service from `ClientConfig::from_env` and [`auth_from_env`].
pub async fn service_from_env() -> Result<ChatService> {
    let config = ClientConfig::from_env();
    let auth = auth_from_env(&config).await?;
    ChatService::from_config(config, auth).wrap_err("failed to create chat service")
}

/// Execute `command`, writing its output to `out`.
///
/// Firing `cancel` abandons a pending request with a cancellation error.
/// Once a reply has started streaming it ends the reply instead; whatever
/// arrived before stays printed.
pub async fn run_cli_command<W: Write>(
    service: &ChatService,
    command: CliCommand,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<()> {
    if matches!(command, CliCommand::Send { .. }) {
        return execute(service, command, cancel, out).await;
    }

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(ChatError::from(NetworkError::Cancelled).into()),
        result = execute(service, command, cancel.clone(), out) => result,
    }
}

async fn execute<W: Write>(
    service: &ChatService,
    command: CliCommand,
    cancel: CancellationToken,
    out: &mut W,
) -> Result<()> {
    match command {
        CliCommand::Version => writeln!(out, "{}", version_line())?,
        CliCommand::Help => writeln!(out, "{}", USAGE)?,
        CliCommand::Threads => {
            for thread in service.get_all_threads().await? {
                writeln!(out, "{}", thread_line(&thread))?;
            }
        }
        CliCommand::Show { thread_id } => {
            let thread = service.get_thread(&thread_id).await?;
            write_thread(out, &thread)?;
        }
        CliCommand::New => {
            let thread = service.create_thread().await?;
            writeln!(out, "{}", thread.id)?;
        }
        CliCommand::Send { thread_id, text } => {
            let message = AddMessageRequest::user(text);
            let mut fragments = service
                .stream_reply(&thread_id, &message, cancel.clone())
                .await?;
            while let Some(fragment) = fragments.next().await {
                write!(out, "{}", fragment?)?;
                out.flush()?;
            }
            writeln!(out)?;
            if cancel.is_cancelled() {
                tracing::info!(%thread_id, "reply cancelled");
            }
        }
        CliCommand::Rename { thread_id, name } => {
            service
                .set_thread_name(&thread_id, &ThreadNameRequest::new(name))
                .await?;
            writeln!(out, "Renamed thread {}", thread_id)?;
        }
        CliCommand::Delete { thread_id } => {
            service.delete_thread(&thread_id).await?;
            writeln!(out, "Deleted thread {}", thread_id)?;
        }
        CliCommand::Feedback {
            thread_id,
            message_id,
            class,
            comment,
        } => {
            service
                .send_feedback(&thread_id, &message_id, class, &comment)
                .await;
            writeln!(out, "Feedback sent")?;
        }
    }
    Ok(())
}

fn thread_line(thread: &Thread) -> String {
    let date = thread
        .date
        .map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!("{}\t{}\t{}", thread.id, date, thread.name)
}

fn write_thread<W: Write>(out: &mut W, thread: &Thread) -> std::io::Result<()> {
    writeln!(out, "{} ({})", thread.name, thread.id)?;
    for message in &thread.messages {
        match message.text() {
            Some(text) => writeln!(out, "[{}] {}", message.role, text)?,
            None => writeln!(out, "[{}] {}", message.role, message.content)?,
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::mock::{MockAuthProvider, MockHttpClient, MockResponse};
    use crate::traits::Method;
    use bytes::Bytes;
    use serde_json::json;
    use serial_test::serial;
    use std::time::{Duration, Instant};
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BASE: &str = "http://api.test";

    fn service(http: &MockHttpClient) -> ChatService {
        ChatService::new(
            Arc::new(http.clone()),
            Arc::new(MockAuthProvider::authenticated("tok")),
            ClientConfig::default().with_base_url(BASE),
        )
    }

    async fn run(http: &MockHttpClient, command: CliCommand) -> (Result<()>, String) {
        let mut out = Vec::new();
        let result = run_cli_command(&service(http), command, CancellationToken::new(), &mut out).await;
        (result, String::from_utf8(out).unwrap())
    }

    #[tokio::test]
    async fn test_threads_lists_one_per_line() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Get,
            "http://api.test/threads",
            MockResponse::json(
                200,
                json!([
                    {"thread_id": 1, "thread_name": "Fasting", "updated_at": "2024-03-11T18:05:00Z"},
                    {"thread_id": 2}
                ]),
            ),
        );

        let (result, out) = run(&http, CliCommand::Threads).await;
        result.unwrap();
        assert_eq!(out, "1\t2024-03-11 18:05\tFasting\n2\t-\tNew chat\n");
    }

    #[tokio::test]
    async fn test_show_prints_messages() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Get,
            "http://api.test/threads/1",
            MockResponse::json(
                200,
                json!({"thread_name": "Fasting", "messages": [
                    {"role": "user", "content": "When is iftar?"},
                    {"role": "assistant", "content": "At sunset."}
                ]}),
            ),
        );

        let (result, out) = run(
            &http,
            CliCommand::Show {
                thread_id: "1".to_string(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(
            out,
            "Fasting (1)\n[user] When is iftar?\n[assistant] At sunset.\n"
        );
    }

    #[tokio::test]
    async fn test_send_streams_reply() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Post,
            "http://api.test/threads/1",
            MockResponse::Stream(vec![Bytes::from_static(b"At "), Bytes::from_static(b"sunset.")]),
        );

        let (result, out) = run(
            &http,
            CliCommand::Send {
                thread_id: "1".to_string(),
                text: "When is iftar?".to_string(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(out, "At sunset.\n");
    }

    #[tokio::test]
    async fn test_send_cancelled_mid_reply_keeps_partial_output() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Post,
            "http://api.test/threads/1",
            MockResponse::StreamThenHang(vec![Bytes::from_static(b"At ")]),
        );

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(50)).await;
            trigger.cancel();
        });

        let mut out = Vec::new();
        let command = CliCommand::Send {
            thread_id: "1".to_string(),
            text: "When is iftar?".to_string(),
        };
        run_cli_command(&service(&http), command, cancel, &mut out)
            .await
            .expect("a cancelled reply ends quietly");

        assert_eq!(String::from_utf8(out).unwrap(), "At \n");
        assert_eq!(http.open_streams(), 0);
    }

    #[tokio::test]
    async fn test_new_prints_id() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Post,
            "http://api.test/threads",
            MockResponse::json(200, json!({"thread_id": 77})),
        );

        let (result, out) = run(&http, CliCommand::New).await;
        result.unwrap();
        assert_eq!(out, "77\n");
    }

    #[tokio::test]
    async fn test_failure_is_reported() {
        let http = MockHttpClient::new();
        http.set_response(
            Method::Delete,
            "http://api.test/threads/1",
            MockResponse::status(500, ""),
        );

        let (result, out) = run(
            &http,
            CliCommand::Delete {
                thread_id: "1".to_string(),
            },
        )
        .await;
        assert!(result.is_err());
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_feedback_always_succeeds() {
        let http = MockHttpClient::new();
        let (result, out) = run(
            &http,
            CliCommand::Feedback {
                thread_id: "1".to_string(),
                message_id: "2".to_string(),
                class: crate::models::FeedbackClass::Redo,
                comment: String::new(),
            },
        )
        .await;
        result.unwrap();
        assert_eq!(out, "Feedback sent\n");
    }

    #[tokio::test]
    #[serial]
    async fn test_auth_from_env_static_token() {
        std::env::set_var(ENV_TOKEN, "env-token");
        std::env::remove_var(ENV_REFRESH_TOKEN);

        let auth = auth_from_env(&ClientConfig::default()).await.unwrap();
        assert_eq!(auth.current().bearer_token(), Some("env-token"));

        std::env::remove_var(ENV_TOKEN);
    }

    #[tokio::test]
    #[serial]
    async fn test_auth_from_env_nothing_set() {
        std::env::remove_var(ENV_TOKEN);
        std::env::remove_var(ENV_REFRESH_TOKEN);

        let auth = auth_from_env(&ClientConfig::default()).await.unwrap();
        assert!(!auth.current().is_authenticated);
    }

    #[tokio::test]
    #[serial]
    async fn test_auth_from_env_refresh_only_refreshes_up_front() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .and(body_json(json!({"refresh_token": "r0"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "a1",
                "refresh_token": "r1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        std::env::remove_var(ENV_TOKEN);
        std::env::set_var(ENV_REFRESH_TOKEN, "r0");
        std::env::set_var(ENV_AUTH_URL, server.uri());

        let result = auth_from_env(&ClientConfig::default()).await;

        std::env::remove_var(ENV_REFRESH_TOKEN);
        std::env::remove_var(ENV_AUTH_URL);

        let auth = result.expect("refresh should succeed");
        let context = auth.current();
        assert!(context.is_authenticated);
        assert_eq!(context.bearer_token(), Some("a1"));
        server.verify().await;
    }

    #[tokio::test]
    #[serial]
    async fn test_auth_from_env_rejected_refresh_fails_setup() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/refresh"))
            .respond_with(ResponseTemplate::new(401))
            .expect(1)
            .mount(&server)
            .await;

        std::env::remove_var(ENV_TOKEN);
        std::env::set_var(ENV_REFRESH_TOKEN, "r0");
        std::env::set_var(ENV_AUTH_URL, server.uri());

        let result = auth_from_env(&ClientConfig::default()).await;

        std::env::remove_var(ENV_REFRESH_TOKEN);
        std::env::remove_var(ENV_AUTH_URL);

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_cancelled_command_sends_nothing() {
        let http = MockHttpClient::new();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let mut out = Vec::new();
        let err = run_cli_command(
            &service(&http),
            CliCommand::Delete {
                thread_id: "1".to_string(),
            },
            cancel,
            &mut out,
        )
        .await
        .unwrap_err();

        assert!(err.downcast_ref::<ChatError>().is_some_and(ChatError::is_cancelled));
        assert_eq!(http.request_count(), 0);
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn test_cancel_interrupts_pending_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/threads"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(10)),
            )
            .mount(&server)
            .await;
        let service = ChatService::from_config(
            ClientConfig::default().with_base_url(server.uri()),
            Arc::new(MockAuthProvider::authenticated("tok")),
        )
        .unwrap();

        let cancel = CancellationToken::new();
        let trigger = cancel.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            trigger.cancel();
        });

        let started = Instant::now();
        let mut out = Vec::new();
        let err = run_cli_command(&service, CliCommand::Threads, cancel, &mut out)
            .await
            .unwrap_err();

        assert!(err.downcast_ref::<ChatError>().is_some_and(ChatError::is_cancelled));
        assert!(started.elapsed() < Duration::from_secs(5));
        assert!(out.is_empty());
    }
}
