//! Installed-app consent flow over a loopback redirect, plus the token endpoint calls.

use crate::sheets::token::{ClientSecret, TokenResponse, READONLY_SCOPE};
use crate::sheets::SheetsError;
use reqwest::blocking::Client;
use reqwest::Url;
use std::io::{BufRead, BufReader, ErrorKind, Write};
use std::net::{TcpListener, TcpStream};
use std::time::{Duration, Instant};

/// How long a load waits for the operator to finish consent. The controller is locked meanwhile.
const CONSENT_TIMEOUT: Duration = Duration::from_secs(300);
const ACCEPT_POLL: Duration = Duration::from_millis(200);
const REDIRECT_READ_TIMEOUT: Duration = Duration::from_secs(10);

const CONSENT_DONE_PAGE: &str = "<html><body><p>Authentication complete. You may close this window.</p></body></html>";

/// What the browser sent back to the loopback listener.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Redirect {
    Code { code: String, state: Option<String> },
    Denied(String),
    /// Unrelated request (favicon and the like).
    Other,
}

/// Consent page URL for the read-only spreadsheet scope.
pub fn consent_url(
    secret: &ClientSecret,
    redirect_uri: &str,
    state: &str,
) -> Result<Url, SheetsError> {
    Url::parse_with_params(
        &secret.auth_uri,
        &[
            ("client_id", secret.client_id.as_str()),
            ("redirect_uri", redirect_uri),
            ("response_type", "code"),
            ("scope", READONLY_SCOPE),
            ("access_type", "offline"),
            ("prompt", "consent"),
            ("state", state),
        ],
    )
    .map_err(|e| SheetsError::InvalidUrl {
        url: secret.auth_uri.clone(),
        reason: e.to_string(),
    })
}

/// Parse an HTTP request line such as `GET /?state=x&code=y HTTP/1.1`.
pub fn parse_redirect(request_line: &str) -> Redirect {
    let Some(target) = request_line.split_whitespace().nth(1) else {
        return Redirect::Other;
    };
    let Ok(url) = Url::parse(&format!("http://127.0.0.1{}", target)) else {
        return Redirect::Other;
    };
    let mut code = None;
    let mut state = None;
    for (key, value) in url.query_pairs() {
        match key.as_ref() {
            "code" => code = Some(value.into_owned()),
            "state" => state = Some(value.into_owned()),
            "error" => return Redirect::Denied(value.into_owned()),
            _ => {}
        }
    }
    match code {
        Some(code) => Redirect::Code { code, state },
        None => Redirect::Other,
    }
}

/// Run the consent flow and exchange the code. Blocks until the browser comes back or the wait times out.
pub(crate) fn run_installed_flow(
    http: &Client,
    secret: &ClientSecret,
) -> Result<TokenResponse, SheetsError> {
    let listener = TcpListener::bind(("127.0.0.1", 0)).map_err(SheetsError::Listener)?;
    let port = listener.local_addr().map_err(SheetsError::Listener)?.port();
    let redirect_uri = format!("http://127.0.0.1:{}/", port);
    let state = uuid::Uuid::new_v4().simple().to_string();
    let url = consent_url(secret, &redirect_uri, &state)?;
    log::warn!("Spreadsheet access needs consent. Open this URL in a browser: {}", url);
    if let Err(e) = webbrowser::open(url.as_str()) {
        log::warn!("Could not open a browser ({}); use the URL above", e);
    }

    let code = await_redirect(&listener, &state, CONSENT_TIMEOUT)?;

    log::info!("Consent received, exchanging authorization code");
    post_token(
        http,
        &secret.token_uri,
        &[
            ("grant_type", "authorization_code"),
            ("code", code.as_str()),
            ("client_id", secret.client_id.as_str()),
            ("client_secret", secret.client_secret.as_str()),
            ("redirect_uri", redirect_uri.as_str()),
        ],
    )
}

/// Serve the loopback listener until a redirect carrying `state` arrives. Returns its code.
pub(crate) fn await_redirect(
    listener: &TcpListener,
    state: &str,
    timeout: Duration,
) -> Result<String, SheetsError> {
    listener.set_nonblocking(true).map_err(SheetsError::Listener)?;
    let deadline = Instant::now() + timeout;
    loop {
        let stream = match listener.accept() {
            Ok((stream, _)) => stream,
            Err(e) if e.kind() == ErrorKind::WouldBlock => {
                if Instant::now() >= deadline {
                    return Err(SheetsError::ConsentTimeout(timeout.as_secs()));
                }
                std::thread::sleep(ACCEPT_POLL);
                continue;
            }
            Err(e) => return Err(SheetsError::Listener(e)),
        };
        match answer_redirect(stream)? {
            Redirect::Code { code, state: returned } => {
                if returned.as_deref() != Some(state) {
                    return Err(SheetsError::StateMismatch);
                }
                return Ok(code);
            }
            Redirect::Denied(reason) => return Err(SheetsError::ConsentDenied(reason)),
            Redirect::Other => continue,
        }
    }
}

fn answer_redirect(mut stream: TcpStream) -> Result<Redirect, SheetsError> {
    stream.set_nonblocking(false).map_err(SheetsError::Listener)?;
    stream
        .set_read_timeout(Some(REDIRECT_READ_TIMEOUT))
        .map_err(SheetsError::Listener)?;
    let mut request_line = String::new();
    BufReader::new(&stream)
        .read_line(&mut request_line)
        .map_err(SheetsError::Listener)?;
    let redirect = parse_redirect(&request_line);
    let (status, body) = match redirect {
        Redirect::Other => ("404 Not Found", ""),
        _ => ("200 OK", CONSENT_DONE_PAGE),
    };
    let response = format!(
        "HTTP/1.1 {}\r\nContent-Type: text/html; charset=utf-8\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        body.len(),
        body
    );
    if let Err(e) = stream.write_all(response.as_bytes()) {
        log::debug!("Could not answer consent redirect: {}", e);
    }
    Ok(redirect)
}

/// Trade a refresh token for a new access token.
pub(crate) fn refresh_token(
    http: &Client,
    token_uri: &str,
    client_id: &str,
    client_secret: &str,
    refresh_token: &str,
) -> Result<TokenResponse, SheetsError> {
    post_token(
        http,
        token_uri,
        &[
            ("grant_type", "refresh_token"),
            ("refresh_token", refresh_token),
            ("client_id", client_id),
            ("client_secret", client_secret),
        ],
    )
}

fn post_token(
    http: &Client,
    token_uri: &str,
    form: &[(&str, &str)],
) -> Result<TokenResponse, SheetsError> {
    let response = http.post(token_uri).form(form).send()?;
    let status = response.status();
    if !status.is_success() {
        return Err(SheetsError::Status {
            endpoint: "token endpoint",
            status,
            body: response.text().unwrap_or_default(),
        });
    }
    Ok(response.json::<TokenResponse>()?)
}
