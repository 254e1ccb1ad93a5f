use super::{
    authenticate::{authenticate, AuthOutcome},
    challenge,
    classify::{classify, normalize, Classification},
    challenge_response, session, GateConfig, GateError, MAX_FORM_BYTES,
};
use axum::{
    body::{to_bytes, Body},
    extract::{FromRequest, Multipart, Request, State},
    http::{
        header::{CONTENT_TYPE, LOCATION, SET_COOKIE},
        HeaderMap, HeaderValue, Method, StatusCode, Uri,
    },
    middleware::Next,
    response::{IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{debug, error, info, instrument};

const PASSWORD_FIELD: &str = "password";
const URLENCODED_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";
const MULTIPART_CONTENT_TYPE: &str = "multipart/form-data";

/// Login body encodings a browser form can submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FormEncoding {
    UrlEncoded,
    Multipart,
}

/// Gate middleware.
///
/// Checks run in a fixed order: path classification, session cookie,
/// configuration, then (POST only) the login form. Bodies are never read
/// unless a login is being attempted.
///
/// The URI is normalized before anything else and the normalized form is what
/// reaches the origin, so a dot segment cannot make a document look like an
/// asset.
#[instrument(skip_all, fields(path = %request.uri().path(), method = %request.method()))]
pub async fn guard(
    State(config): State<Arc<GateConfig>>,
    mut request: Request,
    next: Next,
) -> Response {
    let Some(uri) = normalize(request.uri()) else {
        debug!("request target cannot be normalized");
        return GateError::MalformedRequest.into_response();
    };
    *request.uri_mut() = uri;

    if classify(request.uri().path()) == Classification::Bypass {
        debug!("bypass");
        return next.run(request).await;
    }

    if session::has_session(request.headers()) {
        debug!("authenticated");
        return next.run(request).await;
    }

    unauthenticated(&config, request)
        .await
        .unwrap_or_else(IntoResponse::into_response)
}

async fn unauthenticated(config: &GateConfig, request: Request) -> Result<Response, GateError> {
    if !config.is_configured() {
        error!("password is not configured, refusing guarded request");
        return Err(GateError::Configuration);
    }

    let target = redirect_target(request.uri());

    if request.method() != Method::POST {
        debug!("challenge");
        let page = challenge::render(config.title(), &target, false);
        return Ok(challenge_response(StatusCode::OK, page));
    }

    let password = read_password(request).await?;

    match authenticate(password.as_deref(), config.secret()) {
        AuthOutcome::Success => {
            info!("login succeeded");
            login_redirect(&target)
        }
        AuthOutcome::Failure => {
            info!("login failed");
            Err(GateError::AuthenticationFailure {
                page: challenge::render(config.title(), &target, true),
            })
        }
        AuthOutcome::Misconfigured => Err(GateError::Configuration),
    }
}

fn login_redirect(target: &str) -> Result<Response, GateError> {
    let location = HeaderValue::from_str(target).map_err(|err| {
        debug!("invalid redirect target: {err}");
        GateError::MalformedRequest
    })?;
    let cookie = session::session_cookie().map_err(|err| {
        error!("failed to build session cookie: {err}");
        GateError::Configuration
    })?;

    let mut headers = HeaderMap::new();
    headers.insert(LOCATION, location);
    headers.insert(SET_COOKIE, cookie);

    Ok((StatusCode::SEE_OTHER, headers).into_response())
}

/// Path and query of the incoming request, safe to use as a relative
/// `Location`. Leading slashes are collapsed so `//host` cannot become a
/// protocol-relative redirect.
fn redirect_target(uri: &Uri) -> String {
    let path_and_query = uri.path_and_query().map_or("/", |pq| pq.as_str());
    let trimmed = path_and_query.trim_start_matches(['/', '\\']);
    format!("/{trimmed}")
}

fn form_encoding(request: &Request) -> Option<FormEncoding> {
    let mime = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())?
        .trim();

    if mime.eq_ignore_ascii_case(URLENCODED_CONTENT_TYPE) {
        Some(FormEncoding::UrlEncoded)
    } else if mime.eq_ignore_ascii_case(MULTIPART_CONTENT_TYPE) {
        Some(FormEncoding::Multipart)
    } else {
        None
    }
}

async fn read_password(request: Request) -> Result<Option<String>, GateError> {
    let Some(encoding) = form_encoding(&request) else {
        debug!("login body is not a form");
        return Err(GateError::MalformedRequest);
    };

    // Both encodings share the same size cap.
    let (parts, body) = request.into_parts();
    let bytes = to_bytes(body, MAX_FORM_BYTES).await.map_err(|err| {
        debug!("failed to read login body: {err}");
        GateError::MalformedRequest
    })?;

    match encoding {
        FormEncoding::UrlEncoded => {
            let body = std::str::from_utf8(&bytes).map_err(|err| {
                debug!("login body is not UTF-8: {err}");
                GateError::MalformedRequest
            })?;

            Ok(url::form_urlencoded::parse(body.as_bytes())
                .find(|(key, _)| key == PASSWORD_FIELD)
                .map(|(_, value)| value.into_owned()))
        }
        FormEncoding::Multipart => {
            multipart_password(Request::from_parts(parts, Body::from(bytes))).await
        }
    }
}

async fn multipart_password(request: Request) -> Result<Option<String>, GateError> {
    let mut multipart = Multipart::from_request(request, &()).await.map_err(|err| {
        debug!("invalid multipart login body: {err}");
        GateError::MalformedRequest
    })?;

    while let Some(field) = multipart.next_field().await.map_err(|err| {
        debug!("invalid multipart field: {err}");
        GateError::MalformedRequest
    })? {
        if field.name() != Some(PASSWORD_FIELD) {
            continue;
        }
        // An uploaded file never matches a password.
        if field.file_name().is_some() {
            return Ok(None);
        }
        let value = field.text().await.map_err(|err| {
            debug!("invalid multipart password: {err}");
            GateError::MalformedRequest
        })?;
        return Ok(Some(value));
    }

    Ok(None)
}
