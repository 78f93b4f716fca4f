use axum::{
    Json,
    extract::State,
    http::HeaderMap,
    response::{Html, IntoResponse},
};
use serde::{Deserialize, Serialize};

use session_trust_axum::{AuthIdentity, AuthState, Identity, SessionStore};

pub(crate) async fn index(State(state): State<AuthState>, headers: HeaderMap) -> impl IntoResponse {
    let jar = state.trust().cookie_jar(&headers);
    let html = match state.trust().verify_session(jar.get_session()).identity() {
        Some(identity) if identity.is_registered() => format!(
            "<h1>Feed</h1><p>Welcome back, {}.</p>\
             <form method=\"post\" action=\"/auth/logout\"><button>Log out</button></form>",
            identity.id
        ),
        Some(_) => "<h1>Almost there</h1><p>Finish your signup to see the feed.</p>".to_string(),
        None => "<h1>Welcome</h1><p><a href=\"/login\">Log in</a> or \
                 <a href=\"/signup\">sign up</a>.</p>"
            .to_string(),
    };
    Html(html)
}

pub(crate) async fn login_page() -> Html<&'static str> {
    Html(
        "<h1>Log in</h1>\
         <p>POST <code>{\"account\", \"password\"}</code> as JSON to <code>/auth/login</code>.</p>",
    )
}

pub(crate) async fn signup_page() -> Html<&'static str> {
    Html(
        "<h1>Sign up</h1>\
         <p>POST <code>{\"account\", \"password\"}</code> as JSON to \
         <code>/auth/signup/start</code>, then POST to <code>/auth/signup/complete</code>.</p>",
    )
}

pub(crate) async fn me(AuthIdentity(identity): AuthIdentity) -> Json<Identity> {
    Json(identity)
}

#[derive(Deserialize)]
pub(crate) struct EmailChange {
    email: String,
}

#[derive(Serialize)]
pub(crate) struct EmailChanged {
    id: String,
    email: String,
}

// Only reachable with a settings token bound to the caller
pub(crate) async fn change_email(
    AuthIdentity(identity): AuthIdentity,
    Json(change): Json<EmailChange>,
) -> Json<EmailChanged> {
    tracing::info!(user_id = %identity.id, "Email changed");
    Json(EmailChanged {
        id: identity.id,
        email: change.email,
    })
}
