use actix_multipart::form::{tempfile::TempFile, text::Text, MultipartForm};
use actix_web::{get, http::header, post, web, HttpRequest, HttpResponse};
use tracing::{info, warn};

use crate::auth::{clear_cookie, session_cookie, AuthedUser, TokenCodec, TOKEN_COOKIE};
use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{
    mask_email, FindAccountForm, LoginForm, RecoveryForm, ResetPasswordForm, ResetQuery,
    SignupForm, User,
};
use crate::password;
use crate::storage::FileStore;
use crate::views;

/// Mounts every route. Shared between the server and the handler tests.
pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(create)
        .service(login_page)
        .service(login)
        .service(logout)
        .service(recovery_page)
        .service(recovery)
        .service(forgot_password_page)
        .service(forgot_password)
        .service(find_account_page)
        .service(find_account)
        .service(reset_password_page)
        .service(reset_password)
        .service(profile)
        .service(profile_setup_page)
        .service(profile_setup);
}

fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

fn html(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(body)
}

fn plain(body: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .body(body)
}

/// Landing page. A valid session skips straight to the profile (or its
/// setup when incomplete); anything else falls through to the page.
#[get("/")]
pub async fn index(
    req: HttpRequest,
    codec: web::Data<TokenCodec>,
    store: web::Data<dyn UserStore>,
) -> HttpResponse {
    if let Some(cookie) = req.cookie(TOKEN_COOKIE) {
        if let Ok(claims) = codec.verify_login(cookie.value()) {
            if let Some(user) = store.find_by_email(&claims.email).await {
                if user.profile_complete() {
                    return redirect("/profile");
                }
                return redirect("/profile-setup");
            }
        }
    }
    html(views::index())
}

#[post("/create")]
pub async fn create(
    form: web::Form<SignupForm>,
    codec: web::Data<TokenCodec>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let user = User {
        username: form.username,
        email: form.email.clone(),
        password_hash: password::hash(&form.password)?,
        age: form.age,
        bio: None,
        profile_picture: None,
    };

    if let Err(err) = store.insert(user).await {
        warn!(%err, "signup failed");
        return Err(AppError::DuplicateKey);
    }

    info!(email = %form.email, "account created");
    let token = codec.issue_login(&form.email)?;
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, "/profile-setup"))
        .cookie(session_cookie(token))
        .finish())
}

#[get("/login")]
pub async fn login_page() -> HttpResponse {
    html(views::login())
}

#[post("/login")]
pub async fn login(
    form: web::Form<LoginForm>,
    codec: web::Data<TokenCodec>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();
    let user = store
        .find_by_email(&form.email)
        .await
        .ok_or(AppError::AccountNotFound)?;

    if !password::verify(&form.password, &user.password_hash) {
        warn!(email = %form.email, "failed login attempt");
        return Err(AppError::InvalidCredential);
    }

    let token = codec.issue_login(&user.email)?;
    let target = if user.profile_complete() {
        "/profile"
    } else {
        "/profile-setup"
    };
    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, target))
        .cookie(session_cookie(token))
        .finish())
}

#[get("/logout")]
pub async fn logout() -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, "/"))
        .cookie(clear_cookie())
        .finish()
}

/// Shared by /recovery and /forgot-password, which are duplicated
/// endpoints with identical behavior. The reset link is echoed straight
/// back to the requester; an out-of-band channel would replace this
/// redirect.
async fn request_reset(
    email: &str,
    codec: &TokenCodec,
    store: &dyn UserStore,
) -> Result<HttpResponse, AppError> {
    if store.find_by_email(email).await.is_none() {
        return Err(AppError::AccountNotFound);
    }
    let token = codec.issue_reset(email)?;
    info!(email = %email, "password reset requested");
    Ok(redirect(&format!("/reset-password?token={token}")))
}

#[get("/recovery")]
pub async fn recovery_page() -> HttpResponse {
    html(views::recovery())
}

#[post("/recovery")]
pub async fn recovery(
    form: web::Form<RecoveryForm>,
    codec: web::Data<TokenCodec>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    request_reset(&form.email, codec.get_ref(), store.get_ref()).await
}

#[get("/forgot-password")]
pub async fn forgot_password_page() -> HttpResponse {
    html(views::forgot_password())
}

#[post("/forgot-password")]
pub async fn forgot_password(
    form: web::Form<RecoveryForm>,
    codec: web::Data<TokenCodec>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    request_reset(&form.email, codec.get_ref(), store.get_ref()).await
}

#[get("/find-account")]
pub async fn find_account_page() -> HttpResponse {
    html(views::find_account())
}

#[post("/find-account")]
pub async fn find_account(
    form: web::Form<FindAccountForm>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let user = store
        .find_by_identifier(&form.identifier)
        .await
        .ok_or(AppError::IdentifierNotFound)?;

    Ok(plain(format!(
        "Account found! Username: {}. You can reset your password using your email: {}",
        user.username,
        mask_email(&user.email)
    )))
}

#[get("/reset-password")]
pub async fn reset_password_page(query: web::Query<ResetQuery>) -> HttpResponse {
    html(views::reset_password(query.token.as_deref()))
}

#[post("/reset-password")]
pub async fn reset_password(
    form: web::Form<ResetPasswordForm>,
    codec: web::Data<TokenCodec>,
    store: web::Data<dyn UserStore>,
) -> Result<HttpResponse, AppError> {
    let form = form.into_inner();

    if form.new_password != form.confirm_new_password {
        return Err(AppError::Validation("Passwords do not match".to_string()));
    }
    if form.new_password.chars().count() < 6 {
        return Err(AppError::Validation(
            "Password must be at least 6 characters".to_string(),
        ));
    }

    let claims = codec.verify_reset(&form.token)?;
    let password_hash = password::hash(&form.new_password)?;
    store.update_password(&claims.email, password_hash).await?;

    info!(email = %claims.email, "password reset completed");
    // No new session cookie is set here; the user only reaches a gated
    // page if a prior session cookie is still valid.
    Ok(redirect("/profile"))
}

#[get("/profile")]
pub async fn profile(user: AuthedUser, store: web::Data<dyn UserStore>) -> HttpResponse {
    match store.find_by_email(&user.0.email).await {
        Some(record) => html(views::profile(&record)),
        None => redirect("/login"),
    }
}

#[get("/profile-setup")]
pub async fn profile_setup_page(_user: AuthedUser) -> HttpResponse {
    html(views::profile_setup())
}

#[derive(Debug, MultipartForm)]
pub struct ProfileSetupForm {
    pub bio: Option<Text<String>>,
    #[multipart(rename = "profilePicture")]
    pub profile_picture: Option<TempFile>,
}

#[post("/profile-setup")]
pub async fn profile_setup(
    user: AuthedUser,
    MultipartForm(form): MultipartForm<ProfileSetupForm>,
    store: web::Data<dyn UserStore>,
    files: web::Data<dyn FileStore>,
) -> Result<HttpResponse, AppError> {
    let bio = form
        .bio
        .map(Text::into_inner)
        .filter(|b| !b.is_empty());
    let picture = match form.profile_picture {
        Some(file) => files.store(file)?,
        None => None,
    };

    store.update_profile(&user.0.email, bio, picture).await?;
    Ok(redirect("/profile"))
}
