use axum::extract::FromRequest;

use crate::error::AppError;

/// `Json` whose rejection renders through [`AppError`], so malformed bodies
/// get the same envelope as every other failure.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct AppJson<T>(pub T);
