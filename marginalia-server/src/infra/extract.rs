//! Extractors whose rejections render as the error envelope.

use axum::extract::FromRequest;
use axum::extract::FromRequestParts;

use crate::infra::errors::AppError;

/// `axum::Json` with [`AppError`] as its rejection.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// `axum::extract::Query` with [`AppError`] as its rejection.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);
