//! Read-only client for the GitHub REST API.
//!
//! Only the handful of endpoints the GitHub tools need are modeled. Requests
//! are unauthenticated, so they are subject to GitHub's public rate limits;
//! a rate-limit response surfaces as an ordinary [`UpstreamError::Status`].

mod client;
mod error;
mod models;

pub use client::{GithubClient, StateFilter};
pub use error::UpstreamError;
pub use models::{Issue, Languages, PullRequest, Repository, User};
