//! Tower middleware layers wrapped around the raw hyper client.
//!
//! The stack is fixed and assembled by the client from its
//! [`ClientConfig`](crate::ClientConfig):
//!
//! - [`LoggingLayer`] - outermost, one span per call (`log_level`)
//! - [`FollowRedirectLayer`] - follows 3xx responses (`max_redirects`)

mod follow_redirect;
mod logging;

pub(crate) use follow_redirect::FollowRedirectLayer;
pub(crate) use logging::LoggingLayer;
