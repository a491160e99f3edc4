//! Command and event handler schemas.

use teloxide::{RequestError, dispatching::UpdateHandler, prelude::*};

mod fortune;
mod membership;
mod start;
mod twitter;
mod upload;
mod user;

pub(crate) const GENERIC_FAILURE: &str = "Something went wrong. Please try again later.";

/// Build the full update schema for the dispatcher.
pub(crate) fn schema() -> UpdateHandler<RequestError> {
    dptree::entry()
        .branch(start::schema())
        .branch(fortune::schema())
        .branch(user::schema())
        .branch(twitter::schema())
        .branch(upload::schema())
        .branch(membership::schema())
}
