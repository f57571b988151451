mod common;
mod dispatcher_requests;
mod token_exchange;
