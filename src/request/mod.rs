pub mod dispatcher;
pub mod query;
pub mod types;

pub use dispatcher::{is_valid_url, Dispatcher};
pub use query::Query;
pub use types::{FullResponse, Reply, Request, RequestOptions, ResponseBody};
