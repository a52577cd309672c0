pub mod config;
pub mod exception;
pub mod form;
pub mod header;
pub mod param;
pub mod request;
pub mod response;
pub mod route;
pub mod server;
pub mod site;
pub mod util;

pub use config::Config;
pub use exception::{Exception, FormError, ParseError, WriteError};
pub use header::Headers;
pub use request::Request;
pub use response::Response;
pub use route::{RouteTable, StaticRoot};
pub use server::{Server, ServerHandle};
pub use site::Site;
pub use util::HtmlBuilder;
