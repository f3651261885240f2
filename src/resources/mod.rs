//! Resource handlers for the Nimbus control-plane API.
//!
//! Each handler family wraps one endpoint group (`/v2/databases`,
//! `/v2/load-balancers`, ...) and consists of typed request/response structs
//! plus thin methods that build an [`ApiRequest`](crate::ApiRequest) and
//! hand it to the dispatcher. Handlers depend only on the
//! [`Dispatch`](crate::Dispatch) trait and do no networking of their own.
//!
//! # Example
//!
//! ```rust,ignore
//! use nimbus_api::resources::{DatabaseHandler, LoadBalancerHandler};
//!
//! let databases = DatabaseHandler::new(&client);
//! let load_balancers = LoadBalancerHandler::new(&client);
//!
//! let (page, meta) = databases.list(None).await?;
//! let lb = load_balancers.get("lb-7c21").await?;
//! ```

pub mod databases;
pub mod load_balancers;

pub use databases::DatabaseHandler;
pub use load_balancers::LoadBalancerHandler;
