#![forbid(unsafe_code)]

mod client;
mod error;
mod traits;
mod types;

pub use crate::{
    client::HttpClient,
    error::{NetError, NetResult},
    traits::Net,
    types::{Headers, NetOptions},
};

#[cfg(any(test, feature = "test-utils"))]
pub mod mock {
    pub use crate::traits::NetMock;
}
