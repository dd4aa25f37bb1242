//! Wavefront API client library.
//!
//! Provides an async client for managing users on a Wavefront instance.
//! Every operation goes through the [`Transport`] trait so services can be
//! exercised against fakes without a network.

pub mod client;
pub mod error;
pub mod permissions;
pub mod search;
pub mod transport;
pub mod users;

pub use client::{ClientConfig, WavefrontClient};
pub use error::{ApiError, ApiResult, ErrorKind};
pub use search::{MatchingMethod, SearchCondition, SearchPage};
pub use transport::{ApiRequest, Transport};
pub use users::{NewUserRequest, User, UserGroup, UserGroupProperties, UserGroups, Users};
