// ABOUTME: Core data models for the server session, command requests and npm package metadata

pub mod package;
pub mod request;
pub mod session;

pub use package::{PackageDescriptor, PackageLinks};
pub use request::{Action, CommandRequest, RequestParams};
pub use session::{ServerSession, ServerStatus, SessionEvent, TransitionError};
