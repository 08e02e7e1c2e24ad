//! Infrastructure layer: in-process implementations of the gate's
//! collaborators (user directory, sessions, approval storage, mail).

pub mod approval_store;
pub mod directory;
pub mod mail;
pub mod sessions;


pub use approval_store::InMemoryApprovalRepository;
pub use directory::InMemoryUserDirectory;
pub use mail::{LogMailTransport, RecordingMailTransport};
pub use sessions::InMemorySessionStore;
