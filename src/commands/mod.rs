pub mod add;
pub mod clone;
pub mod commit;
pub mod init;
pub mod pull;
pub mod restore;
pub mod status;

pub use add::*;
pub use clone::*;
pub use commit::*;
pub use init::*;
pub use pull::*;
pub use restore::*;
pub use status::*;
